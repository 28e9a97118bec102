//! Small numeric helpers shared by the regime calculators.
//!
//! Calculations run at full `Decimal` precision; [`round_half_up`] is only
//! applied when amounts are presented or exported.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to cents, with exact midpoints going away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fiscal_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(10501.505)), dec!(10501.51));
/// assert_eq!(round_half_up(dec!(-0.125)), dec!(-0.13));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to whole euros, as the summary figures are shown.
pub fn round_euros(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps negative amounts to zero.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Applies a percentage rate (`21` means 21 %).
pub fn percent_of(
    amount: Decimal,
    rate: Decimal,
) -> Decimal {
    amount * rate / Decimal::ONE_HUNDRED
}

/// `part / whole` expressed as a percentage, or `None` when `whole` is zero.
pub fn ratio_percent(
    part: Decimal,
    whole: Decimal,
) -> Option<Decimal> {
    if whole.is_zero() {
        None
    } else {
        Some(part / whole * Decimal::ONE_HUNDRED)
    }
}
