//! Progressive and flat tax computation.
//!
//! [`progressive_tax`] walks a bracket table the way the personal income tax
//! (IRPF) scale is applied: each slice of income is taxed at the rate of the
//! bracket it falls in. Corporate tax uses a single flat rate chosen by
//! [`CorporateTaxPolicy::rate_for`].
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fiscal_core::calculations::brackets::progressive_tax;
//! use fiscal_core::RateBracket;
//!
//! let brackets = vec![
//!     RateBracket { min: dec!(0), max: Some(dec!(12450)), rate: dec!(19) },
//!     RateBracket { min: dec!(12450), max: None, rate: dec!(24) },
//! ];
//!
//! assert_eq!(progressive_tax(dec!(20000), &brackets), dec!(4177.50));
//! ```

use rust_decimal::Decimal;

use super::common::percent_of;
use crate::models::{CorporateTaxPolicy, RateBracket};

/// Tax owed on `taxable_income` under a progressive bracket table.
///
/// Brackets must be ascending and contiguous; this function does not check
/// that (see [`crate::IncomeTaxSchedule`]). Non-positive income yields zero.
/// Income beyond the last bounded bracket is untaxed when the table lacks an
/// unbounded top bracket.
pub fn progressive_tax(
    taxable_income: Decimal,
    brackets: &[RateBracket],
) -> Decimal {
    let mut remaining = taxable_income;
    let mut tax = Decimal::ZERO;

    for bracket in brackets {
        if remaining <= Decimal::ZERO {
            break;
        }

        let in_bracket = match bracket.width() {
            Some(width) => remaining.min(width),
            None => remaining,
        };
        tax += percent_of(in_bracket, bracket.rate);
        remaining -= in_bracket;
    }

    tax
}

/// Single-rate tax on a non-negative base.
pub fn flat_tax(
    taxable_income: Decimal,
    rate: Decimal,
) -> Decimal {
    percent_of(taxable_income.max(Decimal::ZERO), rate)
}

/// Corporate tax for a limited company.
///
/// `preferential` selects the reduced rate for newly created companies, which
/// only applies while taxable income stays within the policy threshold.
pub fn corporate_tax(
    taxable_income: Decimal,
    policy: &CorporateTaxPolicy,
    preferential: bool,
) -> Decimal {
    flat_tax(taxable_income, policy.rate_for(taxable_income, preferential))
}
