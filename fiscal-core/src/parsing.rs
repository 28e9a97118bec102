//! Lenient parsing of amounts typed into the intake form.
//!
//! Form fields arrive as free text. Both plain (`65000`, `65000.50`) and
//! Spanish-formatted (`65.000`, `65.000,50 €`) amounts are accepted. Callers
//! on the simulation path use [`coerce_amount`], which degrades to zero
//! instead of failing.
//!
//! Amounts beyond [`MAX_AMOUNT`] in either direction are rejected so that
//! no later multiplication by a rate can overflow `Decimal`.

use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

/// Largest absolute amount (10^15 €) the calculators accept.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Error returned when a string cannot be parsed as an amount.
#[derive(Debug, Error)]
pub enum ParseAmountError {
    #[error("invalid amount '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("amount '{input}' is beyond the supported maximum of {MAX_AMOUNT}")]
    OutOfRange { input: String },
}

fn spanish_grouping() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^-?\d{1,3}(\.\d{3})+(,\d+)?$").expect("static regex is valid")
    })
}

/// Strips currency symbols and whitespace and converts Spanish separators.
fn normalize_amount_input(s: &str) -> String {
    let stripped: String = s
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '€')
        .collect();

    if spanish_grouping().is_match(&stripped) {
        stripped.replace('.', "").replace(',', ".")
    } else if stripped.contains(',') && !stripped.contains('.') {
        stripped.replace(',', ".")
    } else {
        stripped.replace(',', "")
    }
}

/// Parses a form amount into a [`Decimal`].
///
/// Empty or whitespace-only input is treated as 0.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let amount: Decimal = normalized.parse().map_err(|e| ParseAmountError::Invalid {
        input: s.to_string(),
        source: e,
    })?;
    if amount.abs() > MAX_AMOUNT {
        return Err(ParseAmountError::OutOfRange {
            input: s.to_string(),
        });
    }
    Ok(amount)
}

/// Parses a form amount, falling back to zero (with a warning) on bad input.
pub fn coerce_amount(s: &str) -> Decimal {
    parse_amount(s).unwrap_or_else(|error| {
        tracing::warn!(input = %s, %error, "unusable amount coerced to zero");
        Decimal::ZERO
    })
}

/// Passes `value` through, or zero (with a warning) when it is beyond
/// [`MAX_AMOUNT`]. For amounts that arrive already typed as `Decimal`.
pub fn bounded_amount(
    value: Decimal,
    field: &str,
) -> Decimal {
    if value.abs() > MAX_AMOUNT {
        tracing::warn!(field, %value, "out-of-range amount coerced to zero");
        Decimal::ZERO
    } else {
        value
    }
}
