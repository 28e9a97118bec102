use std::path::Path;

use anyhow::Context;
use fiscal_core::calculations::common::{round_euros, round_half_up};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

/// Formats an amount the Spanish way, with cents: `10.501,50 €`.
pub fn format_euros(amount: Decimal) -> String {
    let fixed = format!("{:.2}", round_half_up(amount));
    let (int_part, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{},{} €", group_thousands(int_part), cents)
}

/// Formats an amount rounded to whole euros: `10.502 €`.
pub fn format_whole_euros(amount: Decimal) -> String {
    format!("{} €", group_thousands(&round_euros(amount).to_string()))
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}")
}

/// Formats a percentage with one decimal, using "—" when `None`.
pub fn format_percent(value: Option<Decimal>) -> String {
    value
        .map(|v| format!("{:.1} %", v.round_dp(1)))
        .unwrap_or_else(|| "—".to_string())
}

/// Reads and deserializes a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}
