use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Expected-revenue band selected on the intake form.
///
/// Each band is represented in calculations by a fixed midpoint amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueBand {
    UnderThirtyThousand,
    ThirtyToOneHundredThousand,
    OneHundredToThreeHundredThousand,
    ThreeHundredThousandToOneMillion,
    OverOneMillion,
    Unknown,
}

impl RevenueBand {
    /// Band labels in the order they are offered on the form.
    pub const LABELS: [(&'static str, RevenueBand); 5] = [
        ("Menos de 30.000€", RevenueBand::UnderThirtyThousand),
        ("30.000€ - 100.000€", RevenueBand::ThirtyToOneHundredThousand),
        ("100.000€ - 300.000€", RevenueBand::OneHundredToThreeHundredThousand),
        ("300.000€ - 1M€", RevenueBand::ThreeHundredThousandToOneMillion),
        ("Más de 1M€", RevenueBand::OverOneMillion),
    ];

    /// Recognizes a band from its label. Labels are matched by containment so
    /// decorated values ("Facturación: Menos de 30.000€") still resolve;
    /// anything else is [`RevenueBand::Unknown`].
    pub fn parse(label: &str) -> Self {
        if label.trim().is_empty() {
            return Self::Unknown;
        }

        Self::LABELS
            .iter()
            .find(|(text, _)| label.contains(text))
            .map(|(_, band)| *band)
            .unwrap_or(Self::Unknown)
    }

    /// Representative annual revenue for the band.
    pub fn representative_amount(&self) -> Decimal {
        match self {
            Self::UnderThirtyThousand => Decimal::from(25_000),
            Self::ThirtyToOneHundredThousand => Decimal::from(65_000),
            Self::OneHundredToThreeHundredThousand => Decimal::from(200_000),
            Self::ThreeHundredThousandToOneMillion => Decimal::from(650_000),
            Self::OverOneMillion => Decimal::from(1_500_000),
            Self::Unknown => Decimal::ZERO,
        }
    }
}
