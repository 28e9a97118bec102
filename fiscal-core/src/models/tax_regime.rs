use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LegalStructure;

/// Reference description of a Spanish tax regime.
///
/// Rates are percentages. Revenue bounds are informational: the simulator
/// does not reject inputs outside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRegime {
    pub kind: LegalStructure,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income_tax_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corporate_tax_rate: Option<Decimal>,
    pub vat_rate: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_revenue: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_revenue: Option<Decimal>,
    /// Monthly social-security contribution base, when fixed by the regime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_security_base: Option<Decimal>,
}

impl TaxRegime {
    /// Whether `revenue` falls inside the regime's declared bounds.
    pub fn admits_revenue(
        &self,
        revenue: Decimal,
    ) -> bool {
        self.min_revenue.is_none_or(|min| revenue >= min)
            && self.max_revenue.is_none_or(|max| revenue <= max)
    }
}
