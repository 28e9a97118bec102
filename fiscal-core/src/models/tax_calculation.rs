use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LegalStructure;

/// Annual tax burden of one legal structure for a given revenue.
///
/// Exactly one of `income_tax` (personal income tax, IRPF) and
/// `corporate_tax` (Impuesto de Sociedades) is present. Amounts are kept at
/// full precision; round them only for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxCalculation {
    pub structure: LegalStructure,
    pub gross_revenue: Decimal,
    /// Operating expenses plus, for companies, the administrator salary.
    pub deductible_expenses: Decimal,
    pub taxable_income: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_tax: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corporate_tax: Option<Decimal>,
    pub vat: Decimal,
    pub social_security: Decimal,
    pub total_taxes: Decimal,
    pub net_income: Decimal,
    /// Total taxes as a percentage of gross revenue.
    pub effective_rate: Decimal,
}

impl TaxCalculation {
    /// The income or corporate tax, whichever applies.
    pub fn profit_tax(&self) -> Decimal {
        self.income_tax
            .or(self.corporate_tax)
            .unwrap_or(Decimal::ZERO)
    }
}
