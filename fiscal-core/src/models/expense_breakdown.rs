use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::parsing::bounded_amount;

/// Itemized annual expenses supplied by the user instead of the sector
/// estimate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpenseBreakdown {
    pub office_expenses: Decimal,
    pub equipment_depreciation: Decimal,
    pub professional_services: Decimal,
    pub training: Decimal,
    pub travel: Decimal,
    pub supplies: Decimal,
    pub other: Decimal,
}

impl ExpenseBreakdown {
    /// Sum of every component. A component beyond the supported maximum
    /// counts as zero.
    pub fn total(&self) -> Decimal {
        [
            ("officeExpenses", self.office_expenses),
            ("equipmentDepreciation", self.equipment_depreciation),
            ("professionalServices", self.professional_services),
            ("training", self.training),
            ("travel", self.travel),
            ("supplies", self.supplies),
            ("other", self.other),
        ]
        .into_iter()
        .map(|(field, value)| bounded_amount(value, field))
        .sum()
    }
}
