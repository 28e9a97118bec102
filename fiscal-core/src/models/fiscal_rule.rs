use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{InputRecord, LegalStructure};

/// Declarative predicate over an [`InputRecord`].
///
/// Revenue comparisons use the representative amount of the selected band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleCondition {
    RevenueBelow { amount: Decimal },
    RevenueAbove { amount: Decimal },
    /// Inclusive on both ends.
    RevenueBetween { min: Decimal, max: Decimal },
    HasPartners,
    HasEmployees,
    InternationalActivity,
    SpecialDeduction { tag: String },
    Sector { name: String },
    All { conditions: Vec<RuleCondition> },
    Any { conditions: Vec<RuleCondition> },
}

impl RuleCondition {
    pub fn matches(
        &self,
        input: &InputRecord,
    ) -> bool {
        match self {
            Self::RevenueBelow { amount } => input.revenue() < *amount,
            Self::RevenueAbove { amount } => input.revenue() > *amount,
            Self::RevenueBetween { min, max } => {
                let revenue = input.revenue();
                revenue >= *min && revenue <= *max
            }
            Self::HasPartners => input.has_partners(),
            Self::HasEmployees => input.has_employees(),
            Self::InternationalActivity => input.has_international_activity(),
            Self::SpecialDeduction { tag } => input.has_special_deduction(tag),
            Self::Sector { name } => input.economic_sector.trim() == name,
            Self::All { conditions } => conditions.iter().all(|c| c.matches(input)),
            Self::Any { conditions } => conditions.iter().any(|c| c.matches(input)),
        }
    }
}

/// A prioritized condition → recommendation rule.
///
/// Lower `priority` values take precedence when results are listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiscalRule {
    pub id: String,
    pub name: String,
    pub condition: RuleCondition,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<LegalStructure>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deductions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub risks: Vec<String>,
    pub priority: u32,
}

impl FiscalRule {
    pub fn applies_to(
        &self,
        input: &InputRecord,
    ) -> bool {
        self.condition.matches(input)
    }
}
