use serde::{Deserialize, Serialize};

use super::LegalStructure;

/// Which legal structures a deduction is meant for. Serialized with the same
/// form codes as [`LegalStructure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Applicability {
    #[serde(rename = "autonomo", alias = "self_employed")]
    SelfEmployed,
    #[serde(rename = "sl", alias = "limited_company")]
    LimitedCompany,
    #[default]
    #[serde(rename = "both")]
    Both,
}

impl Applicability {
    /// Only company-only deductions are restricted: they are withheld from
    /// unincorporated structures. A self-employed-only deduction is still
    /// offered to a company target. Cooperatives count as incorporated.
    pub fn allows(
        &self,
        structure: LegalStructure,
    ) -> bool {
        match self {
            Self::LimitedCompany => structure.is_incorporated(),
            Self::SelfEmployed | Self::Both => true,
        }
    }
}

/// Restrictions and caveats attached to a named deduction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeductionMeta {
    pub applicable_to: Applicability,
    pub incompatible_with: Vec<String>,
    pub warnings: Vec<String>,
}

impl DeductionMeta {
    pub fn is_incompatible_with(
        &self,
        other: &str,
    ) -> bool {
        self.incompatible_with.iter().any(|name| name == other)
    }
}
