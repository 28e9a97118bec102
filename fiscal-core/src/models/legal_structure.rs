use serde::{Deserialize, Serialize};

/// Legal structure under which a business can operate in Spain.
///
/// Serialized with the short codes used by the intake form and the policy
/// files (`autonomo`, `sl`, `cooperativa`, `comunidad_bienes`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LegalStructure {
    #[serde(rename = "autonomo")]
    SelfEmployed,
    #[serde(rename = "sl")]
    LimitedCompany,
    #[serde(rename = "cooperativa")]
    Cooperative,
    #[serde(rename = "comunidad_bienes")]
    CivilPartnership,
}

impl LegalStructure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfEmployed => "autonomo",
            Self::LimitedCompany => "sl",
            Self::Cooperative => "cooperativa",
            Self::CivilPartnership => "comunidad_bienes",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "autonomo" | "autónomo" => Some(Self::SelfEmployed),
            "sl" => Some(Self::LimitedCompany),
            "cooperativa" => Some(Self::Cooperative),
            "comunidad_bienes" => Some(Self::CivilPartnership),
            _ => None,
        }
    }

    /// Human-readable name, as shown in recommendations.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SelfEmployed => "Autónomo",
            Self::LimitedCompany => "Sociedad Limitada",
            Self::Cooperative => "Cooperativa",
            Self::CivilPartnership => "Comunidad de Bienes",
        }
    }

    /// Structures taxed through corporate tax rather than personal income tax.
    pub fn is_incorporated(&self) -> bool {
        matches!(self, Self::LimitedCompany | Self::Cooperative)
    }
}

impl std::fmt::Display for LegalStructure {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Contribution regime used by the social-security calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionKind {
    /// Self-employed worker contributing on their own income (RETA).
    SelfEmployed,
    /// Salaried administrator or member, employer and employee shares combined.
    Employee,
}
