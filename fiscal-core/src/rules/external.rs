//! Rules published through an external JSON feed.
//!
//! The feed uses Spanish field names:
//!
//! ```json
//! {
//!   "condiciones": { "sector": "Comercio", "facturacionMin": 30000, "socios": true },
//!   "recomendacion": "Constituir una SL",
//!   "tipoImpositivo": 25,
//!   "deducciones": ["Gastos de constitución"]
//! }
//! ```
//!
//! A document may hold one rule object or an array of them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::InputRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalConditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(
        rename = "facturacionMin",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub min_revenue: Option<Decimal>,
    #[serde(
        rename = "facturacionMax",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub max_revenue: Option<Decimal>,
    #[serde(rename = "socios", default, skip_serializing_if = "Option::is_none")]
    pub partners: Option<bool>,
}

fn bound(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| !v.is_zero())
}

impl ExternalConditions {
    /// Every present condition must hold. Empty sectors and zero revenue
    /// bounds count as absent.
    pub fn matches(
        &self,
        input: &InputRecord,
    ) -> bool {
        let revenue = input.revenue();

        if let Some(sector) = self.sector.as_deref().filter(|s| !s.is_empty()) {
            if sector != input.economic_sector {
                return false;
            }
        }
        if bound(self.min_revenue).is_some_and(|min| revenue < min) {
            return false;
        }
        if bound(self.max_revenue).is_some_and(|max| revenue > max) {
            return false;
        }
        if self.partners.is_some_and(|partners| partners != input.has_partners()) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRule {
    #[serde(rename = "condiciones", default)]
    pub conditions: ExternalConditions,
    #[serde(rename = "recomendacion")]
    pub recommendation: String,
    /// Percentage.
    #[serde(
        rename = "tipoImpositivo",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub tax_rate: Option<Decimal>,
    #[serde(rename = "deducciones", default, skip_serializing_if = "Vec::is_empty")]
    pub deductions: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeedDocument {
    Many(Vec<ExternalRule>),
    One(ExternalRule),
}

/// Parses a feed document holding either one rule or a list of rules.
pub fn parse_external_rules(json: &str) -> Result<Vec<ExternalRule>, serde_json::Error> {
    let document: FeedDocument = serde_json::from_str(json)?;
    Ok(match document {
        FeedDocument::Many(rules) => rules,
        FeedDocument::One(rule) => vec![rule],
    })
}

/// Rules whose conditions all hold, in feed order.
pub fn matching_external_rules<'a>(
    rules: &'a [ExternalRule],
    input: &InputRecord,
) -> Vec<&'a ExternalRule> {
    rules
        .iter()
        .filter(|rule| rule.conditions.matches(input))
        .collect()
}
