use std::collections::HashSet;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use super::catalog::{default_regimes, default_rules};
use crate::models::{FiscalRule, InputRecord, LegalStructure, TaxRegime};

/// Revenue below which a business without partners is steered to the
/// self-employed regime.
const SELF_EMPLOYED_REVENUE_LIMIT: Decimal = Decimal::from_parts(30_000, 0, 0, false, 0);

/// Marker identifying the direct-estimation variant among self-employed
/// regimes.
const DIRECT_ESTIMATION: &str = "Directa";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleEngineError {
    #[error("the regime table is empty")]
    NoRegimes,

    #[error("rule id '{0}' is used more than once")]
    DuplicateRuleId(String),
}

/// Matches a business profile against prioritized fiscal rules and picks a
/// recommended regime.
#[derive(Debug, Clone)]
pub struct FiscalRuleEngine {
    rules: Vec<FiscalRule>,
    regimes: Vec<TaxRegime>,
}

impl FiscalRuleEngine {
    /// # Errors
    ///
    /// Fails when `regimes` is empty or two rules share an id.
    pub fn new(
        rules: Vec<FiscalRule>,
        regimes: Vec<TaxRegime>,
    ) -> Result<Self, RuleEngineError> {
        if regimes.is_empty() {
            return Err(RuleEngineError::NoRegimes);
        }

        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(RuleEngineError::DuplicateRuleId(rule.id.clone()));
            }
        }

        Ok(Self { rules, regimes })
    }

    /// Engine loaded with the built-in Spanish rules and regimes.
    pub fn spanish_defaults() -> Self {
        Self {
            rules: default_rules(),
            regimes: default_regimes(),
        }
    }

    pub fn rules(&self) -> &[FiscalRule] {
        &self.rules
    }

    pub fn regimes(&self) -> &[TaxRegime] {
        &self.regimes
    }

    /// Every rule whose condition holds, ordered by ascending priority. Rules
    /// sharing a priority keep their table order.
    pub fn evaluate(
        &self,
        input: &InputRecord,
    ) -> Vec<&FiscalRule> {
        let mut matched: Vec<&FiscalRule> = self
            .rules
            .iter()
            .filter(|rule| rule.applies_to(input))
            .collect();
        matched.sort_by_key(|rule| rule.priority);

        debug!(
            matched = ?matched.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            "evaluated fiscal rules"
        );
        matched
    }

    /// Recommended regime for the business.
    ///
    /// Low revenue without partners points to self-employment under direct
    /// estimation; higher revenue or having partners points to a limited
    /// company. When the table lacks the regime a branch asks for, the first
    /// regime is returned.
    pub fn recommended_structure(
        &self,
        input: &InputRecord,
    ) -> &TaxRegime {
        let revenue = input.revenue();
        let partners = input.has_partners();

        let preferred = if revenue < SELF_EMPLOYED_REVENUE_LIMIT && !partners {
            self.regimes.iter().find(|regime| {
                regime.kind == LegalStructure::SelfEmployed
                    && regime.name.contains(DIRECT_ESTIMATION)
            })
        } else {
            self.regimes
                .iter()
                .find(|regime| regime.kind == LegalStructure::LimitedCompany)
        };

        preferred.unwrap_or_else(|| {
            warn!(%revenue, partners, "preferred regime missing from table, using first regime");
            &self.regimes[0]
        })
    }
}
