//! Fiscal rules, deduction validation and alerts.

mod alerts;
mod catalog;
mod deductions;
mod engine;
mod external;

pub use alerts::{FiscalAlert, TaxObligation, fiscal_alerts, upcoming_obligations};
pub use catalog::{default_regimes, default_rules};
pub use deductions::{DeductionCatalog, ValidatedDeduction};
pub use engine::{FiscalRuleEngine, RuleEngineError};
pub use external::{
    ExternalConditions, ExternalRule, matching_external_rules, parse_external_rules,
};
