//! Tax simulation and rule evaluation for choosing a Spanish legal structure.
//!
//! The crate compares what a business would pay as a self-employed worker
//! (autónomo), a limited company (SL) or a worker cooperative, and matches
//! the business profile against prioritized fiscal rules. Rate tables are
//! passed in as [`FiscalYearConfig`] values; nothing here reads files or the
//! network.

pub mod calculations;
pub mod feed;
pub mod models;
pub mod parsing;
pub mod report;
pub mod rules;

#[cfg(test)]
pub(crate) mod test_support;

pub use feed::{ExternalRuleCache, FeedError, RuleFeed};
pub use models::*;
pub use report::{FiscalReport, RiskAdvice};
pub use rules::{
    DeductionCatalog, ExternalRule, FiscalAlert, FiscalRuleEngine, RuleEngineError,
    TaxObligation, ValidatedDeduction,
};
