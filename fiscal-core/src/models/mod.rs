mod deduction_meta;
mod expense_breakdown;
mod fiscal_rule;
mod fiscal_year_config;
mod input_record;
mod legal_structure;
mod rate_bracket;
mod revenue_band;
mod tax_calculation;
mod tax_regime;

pub use deduction_meta::{Applicability, DeductionMeta};
pub use expense_breakdown::ExpenseBreakdown;
pub use fiscal_rule::{FiscalRule, RuleCondition};
pub use fiscal_year_config::{
    CompensationPolicy, ContributionPolicy, CorporateTaxPolicy, ExpensePolicy, FiscalYearConfig,
    PolicyBook, PolicyError, VatPolicy,
};
pub use input_record::{DEFAULT_COMPANY_NAME, InputError, InputRecord};
pub use legal_structure::{ContributionKind, LegalStructure};
pub use rate_bracket::{IncomeTaxSchedule, RateBracket, ScheduleError};
pub use revenue_band::RevenueBand;
pub use tax_calculation::TaxCalculation;
pub use tax_regime::TaxRegime;
