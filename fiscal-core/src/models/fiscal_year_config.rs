use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::IncomeTaxSchedule;

/// Errors raised when policy values are out of range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("{field} must be a percentage between 0 and 100, got {value}")]
    InvalidPercentage { field: &'static str, value: Decimal },

    #[error("{field} must be a fraction between 0 and 1, got {value}")]
    InvalidFraction { field: String, value: Decimal },

    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("contribution base floor {floor} is above the ceiling {ceiling}")]
    InvertedContributionBases { floor: Decimal, ceiling: Decimal },

    #[error("contributions must be paid over at least one month")]
    ZeroMonths,

    #[error("a policy book needs at least one fiscal year")]
    EmptyBook,
}

fn check_percentage(
    field: &'static str,
    value: Decimal,
) -> Result<(), PolicyError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(PolicyError::InvalidPercentage { field, value });
    }
    Ok(())
}

fn check_fraction(
    field: impl Into<String>,
    value: Decimal,
) -> Result<(), PolicyError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(PolicyError::InvalidFraction {
            field: field.into(),
            value,
        });
    }
    Ok(())
}

fn check_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), PolicyError> {
    if value < Decimal::ZERO {
        return Err(PolicyError::NegativeAmount { field, value });
    }
    Ok(())
}

/// Corporate tax (Impuesto de Sociedades) rates, as percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporateTaxPolicy {
    pub general_rate: Decimal,
    /// Rate for newly created companies in their first taxable periods.
    pub reduced_rate: Decimal,
    /// Taxable income up to which the reduced rate may apply.
    pub preferential_threshold: Decimal,
    pub cooperative_rate: Decimal,
}

impl CorporateTaxPolicy {
    /// Rate applied to a company's taxable income.
    pub fn rate_for(
        &self,
        taxable_income: Decimal,
        preferential: bool,
    ) -> Decimal {
        if preferential && taxable_income <= self.preferential_threshold {
            self.reduced_rate
        } else {
            self.general_rate
        }
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        check_percentage("corporate.general_rate", self.general_rate)?;
        check_percentage("corporate.reduced_rate", self.reduced_rate)?;
        check_percentage("corporate.cooperative_rate", self.cooperative_rate)?;
        check_non_negative(
            "corporate.preferential_threshold",
            self.preferential_threshold,
        )
    }
}

/// VAT charged on revenue and the share of it that is a real cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatPolicy {
    /// Percentage.
    pub rate: Decimal,
    /// Fraction of output VAT not offset by input VAT.
    pub effective_factor: Decimal,
}

impl VatPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        check_percentage("vat.rate", self.rate)?;
        check_fraction("vat.effective_factor", self.effective_factor)
    }
}

/// Social-security constants. Monthly amounts are in euros; rates are
/// fractions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionPolicy {
    pub self_employed_minimum_monthly: Decimal,
    pub monthly_base_floor: Decimal,
    pub monthly_base_ceiling: Decimal,
    pub self_employed_rate: Decimal,
    /// Employer and employee shares combined.
    pub employee_rate: Decimal,
    pub months: u32,
}

impl ContributionPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        check_non_negative(
            "contributions.self_employed_minimum_monthly",
            self.self_employed_minimum_monthly,
        )?;
        check_non_negative("contributions.monthly_base_floor", self.monthly_base_floor)?;
        if self.monthly_base_floor > self.monthly_base_ceiling {
            return Err(PolicyError::InvertedContributionBases {
                floor: self.monthly_base_floor,
                ceiling: self.monthly_base_ceiling,
            });
        }
        check_fraction("contributions.self_employed_rate", self.self_employed_rate)?;
        check_fraction("contributions.employee_rate", self.employee_rate)?;
        if self.months == 0 {
            return Err(PolicyError::ZeroMonths);
        }
        Ok(())
    }
}

/// Sector heuristics used when no itemized expenses are supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpensePolicy {
    /// Expense-to-revenue fraction per economic sector, keyed by the sector
    /// label offered on the form.
    #[serde(default)]
    pub sector_ratios: BTreeMap<String, Decimal>,
    pub default_ratio: Decimal,
    /// Extra fraction of revenue added when the business has staff.
    pub employee_surcharge: Decimal,
    /// Upper bound on estimated expenses as a fraction of revenue.
    pub max_ratio: Decimal,
}

impl ExpensePolicy {
    pub fn ratio_for(
        &self,
        sector: &str,
    ) -> Decimal {
        match self.sector_ratios.get(sector.trim()) {
            Some(ratio) => *ratio,
            None => {
                if !sector.trim().is_empty() {
                    debug!(sector, "unknown sector, using default expense ratio");
                }
                self.default_ratio
            }
        }
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        for (sector, ratio) in &self.sector_ratios {
            check_fraction(format!("expenses.sector_ratios.{sector}"), *ratio)?;
        }
        check_fraction("expenses.default_ratio", self.default_ratio)?;
        check_fraction("expenses.employee_surcharge", self.employee_surcharge)?;
        check_fraction("expenses.max_ratio", self.max_ratio)
    }
}

/// Administrator salary assumed for incorporated structures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationPolicy {
    /// Fraction of revenue paid out as salary, before the cap.
    pub salary_ratio: Decimal,
    pub company_salary_cap: Decimal,
    pub cooperative_salary_cap: Decimal,
}

impl CompensationPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        check_fraction("compensation.salary_ratio", self.salary_ratio)?;
        check_non_negative("compensation.company_salary_cap", self.company_salary_cap)?;
        check_non_negative(
            "compensation.cooperative_salary_cap",
            self.cooperative_salary_cap,
        )
    }
}

/// Every rate and threshold the simulator needs for one fiscal year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYearConfig {
    pub tax_year: i32,
    pub income_tax: IncomeTaxSchedule,
    pub corporate: CorporateTaxPolicy,
    pub vat: VatPolicy,
    pub contributions: ContributionPolicy,
    pub expenses: ExpensePolicy,
    pub compensation: CompensationPolicy,
}

impl FiscalYearConfig {
    /// Checks every section. The income-tax schedule is already validated by
    /// its own constructor.
    ///
    /// # Errors
    ///
    /// Returns the first [`PolicyError`] found.
    pub fn validate(&self) -> Result<(), PolicyError> {
        self.corporate.validate()?;
        self.vat.validate()?;
        self.contributions.validate()?;
        self.expenses.validate()?;
        self.compensation.validate()
    }
}

/// Fiscal-year policies indexed by year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyBook {
    years: BTreeMap<i32, FiscalYearConfig>,
}

impl PolicyBook {
    /// Builds a book from validated configs. A later config for the same year
    /// replaces an earlier one.
    pub fn new(configs: impl IntoIterator<Item = FiscalYearConfig>) -> Result<Self, PolicyError> {
        let mut years = BTreeMap::new();
        for config in configs {
            config.validate()?;
            years.insert(config.tax_year, config);
        }
        if years.is_empty() {
            return Err(PolicyError::EmptyBook);
        }
        Ok(Self { years })
    }

    /// Policy for `year`: the latest configured year not after it, or the
    /// earliest configured year when `year` predates them all.
    pub fn resolve(
        &self,
        year: i32,
    ) -> &FiscalYearConfig {
        let resolved = self
            .years
            .range(..=year)
            .next_back()
            .or_else(|| self.years.iter().next())
            .map(|(_, config)| config);

        match resolved {
            Some(config) => {
                if config.tax_year != year {
                    debug!(
                        requested = year,
                        resolved = config.tax_year,
                        "no policy for requested year"
                    );
                }
                config
            }
            // The constructor rejects empty books.
            None => unreachable!("policy book is never empty"),
        }
    }

    pub fn latest(&self) -> &FiscalYearConfig {
        self.resolve(i32::MAX)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::test_support::test_config;

    #[test]
    fn test_config_is_valid() {
        assert_eq!(test_config().validate(), Ok(()));
    }

    #[test]
    fn rate_for_applies_reduced_rate_only_under_threshold() {
        let corporate = test_config().corporate;

        assert_eq!(corporate.rate_for(dec!(300000), true), dec!(15));
        assert_eq!(corporate.rate_for(dec!(300000.01), true), dec!(25));
        assert_eq!(corporate.rate_for(dec!(1000), false), dec!(25));
    }

    #[test]
    fn ratio_for_falls_back_to_default() {
        let expenses = test_config().expenses;

        assert_eq!(expenses.ratio_for("Comercio"), dec!(0.60));
        assert_eq!(expenses.ratio_for("Minería"), dec!(0.30));
        assert_eq!(expenses.ratio_for(""), dec!(0.30));
    }

    #[test]
    fn validate_rejects_percentage_out_of_range() {
        let mut config = test_config();
        config.vat.rate = dec!(121);

        assert_eq!(
            config.validate(),
            Err(PolicyError::InvalidPercentage {
                field: "vat.rate",
                value: dec!(121)
            })
        );
    }

    #[test]
    fn validate_rejects_fraction_given_as_percentage() {
        let mut config = test_config();
        config.contributions.self_employed_rate = dec!(30.65);

        assert!(matches!(
            config.validate(),
            Err(PolicyError::InvalidFraction { .. })
        ));
    }

    #[test]
    fn validate_rejects_inverted_contribution_bases() {
        let mut config = test_config();
        config.contributions.monthly_base_floor = dec!(5000);

        assert_eq!(
            config.validate(),
            Err(PolicyError::InvertedContributionBases {
                floor: dec!(5000),
                ceiling: dec!(4070)
            })
        );
    }

    #[test]
    fn validate_names_the_offending_sector() {
        let mut config = test_config();
        config
            .expenses
            .sector_ratios
            .insert("Salud".to_string(), dec!(2));

        assert_eq!(
            config.validate(),
            Err(PolicyError::InvalidFraction {
                field: "expenses.sector_ratios.Salud".to_string(),
                value: dec!(2)
            })
        );
    }

    // =========================================================================
    // PolicyBook
    // =========================================================================

    fn config_for(year: i32) -> FiscalYearConfig {
        FiscalYearConfig {
            tax_year: year,
            ..test_config()
        }
    }

    #[test]
    fn book_requires_at_least_one_year() {
        assert_eq!(
            PolicyBook::new(Vec::new()),
            Err(PolicyError::EmptyBook)
        );
    }

    #[test]
    fn resolve_picks_latest_year_not_after_request() {
        let book = PolicyBook::new([config_for(2022), config_for(2024)]).unwrap();

        assert_eq!(book.resolve(2023).tax_year, 2022);
        assert_eq!(book.resolve(2024).tax_year, 2024);
        assert_eq!(book.resolve(2030).tax_year, 2024);
    }

    #[test]
    fn resolve_falls_back_to_earliest_year() {
        let book = PolicyBook::new([config_for(2024), config_for(2022)]).unwrap();

        assert_eq!(book.resolve(2010).tax_year, 2022);
        assert_eq!(book.latest().tax_year, 2024);
        assert_eq!(book.years().collect::<Vec<_>>(), vec![2022, 2024]);
    }

    #[test]
    fn book_rejects_invalid_config() {
        let mut config = config_for(2024);
        config.contributions.months = 0;

        assert_eq!(PolicyBook::new([config]), Err(PolicyError::ZeroMonths));
    }
}
