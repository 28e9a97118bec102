//! Per-structure tax simulation.
//!
//! Each simulation composes the expense estimator, the bracket or flat tax,
//! VAT and social security into a [`TaxCalculation`]:
//!
//! | Structure        | Profit tax            | Social security                 |
//! |------------------|-----------------------|---------------------------------|
//! | Autónomo         | IRPF brackets         | RETA on taxable income          |
//! | Comunidad bienes | IRPF brackets         | RETA on taxable income          |
//! | SL               | IS general / reduced  | employee rate on admin salary   |
//! | Cooperativa      | IS cooperative rate   | employee rate on member salary  |
//!
//! Companies deduct an administrator salary of `salary_ratio × revenue`, up
//! to the structure's cap, on top of operating expenses.

use rust_decimal::Decimal;
use tracing::debug;

use super::common::{non_negative, percent_of, ratio_percent};
use super::{ContributionCalculator, ExpenseEstimator, brackets};
use crate::models::{
    ContributionKind, ExpenseBreakdown, FiscalYearConfig, InputRecord, LegalStructure,
    TaxCalculation,
};

/// Special-deduction tag that makes a company eligible for the reduced rate.
pub const STARTUP_TAG: &str = "startup";

/// Simulates the annual tax burden of each legal structure under one year's
/// policy.
#[derive(Debug, Clone)]
pub struct RegimeSimulator<'a> {
    config: &'a FiscalYearConfig,
}

/// Profit tax of an incorporated structure.
enum ProfitTax {
    Corporate { preferential: bool },
    Cooperative,
}

impl<'a> RegimeSimulator<'a> {
    pub fn new(config: &'a FiscalYearConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a FiscalYearConfig {
        self.config
    }

    /// Dispatches to the simulation for `structure`.
    pub fn simulate(
        &self,
        structure: LegalStructure,
        revenue: Decimal,
        input: &InputRecord,
        breakdown: Option<&ExpenseBreakdown>,
    ) -> TaxCalculation {
        match structure {
            LegalStructure::SelfEmployed | LegalStructure::CivilPartnership => {
                self.personal(structure, revenue, input, breakdown)
            }
            LegalStructure::LimitedCompany => self.limited_company(revenue, input, breakdown),
            LegalStructure::Cooperative => self.cooperative(revenue, input, breakdown),
        }
    }

    /// Self-employed (autónomo) under direct estimation.
    pub fn self_employed(
        &self,
        revenue: Decimal,
        input: &InputRecord,
        breakdown: Option<&ExpenseBreakdown>,
    ) -> TaxCalculation {
        self.personal(LegalStructure::SelfEmployed, revenue, input, breakdown)
    }

    /// Limited company (SL) paying its administrator a salary.
    pub fn limited_company(
        &self,
        revenue: Decimal,
        input: &InputRecord,
        breakdown: Option<&ExpenseBreakdown>,
    ) -> TaxCalculation {
        let preferential = input.has_special_deduction(STARTUP_TAG);
        self.incorporated(
            LegalStructure::LimitedCompany,
            revenue,
            input,
            breakdown,
            self.config.compensation.company_salary_cap,
            ProfitTax::Corporate { preferential },
        )
    }

    /// Worker cooperative, taxed at the cooperative rate.
    pub fn cooperative(
        &self,
        revenue: Decimal,
        input: &InputRecord,
        breakdown: Option<&ExpenseBreakdown>,
    ) -> TaxCalculation {
        self.incorporated(
            LegalStructure::Cooperative,
            revenue,
            input,
            breakdown,
            self.config.compensation.cooperative_salary_cap,
            ProfitTax::Cooperative,
        )
    }

    fn personal(
        &self,
        structure: LegalStructure,
        revenue: Decimal,
        input: &InputRecord,
        breakdown: Option<&ExpenseBreakdown>,
    ) -> TaxCalculation {
        let expenses = self.operating_expenses(revenue, input, breakdown);
        let taxable_income = non_negative(revenue - expenses);
        let income_tax = self.config.income_tax.tax(taxable_income);
        let social_security = ContributionCalculator::new(&self.config.contributions)
            .contribution(ContributionKind::SelfEmployed, Some(taxable_income));

        self.assemble(
            structure,
            revenue,
            expenses,
            taxable_income,
            (Some(income_tax), None),
            social_security,
        )
    }

    fn incorporated(
        &self,
        structure: LegalStructure,
        revenue: Decimal,
        input: &InputRecord,
        breakdown: Option<&ExpenseBreakdown>,
        salary_cap: Decimal,
        profit_tax: ProfitTax,
    ) -> TaxCalculation {
        let expenses = self.operating_expenses(revenue, input, breakdown);
        let salary = (revenue * self.config.compensation.salary_ratio).min(salary_cap);
        let total_expenses = expenses + salary;
        let taxable_income = non_negative(revenue - total_expenses);

        let corporate_tax = match profit_tax {
            ProfitTax::Corporate { preferential } => {
                brackets::corporate_tax(taxable_income, &self.config.corporate, preferential)
            }
            ProfitTax::Cooperative => {
                brackets::flat_tax(taxable_income, self.config.corporate.cooperative_rate)
            }
        };
        let social_security = ContributionCalculator::new(&self.config.contributions)
            .contribution(ContributionKind::Employee, Some(salary));

        debug!(%structure, %salary, %taxable_income, "simulated incorporated structure");

        self.assemble(
            structure,
            revenue,
            total_expenses,
            taxable_income,
            (None, Some(corporate_tax)),
            social_security,
        )
    }

    fn operating_expenses(
        &self,
        revenue: Decimal,
        input: &InputRecord,
        breakdown: Option<&ExpenseBreakdown>,
    ) -> Decimal {
        ExpenseEstimator::new(&self.config.expenses).estimate(
            revenue,
            &input.economic_sector,
            input.has_employees(),
            breakdown,
        )
    }

    /// VAT actually borne on revenue.
    pub fn vat(
        &self,
        revenue: Decimal,
    ) -> Decimal {
        percent_of(revenue, self.config.vat.rate) * self.config.vat.effective_factor
    }

    fn assemble(
        &self,
        structure: LegalStructure,
        revenue: Decimal,
        deductible_expenses: Decimal,
        taxable_income: Decimal,
        (income_tax, corporate_tax): (Option<Decimal>, Option<Decimal>),
        social_security: Decimal,
    ) -> TaxCalculation {
        let vat = self.vat(revenue);
        let profit_tax = income_tax.or(corporate_tax).unwrap_or(Decimal::ZERO);
        let total_taxes = profit_tax + vat + social_security;
        let net_income = revenue - deductible_expenses - total_taxes;
        let effective_rate = ratio_percent(total_taxes, revenue).unwrap_or(Decimal::ZERO);

        TaxCalculation {
            structure,
            gross_revenue: revenue,
            deductible_expenses,
            taxable_income,
            income_tax,
            corporate_tax,
            vat,
            social_security,
            total_taxes,
            net_income,
            effective_rate,
        }
    }
}
