//! Social-security contributions.
//!
//! Self-employed workers (RETA) contribute on a monthly base derived from
//! their net income, clamped to the legal floor and ceiling, or pay the
//! minimum monthly quota when they declare no income. Salaried
//! administrators contribute a combined employer and employee share of their
//! salary.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{ContributionKind, ContributionPolicy};

/// Calculator bound to one year's contribution constants.
#[derive(Debug, Clone)]
pub struct ContributionCalculator<'a> {
    policy: &'a ContributionPolicy,
}

impl<'a> ContributionCalculator<'a> {
    pub fn new(policy: &'a ContributionPolicy) -> Self {
        Self { policy }
    }

    /// Annual contribution for `kind`.
    ///
    /// `reference_income` is annual net income for the self-employed and the
    /// annual salary for employees. Missing or non-positive income gives the
    /// minimum quota for the self-employed and nothing for employees.
    pub fn contribution(
        &self,
        kind: ContributionKind,
        reference_income: Option<Decimal>,
    ) -> Decimal {
        let income = reference_income.filter(|income| *income > Decimal::ZERO);
        match (kind, income) {
            (ContributionKind::SelfEmployed, Some(income)) => self.self_employed(income),
            (ContributionKind::SelfEmployed, None) => self.minimum_quota(),
            (ContributionKind::Employee, Some(salary)) => salary * self.policy.employee_rate,
            (ContributionKind::Employee, None) => Decimal::ZERO,
        }
    }

    /// Monthly contribution base for an annual income, before the rate.
    pub fn monthly_base(
        &self,
        annual_income: Decimal,
    ) -> Decimal {
        let months = self.months();
        let monthly = annual_income / months;
        let base = monthly
            .max(self.policy.monthly_base_floor)
            .min(self.policy.monthly_base_ceiling);
        if base != monthly {
            debug!(%monthly, %base, "contribution base clamped");
        }
        base
    }

    /// Clamps on annual amounts so that an unclamped income is not divided
    /// and re-multiplied by the month count.
    fn self_employed(
        &self,
        annual_income: Decimal,
    ) -> Decimal {
        let months = self.months();
        let annual_base = annual_income
            .max(self.policy.monthly_base_floor * months)
            .min(self.policy.monthly_base_ceiling * months);
        annual_base * self.policy.self_employed_rate
    }

    fn minimum_quota(&self) -> Decimal {
        self.policy.self_employed_minimum_monthly * self.months()
    }

    fn months(&self) -> Decimal {
        Decimal::from(self.policy.months)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::test_support::test_config;

    #[test]
    fn self_employed_without_income_pays_minimum_quota() {
        let config = test_config();
        let calculator = ContributionCalculator::new(&config.contributions);

        assert_eq!(
            calculator.contribution(ContributionKind::SelfEmployed, None),
            dec!(3531.60)
        );
        assert_eq!(
            calculator.contribution(ContributionKind::SelfEmployed, Some(Decimal::ZERO)),
            dec!(3531.60)
        );
    }

    #[test]
    fn self_employed_low_income_uses_base_floor() {
        let config = test_config();
        let calculator = ContributionCalculator::new(&config.contributions);

        // 6000 / 12 = 500, clamped up to 900
        let contribution = calculator.contribution(ContributionKind::SelfEmployed, Some(dec!(6000)));

        assert_eq!(contribution, dec!(900) * dec!(12) * dec!(0.3065));
    }

    #[test]
    fn self_employed_high_income_uses_base_ceiling() {
        let config = test_config();
        let calculator = ContributionCalculator::new(&config.contributions);

        let contribution =
            calculator.contribution(ContributionKind::SelfEmployed, Some(dec!(120000)));

        assert_eq!(contribution, dec!(4070) * dec!(12) * dec!(0.3065));
    }

    #[test]
    fn self_employed_mid_income_contributes_on_actual_base() {
        let config = test_config();
        let calculator = ContributionCalculator::new(&config.contributions);

        let contribution =
            calculator.contribution(ContributionKind::SelfEmployed, Some(dec!(36000)));

        assert_eq!(contribution, dec!(11034));
    }

    #[test]
    fn employee_contribution_is_proportional_to_salary() {
        let config = test_config();
        let calculator = ContributionCalculator::new(&config.contributions);

        assert_eq!(
            calculator.contribution(ContributionKind::Employee, Some(dec!(30000))),
            dec!(8865)
        );
    }

    #[test]
    fn employee_without_salary_pays_nothing() {
        let config = test_config();
        let calculator = ContributionCalculator::new(&config.contributions);

        assert_eq!(
            calculator.contribution(ContributionKind::Employee, None),
            Decimal::ZERO
        );
    }

    #[test]
    fn monthly_base_is_within_floor_and_ceiling() {
        let config = test_config();
        let calculator = ContributionCalculator::new(&config.contributions);

        assert_eq!(calculator.monthly_base(dec!(1)), dec!(900));
        assert_eq!(calculator.monthly_base(dec!(24000)), dec!(2000));
        assert_eq!(calculator.monthly_base(dec!(1000000)), dec!(4070));
    }
}
