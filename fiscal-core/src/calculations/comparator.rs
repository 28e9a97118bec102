//! Self-employed vs. limited-company comparison.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::RegimeSimulator;
use super::common::{ratio_percent, round_half_up};
use crate::models::{ExpenseBreakdown, InputRecord, LegalStructure, TaxCalculation};

/// Outcome of running both main structures on the same business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioComparison {
    pub self_employed: TaxCalculation,
    pub limited_company: TaxCalculation,
    /// Self-employed total minus limited-company total; positive when the SL
    /// is cheaper.
    pub savings: Decimal,
    /// Savings relative to the self-employed total, absent when that total is
    /// zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_percentage: Option<Decimal>,
    pub recommendation: String,
}

impl ScenarioComparison {
    /// The cheaper of the two structures (self-employed on a tie).
    pub fn cheaper(&self) -> LegalStructure {
        if self.savings > Decimal::ZERO {
            LegalStructure::LimitedCompany
        } else {
            LegalStructure::SelfEmployed
        }
    }

    pub fn calculation_for(
        &self,
        structure: LegalStructure,
    ) -> Option<&TaxCalculation> {
        match structure {
            LegalStructure::SelfEmployed => Some(&self.self_employed),
            LegalStructure::LimitedCompany => Some(&self.limited_company),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioComparator<'a> {
    simulator: RegimeSimulator<'a>,
}

impl<'a> ScenarioComparator<'a> {
    pub fn new(simulator: RegimeSimulator<'a>) -> Self {
        Self { simulator }
    }

    /// Compares both structures using estimated expenses.
    pub fn compare(
        &self,
        revenue: Decimal,
        input: &InputRecord,
    ) -> ScenarioComparison {
        self.compare_with_expenses(revenue, input, None)
    }

    /// Compares both structures, using `breakdown` for expenses when given.
    pub fn compare_with_expenses(
        &self,
        revenue: Decimal,
        input: &InputRecord,
        breakdown: Option<&ExpenseBreakdown>,
    ) -> ScenarioComparison {
        let self_employed = self.simulator.self_employed(revenue, input, breakdown);
        let limited_company = self.simulator.limited_company(revenue, input, breakdown);

        let savings = self_employed.total_taxes - limited_company.total_taxes;
        let savings_percentage = ratio_percent(savings, self_employed.total_taxes);
        let recommendation = recommendation_text(savings, savings_percentage);

        ScenarioComparison {
            self_employed,
            limited_company,
            savings,
            savings_percentage,
            recommendation,
        }
    }
}

fn recommendation_text(
    savings: Decimal,
    savings_percentage: Option<Decimal>,
) -> String {
    if savings > Decimal::ZERO {
        let amount = round_half_up(savings);
        match savings_percentage {
            Some(percentage) => {
                let percentage =
                    percentage.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
                format!("La SL ahorra €{amount:.2} anuales ({percentage:.1}%)")
            }
            None => format!("La SL ahorra €{amount:.2} anuales"),
        }
    } else {
        let amount = round_half_up(savings.abs());
        format!("El régimen de autónomos ahorra €{amount:.2} anuales")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::test_support::{tech_input, test_config};

    #[test]
    fn savings_is_exact_difference_of_totals() {
        let config = test_config();
        let comparator = ScenarioComparator::new(RegimeSimulator::new(&config));

        for (label, revenue) in [
            ("Menos de 30.000€", dec!(25000)),
            ("30.000€ - 100.000€", dec!(65000)),
            ("Más de 1M€", dec!(1500000)),
        ] {
            let comparison = comparator.compare(revenue, &tech_input(label));

            assert_eq!(
                comparison.savings,
                comparison.self_employed.total_taxes - comparison.limited_company.total_taxes
            );
        }
    }

    #[test]
    fn high_revenue_favours_limited_company() {
        let config = test_config();
        let comparator = ScenarioComparator::new(RegimeSimulator::new(&config));

        let comparison = comparator.compare(dec!(1500000), &tech_input("Más de 1M€"));

        assert!(comparison.savings > Decimal::ZERO);
        assert_eq!(comparison.cheaper(), LegalStructure::LimitedCompany);
        assert!(comparison.recommendation.starts_with("La SL ahorra €"));
        assert!(comparison.recommendation.ends_with("%)"));
    }

    #[test]
    fn recommendation_for_positive_savings_includes_percentage() {
        let text = recommendation_text(dec!(1234.5), Some(dec!(12.345)));

        assert_eq!(text, "La SL ahorra €1234.50 anuales (12.3%)");
    }

    #[test]
    fn recommendation_for_negative_savings_favours_self_employed() {
        let text = recommendation_text(dec!(-800.125), Some(dec!(-5)));

        assert_eq!(text, "El régimen de autónomos ahorra €800.13 anuales");
    }

    #[test]
    fn recommendation_for_zero_savings_favours_self_employed() {
        let text = recommendation_text(Decimal::ZERO, Some(Decimal::ZERO));

        assert_eq!(text, "El régimen de autónomos ahorra €0.00 anuales");
    }

    #[test]
    fn recommendation_omits_percentage_without_denominator() {
        let text = recommendation_text(dec!(100), None);

        assert_eq!(text, "La SL ahorra €100.00 anuales");
    }

    #[test]
    fn itemized_expenses_flow_into_both_scenarios() {
        let config = test_config();
        let comparator = ScenarioComparator::new(RegimeSimulator::new(&config));
        let breakdown = ExpenseBreakdown {
            office_expenses: dec!(25000),
            ..Default::default()
        };

        let comparison = comparator.compare_with_expenses(
            dec!(65000),
            &tech_input("30.000€ - 100.000€"),
            Some(&breakdown),
        );

        assert_eq!(comparison.self_employed.deductible_expenses, dec!(25000));
        assert_eq!(comparison.limited_company.deductible_expenses, dec!(44500));
    }
}
