//! Deductible-expense estimation.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{ExpenseBreakdown, ExpensePolicy};

/// Estimates deductible expenses from an itemized breakdown or, failing
/// that, from the sector heuristics of an [`ExpensePolicy`].
#[derive(Debug, Clone)]
pub struct ExpenseEstimator<'a> {
    policy: &'a ExpensePolicy,
}

impl<'a> ExpenseEstimator<'a> {
    pub fn new(policy: &'a ExpensePolicy) -> Self {
        Self { policy }
    }

    /// Annual deductible expenses.
    ///
    /// An itemized breakdown is used as-is, even when it exceeds revenue.
    /// Otherwise the sector ratio (plus the staff surcharge when the business
    /// has employees) is applied to revenue and capped at the policy maximum.
    pub fn estimate(
        &self,
        revenue: Decimal,
        sector: &str,
        has_employees: bool,
        breakdown: Option<&ExpenseBreakdown>,
    ) -> Decimal {
        if let Some(breakdown) = breakdown {
            return breakdown.total();
        }

        let mut ratio = self.policy.ratio_for(sector);
        if has_employees {
            ratio += self.policy.employee_surcharge;
        }

        let estimated = revenue * ratio;
        let cap = revenue * self.policy.max_ratio;
        if estimated > cap {
            debug!(%revenue, %ratio, "estimated expenses capped");
            return cap;
        }
        estimated
    }
}
