//! Side-by-side IRPF and IS bases for the same gross income.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::brackets;
use super::common::non_negative;
use crate::models::FiscalYearConfig;
use crate::parsing::bounded_amount;

/// One side of the comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBase {
    pub gross_income: Decimal,
    pub deductible_expenses: Decimal,
    pub taxable_income: Decimal,
    pub tax: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoubleEntry {
    pub income_tax: TaxBase,
    pub corporate_tax: TaxBase,
    /// Income tax minus corporate tax.
    pub difference: Decimal,
}

/// Taxes the same gross income under personal income tax with
/// `irpf_expenses` and under general-rate corporate tax with `is_expenses`
/// plus `extra_deductions`. Amounts beyond the supported maximum count as
/// zero.
pub fn double_entry(
    config: &FiscalYearConfig,
    gross_income: Decimal,
    irpf_expenses: Decimal,
    is_expenses: Decimal,
    extra_deductions: Decimal,
) -> DoubleEntry {
    let gross_income = bounded_amount(gross_income, "gross_income");
    let irpf_expenses = bounded_amount(irpf_expenses, "irpf_expenses");
    let is_expenses = bounded_amount(is_expenses, "is_expenses");
    let extra_deductions = bounded_amount(extra_deductions, "extra_deductions");

    let irpf_taxable = non_negative(gross_income - irpf_expenses);
    let irpf_tax = config.income_tax.tax(irpf_taxable);

    let is_deductions = is_expenses + extra_deductions;
    let is_taxable = non_negative(gross_income - is_deductions);
    let is_tax = brackets::corporate_tax(is_taxable, &config.corporate, false);

    DoubleEntry {
        income_tax: TaxBase {
            gross_income,
            deductible_expenses: irpf_expenses,
            taxable_income: irpf_taxable,
            tax: irpf_tax,
        },
        corporate_tax: TaxBase {
            gross_income,
            deductible_expenses: is_deductions,
            taxable_income: is_taxable,
            tax: is_tax,
        },
        difference: irpf_tax - is_tax,
    }
}
