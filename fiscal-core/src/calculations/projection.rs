//! Three-year expert projection.
//!
//! Each row starts from EBITDA, deducts amortization and investments, and
//! reports both the personal income tax and the general-rate corporate tax
//! the resulting base would pay under that year's policy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::brackets;
use super::common::non_negative;
use crate::models::PolicyBook;
use crate::parsing::coerce_amount;

/// Number of years in the expert table.
pub const PROJECTION_YEARS: usize = 3;

/// One row as typed by the user; amounts are free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionInput {
    pub year: i32,
    pub ebitda: String,
    pub amortization: String,
    pub investments: String,
}

impl ProjectionInput {
    /// Empty rows for `first_year` and the two following years.
    pub fn blank_rows(first_year: i32) -> [ProjectionInput; PROJECTION_YEARS] {
        [0, 1, 2].map(|offset| ProjectionInput {
            year: first_year + offset,
            ..Default::default()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRow {
    pub year: i32,
    pub ebitda: Decimal,
    pub amortization: Decimal,
    pub investments: Decimal,
    pub taxable_income: Decimal,
    pub income_tax: Decimal,
    pub corporate_tax: Decimal,
}

impl ProjectionRow {
    /// Income tax minus corporate tax; positive when incorporating pays off.
    pub fn difference(&self) -> Decimal {
        self.income_tax - self.corporate_tax
    }
}

/// Projects every row with the policy that applies to its year.
///
/// Non-numeric amounts count as zero and a negative base is taxed as zero.
pub fn project(
    rows: &[ProjectionInput],
    book: &PolicyBook,
) -> Vec<ProjectionRow> {
    rows.iter()
        .map(|row| {
            let config = book.resolve(row.year);
            let ebitda = coerce_amount(&row.ebitda);
            let amortization = coerce_amount(&row.amortization);
            let investments = coerce_amount(&row.investments);
            let taxable_income = non_negative(ebitda - amortization - investments);

            ProjectionRow {
                year: row.year,
                ebitda,
                amortization,
                investments,
                taxable_income,
                income_tax: config.income_tax.tax(taxable_income),
                corporate_tax: brackets::corporate_tax(taxable_income, &config.corporate, false),
            }
        })
        .collect()
}
