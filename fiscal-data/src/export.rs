//! CSV exports for simulations and the expert projection table.

use std::io::Write;

use fiscal_core::calculations::ProjectionRow;
use fiscal_core::calculations::common::round_half_up;
use fiscal_core::{InputRecord, TaxCalculation};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One row of the accounting-software export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRecord {
    pub company_name: String,
    pub regime: String,
    pub gross_revenue: Decimal,
    pub deductible_expenses: Decimal,
    pub taxable_income: Decimal,
    pub total_taxes: Decimal,
    pub net_income: Decimal,
}

impl SimulationRecord {
    pub fn new(
        input: &InputRecord,
        calculation: &TaxCalculation,
        regime: &str,
    ) -> Self {
        Self {
            company_name: input.company_name_or_default().to_string(),
            regime: regime.to_string(),
            gross_revenue: round_half_up(calculation.gross_revenue),
            deductible_expenses: round_half_up(calculation.deductible_expenses),
            taxable_income: round_half_up(calculation.taxable_income),
            total_taxes: round_half_up(calculation.total_taxes),
            net_income: round_half_up(calculation.net_income),
        }
    }
}

fn writer<W: Write>(
    out: W,
    delimiter: u8,
) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out)
}

/// Writes simulation records as semicolon-separated values with a header.
pub fn write_simulations<W: Write>(
    out: W,
    records: &[SimulationRecord],
) -> Result<(), ExportError> {
    let mut csv = writer(out, b';');
    if records.is_empty() {
        csv.write_record([
            "companyName",
            "regime",
            "grossRevenue",
            "deductibleExpenses",
            "taxableIncome",
            "totalTaxes",
            "netIncome",
        ])?;
    }
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct ProjectionCsvRow {
    #[serde(rename = "Año")]
    year: i32,
    #[serde(rename = "EBITDA")]
    ebitda: String,
    #[serde(rename = "Amortización")]
    amortization: String,
    #[serde(rename = "Inversiones")]
    investments: String,
    #[serde(rename = "Base")]
    taxable_income: String,
    #[serde(rename = "IRPF")]
    income_tax: String,
    #[serde(rename = "IS")]
    corporate_tax: String,
}

fn cents(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value))
}

/// Writes the expert projection as comma-separated values, amounts with two
/// decimals.
///
/// Nothing is written for an empty projection.
pub fn write_projection<W: Write>(
    out: W,
    rows: &[ProjectionRow],
) -> Result<(), ExportError> {
    let mut csv = writer(out, b',');
    for row in rows {
        csv.serialize(ProjectionCsvRow {
            year: row.year,
            ebitda: cents(row.ebitda),
            amortization: cents(row.amortization),
            investments: cents(row.investments),
            taxable_income: cents(row.taxable_income),
            income_tax: cents(row.income_tax),
            corporate_tax: cents(row.corporate_tax),
        })?;
    }
    csv.flush()?;
    Ok(())
}
