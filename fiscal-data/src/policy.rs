//! Fiscal-year policy files.
//!
//! A policy file is TOML holding one `[[years]]` table per fiscal year, plus
//! the path of the CSV file with the income-tax brackets. Relative bracket
//! paths are resolved against the policy file's directory.

use std::fs;
use std::path::{Path, PathBuf};

use fiscal_core::{
    CompensationPolicy, ContributionPolicy, CorporateTaxPolicy, ExpensePolicy, FiscalYearConfig,
    PolicyBook, PolicyError, VatPolicy,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::loader::{BracketLoader, BracketLoaderError};

const BUILTIN_POLICY: &str = include_str!("../data/policy_2024.toml");
const BUILTIN_BRACKETS: &str = include_str!("../data/irpf_brackets.csv");

#[derive(Debug, Error)]
pub enum PolicyLoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid policy file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Brackets(#[from] BracketLoaderError),

    #[error("no income tax brackets for tax year {0}")]
    MissingBrackets(i32),

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// On-disk shape of a policy file.
#[derive(Debug, Deserialize)]
pub struct PolicyFile {
    /// CSV file with the income-tax brackets of every year listed below.
    pub brackets: PathBuf,
    #[serde(default)]
    pub years: Vec<YearSection>,
}

/// Everything in a [`FiscalYearConfig`] except the income-tax schedule,
/// which comes from the brackets CSV.
#[derive(Debug, Deserialize)]
pub struct YearSection {
    pub tax_year: i32,
    pub corporate: CorporateTaxPolicy,
    pub vat: VatPolicy,
    pub contributions: ContributionPolicy,
    pub expenses: ExpensePolicy,
    pub compensation: CompensationPolicy,
}

impl PolicyFile {
    pub fn parse(text: &str) -> Result<Self, PolicyLoadError> {
        Ok(toml::from_str(text)?)
    }

    /// Joins the year sections with their brackets and validates the result.
    pub fn into_book(
        self,
        brackets_csv: impl std::io::Read,
    ) -> Result<PolicyBook, PolicyLoadError> {
        let mut schedules = BracketLoader::load(brackets_csv)?;

        let configs = self
            .years
            .into_iter()
            .map(|section| {
                let income_tax = schedules
                    .remove(&section.tax_year)
                    .ok_or(PolicyLoadError::MissingBrackets(section.tax_year))?;
                Ok(FiscalYearConfig {
                    tax_year: section.tax_year,
                    income_tax,
                    corporate: section.corporate,
                    vat: section.vat,
                    contributions: section.contributions,
                    expenses: section.expenses,
                    compensation: section.compensation,
                })
            })
            .collect::<Result<Vec<_>, PolicyLoadError>>()?;

        for year in schedules.keys() {
            debug!(year, "brackets without a policy section ignored");
        }

        Ok(PolicyBook::new(configs)?)
    }
}

/// Loads a policy file and the brackets CSV it points to.
pub fn load_policy_book(path: &Path) -> Result<PolicyBook, PolicyLoadError> {
    let text = fs::read_to_string(path).map_err(|source| PolicyLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file = PolicyFile::parse(&text)?;

    let brackets_path = match path.parent() {
        Some(dir) if file.brackets.is_relative() => dir.join(&file.brackets),
        _ => file.brackets.clone(),
    };
    let brackets = fs::File::open(&brackets_path).map_err(|source| PolicyLoadError::Io {
        path: brackets_path.clone(),
        source,
    })?;

    let book = file.into_book(brackets)?;
    info!(
        path = %path.display(),
        years = ?book.years().collect::<Vec<_>>(),
        "loaded fiscal policy"
    );
    Ok(book)
}

/// The 2024 Spanish policy compiled into the binary.
pub fn builtin_book() -> Result<PolicyBook, PolicyLoadError> {
    PolicyFile::parse(BUILTIN_POLICY)?.into_book(BUILTIN_BRACKETS.as_bytes())
}
