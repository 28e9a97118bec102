use std::path::Path;

use anyhow::{Context, Result};
use fiscal_core::calculations::{
    DoubleEntry, ProjectionInput, ProjectionRow, RegimeSimulator, ScenarioComparator,
    ScenarioComparison, double_entry, project,
};
use fiscal_core::rules::default_regimes;
use fiscal_core::{
    DeductionCatalog, ExpenseBreakdown, ExternalRule, ExternalRuleCache, FiscalReport,
    FiscalRule, FiscalRuleEngine, FiscalYearConfig, InputRecord, LegalStructure, PolicyBook,
    TaxCalculation,
};
use fiscal_data::{SimulationRecord, builtin_book, feed_for, load_policy_book};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::utils::read_json;

/// Policy, rule tables and target year shared by every command.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub book: PolicyBook,
    pub engine: FiscalRuleEngine,
    pub catalog: DeductionCatalog,
    pub year: i32,
}

impl AppContext {
    /// Loads the policy from `policy` (or the built-in one) and the rule
    /// table from `rules` (or the built-in Spanish rules).
    pub fn load(
        policy: Option<&Path>,
        rules: Option<&Path>,
        year: i32,
    ) -> Result<Self> {
        let book = match policy {
            Some(path) => load_policy_book(path)
                .with_context(|| format!("failed to load policy {}", path.display()))?,
            None => builtin_book().context("built-in policy is invalid")?,
        };

        let engine = match rules {
            Some(path) => {
                let rules: Vec<FiscalRule> = read_json(path)?;
                FiscalRuleEngine::new(rules, default_regimes())
                    .with_context(|| format!("invalid rule table {}", path.display()))?
            }
            None => FiscalRuleEngine::spanish_defaults(),
        };

        debug!(year, rules = engine.rules().len(), "application context ready");
        Ok(Self {
            book,
            engine,
            catalog: DeductionCatalog::spanish_defaults(),
            year,
        })
    }

    pub fn config(&self) -> &FiscalYearConfig {
        self.book.resolve(self.year)
    }

    pub fn simulator(&self) -> RegimeSimulator<'_> {
        RegimeSimulator::new(self.config())
    }

    pub fn simulate(
        &self,
        input: &InputRecord,
        structure: LegalStructure,
        breakdown: Option<&ExpenseBreakdown>,
    ) -> TaxCalculation {
        self.simulator()
            .simulate(structure, input.effective_revenue(), input, breakdown)
    }

    pub fn compare(
        &self,
        input: &InputRecord,
        breakdown: Option<&ExpenseBreakdown>,
    ) -> ScenarioComparison {
        ScenarioComparator::new(self.simulator()).compare_with_expenses(
            input.effective_revenue(),
            input,
            breakdown,
        )
    }

    pub fn report(
        &self,
        input: &InputRecord,
        breakdown: Option<&ExpenseBreakdown>,
        today: chrono::NaiveDate,
    ) -> Result<FiscalReport> {
        FiscalReport::build(
            input,
            breakdown,
            self.config(),
            &self.engine,
            &self.catalog,
            today,
        )
        .context("cannot build the report")
    }

    pub fn project(
        &self,
        rows: &[ProjectionInput],
    ) -> Vec<ProjectionRow> {
        project(rows, &self.book)
    }

    pub fn double_entry(
        &self,
        gross_income: Decimal,
        irpf_expenses: Decimal,
        is_expenses: Decimal,
        extra_deductions: Decimal,
    ) -> DoubleEntry {
        double_entry(
            self.config(),
            gross_income,
            irpf_expenses,
            is_expenses,
            extra_deductions,
        )
    }

    /// One export record per structure in `structures`.
    pub fn export_records(
        &self,
        input: &InputRecord,
        breakdown: Option<&ExpenseBreakdown>,
        structures: &[LegalStructure],
    ) -> Vec<SimulationRecord> {
        structures
            .iter()
            .map(|structure| {
                let calc = self.simulate(input, *structure, breakdown);
                SimulationRecord::new(input, &calc, structure.as_str())
            })
            .collect()
    }
}

pub fn load_input(path: &Path) -> Result<InputRecord> {
    let input: InputRecord = read_json(path)?;
    info!(
        path = %path.display(),
        company = input.company_name_or_default(),
        "loaded business profile"
    );
    Ok(input)
}

pub fn load_breakdown(path: Option<&Path>) -> Result<Option<ExpenseBreakdown>> {
    path.map(read_json::<ExpenseBreakdown>).transpose()
}

/// First external rule matching `input`. Feed failures are logged and
/// treated as "no recommendation".
pub async fn external_recommendation(
    location: Option<&str>,
    input: &InputRecord,
) -> Option<ExternalRule> {
    let location = location?;
    let feed = match feed_for(location) {
        Ok(feed) => feed,
        Err(error) => {
            warn!(%error, "external rule feed unavailable");
            return None;
        }
    };

    let mut cache = ExternalRuleCache::new(feed);
    match cache.recommendation(input).await {
        Ok(rule) => rule.cloned(),
        Err(error) => {
            warn!(%error, "external rule feed unavailable");
            None
        }
    }
}
