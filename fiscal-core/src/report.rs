//! Complete results for one business profile.
//!
//! [`FiscalReport::build`] runs every part of the engine against an
//! [`InputRecord`]: the structure comparison, rule evaluation, deduction
//! validation, alerts and the filing calendar.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::calculations::{RegimeSimulator, ScenarioComparator, ScenarioComparison};
use crate::models::{
    ExpenseBreakdown, FiscalRule, FiscalYearConfig, InputError, InputRecord, LegalStructure,
    TaxCalculation, TaxRegime,
};
use crate::rules::{
    DeductionCatalog, ExternalRule, FiscalAlert, FiscalRuleEngine, TaxObligation,
    ValidatedDeduction, fiscal_alerts, upcoming_obligations,
};

/// Risk appetite declared on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "conservative" => Some(Self::Conservative),
            "moderate" => Some(Self::Moderate),
            "aggressive" => Some(Self::Aggressive),
            _ => None,
        }
    }
}

/// How the risk profile colours the recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAdvice {
    pub level: Option<RiskLevel>,
    /// 0 to 100, for a progress-style gauge.
    pub score: u8,
    pub label: &'static str,
    pub notes: Vec<&'static str>,
}

impl RiskAdvice {
    pub fn for_level(level: Option<RiskLevel>) -> Self {
        match level {
            Some(RiskLevel::Conservative) => Self {
                level,
                score: 20,
                label: "Estrategias muy seguras",
                notes: vec!["Riesgo muy bajo - Estrategias tradicionales"],
            },
            Some(RiskLevel::Moderate) => Self {
                level,
                score: 50,
                label: "Equilibrio riesgo-beneficio",
                notes: Vec::new(),
            },
            Some(RiskLevel::Aggressive) => Self {
                level,
                score: 80,
                label: "Máxima optimización",
                notes: vec![
                    "Requiere documentación exhaustiva",
                    "Posible mayor escrutinio en inspecciones",
                ],
            },
            None => Self {
                level,
                score: 80,
                label: "",
                notes: Vec::new(),
            },
        }
    }
}

/// Headline figures for the recommended structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub structure: LegalStructure,
    pub regime_name: String,
    pub tax_due: Decimal,
    pub applicable_deductions: usize,
    /// Taxes saved against the alternative structure (negative when the
    /// alternative is cheaper).
    pub net_saving: Decimal,
    pub gross_revenue: Decimal,
    pub net_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FiscalReport {
    pub company_name: String,
    pub tax_year: i32,
    pub revenue: Decimal,
    pub recommended_regime: TaxRegime,
    pub recommended_calculation: TaxCalculation,
    pub comparison: ScenarioComparison,
    pub rules: Vec<FiscalRule>,
    pub deductions: Vec<ValidatedDeduction>,
    pub risks: Vec<String>,
    pub alerts: Vec<FiscalAlert>,
    pub obligations: Vec<TaxObligation>,
    pub summary: ReportSummary,
    pub risk_advice: RiskAdvice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_recommendation: Option<ExternalRule>,
}

impl FiscalReport {
    /// Builds the report for `input` under `config`.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] when the record does not pass
    /// [`InputRecord::validate_for_results`].
    pub fn build(
        input: &InputRecord,
        breakdown: Option<&ExpenseBreakdown>,
        config: &FiscalYearConfig,
        engine: &FiscalRuleEngine,
        catalog: &DeductionCatalog,
        today: NaiveDate,
    ) -> Result<Self, InputError> {
        input.validate_for_results()?;

        let revenue = input.effective_revenue();
        let simulator = RegimeSimulator::new(config);
        let comparison = ScenarioComparator::new(simulator.clone())
            .compare_with_expenses(revenue, input, breakdown);

        let recommended_regime = engine.recommended_structure(input).clone();
        let structure = recommended_regime.kind;
        let recommended_calculation = comparison
            .calculation_for(structure)
            .cloned()
            .unwrap_or_else(|| simulator.simulate(structure, revenue, input, breakdown));
        let alternative = if structure.is_incorporated() {
            &comparison.self_employed
        } else {
            &comparison.limited_company
        };
        let net_saving = alternative.total_taxes - recommended_calculation.total_taxes;

        let rules: Vec<FiscalRule> = engine.evaluate(input).into_iter().cloned().collect();

        let mut requested: Vec<&str> = Vec::new();
        for name in rules.iter().flat_map(|r| r.deductions.iter()) {
            if !requested.contains(&name.as_str()) {
                requested.push(name.as_str());
            }
        }
        let deductions = catalog.validate(requested.as_slice(), structure);

        let risk_advice = RiskAdvice::for_level(RiskLevel::parse(&input.risk_level));
        let mut risks: Vec<String> = Vec::new();
        let collected = rules
            .iter()
            .flat_map(|r| r.risks.iter().map(String::as_str))
            .chain(risk_advice.notes.iter().copied());
        for risk in collected {
            if !risks.iter().any(|r| r == risk) {
                risks.push(risk.to_string());
            }
        }

        let summary = ReportSummary {
            structure,
            regime_name: recommended_regime.name.clone(),
            tax_due: recommended_calculation.total_taxes,
            applicable_deductions: deductions.len(),
            net_saving,
            gross_revenue: recommended_calculation.gross_revenue,
            net_income: recommended_calculation.net_income,
        };

        let company_name = input.company_name_or_default().to_string();

        info!(
            company = %company_name,
            %revenue,
            %structure,
            rules = rules.len(),
            deductions = deductions.len(),
            "built fiscal report"
        );

        Ok(Self {
            company_name,
            tax_year: config.tax_year,
            revenue,
            recommended_regime,
            recommended_calculation,
            comparison,
            rules,
            deductions,
            risks,
            alerts: fiscal_alerts(input),
            obligations: upcoming_obligations(today),
            summary,
            risk_advice,
            external_recommendation: None,
        })
    }

    /// Attaches the first matching rule from an external feed.
    pub fn with_external_recommendation(
        mut self,
        rule: Option<ExternalRule>,
    ) -> Self {
        self.external_recommendation = rule;
        self
    }
}
