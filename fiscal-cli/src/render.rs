//! Plain-text rendering of results for the terminal.

use std::fmt::Write;

use fiscal_core::calculations::{DoubleEntry, ProjectionRow, ScenarioComparison};
use fiscal_core::{
    ExternalRule, FiscalAlert, FiscalReport, FiscalRule, TaxCalculation, TaxObligation, TaxRegime,
};

use crate::utils::{format_euros, format_percent, format_whole_euros};

// `write!` into a `String` cannot fail.

pub fn render_calculation(calc: &TaxCalculation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", calc.structure);
    let _ = writeln!(out, "  Ingresos brutos:      {}", format_euros(calc.gross_revenue));
    let _ = writeln!(out, "  Gastos deducibles:    {}", format_euros(calc.deductible_expenses));
    let _ = writeln!(out, "  Base imponible:       {}", format_euros(calc.taxable_income));
    if let Some(income_tax) = calc.income_tax {
        let _ = writeln!(out, "  IRPF:                 {}", format_euros(income_tax));
    }
    if let Some(corporate_tax) = calc.corporate_tax {
        let _ = writeln!(out, "  Impuesto Sociedades:  {}", format_euros(corporate_tax));
    }
    let _ = writeln!(out, "  IVA:                  {}", format_euros(calc.vat));
    let _ = writeln!(out, "  Seguridad Social:     {}", format_euros(calc.social_security));
    let _ = writeln!(out, "  Total impuestos:      {}", format_euros(calc.total_taxes));
    let _ = writeln!(out, "  Ingreso neto:         {}", format_euros(calc.net_income));
    let _ = writeln!(out, "  Tipo efectivo:        {}", format_percent(Some(calc.effective_rate)));
    out
}

pub fn render_comparison(comparison: &ScenarioComparison) -> String {
    let mut out = render_calculation(&comparison.self_employed);
    out.push('\n');
    out.push_str(&render_calculation(&comparison.limited_company));
    let _ = writeln!(out);
    let _ = writeln!(out, "Ahorro con SL: {}", format_euros(comparison.savings));
    let _ = writeln!(out, "{}", comparison.recommendation);
    out
}

pub fn render_rules(
    regime: &TaxRegime,
    rules: &[&FiscalRule],
    alerts: &[FiscalAlert],
    external: Option<&ExternalRule>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Régimen recomendado: {}", regime.name);

    if rules.is_empty() {
        let _ = writeln!(out, "\nNinguna regla aplicable.");
    }
    for rule in rules {
        let _ = writeln!(out, "\n[{}] {}", rule.priority, rule.name);
        let _ = writeln!(out, "  {}", rule.recommendation);
        for deduction in &rule.deductions {
            let _ = writeln!(out, "  + {deduction}");
        }
        for risk in &rule.risks {
            let _ = writeln!(out, "  ! {risk}");
        }
    }

    if !alerts.is_empty() {
        let _ = writeln!(out, "\nAlertas:");
        for alert in alerts {
            let _ = writeln!(out, "  {}: {}", alert.title, alert.description);
        }
    }

    if let Some(rule) = external {
        let _ = writeln!(out, "\nRecomendación externa: {}", rule.recommendation);
    }
    out
}

pub fn render_obligations(obligations: &[TaxObligation]) -> String {
    let mut out = String::new();
    for obligation in obligations {
        let _ = writeln!(out, "{:<10} {}", obligation.model, obligation.due_date_es());
    }
    out
}

pub fn render_report(report: &FiscalReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();
    let _ = writeln!(out, "Informe fiscal {} - {}", report.tax_year, report.company_name);
    let _ = writeln!(out, "Estructura recomendada: {}", summary.regime_name);
    let _ = writeln!(out, "  Impuestos a pagar:     {}", format_whole_euros(summary.tax_due));
    let _ = writeln!(out, "  Ahorro neto:           {}", format_whole_euros(summary.net_saving));
    let _ = writeln!(out, "  Ingresos brutos:       {}", format_whole_euros(summary.gross_revenue));
    let _ = writeln!(out, "  Ingreso neto:          {}", format_whole_euros(summary.net_income));
    let _ = writeln!(out, "  Deducciones aplicables: {}", summary.applicable_deductions);

    let _ = writeln!(out, "\n{}", report.comparison.recommendation);

    if !report.deductions.is_empty() {
        let _ = writeln!(out, "\nDeducciones:");
        for deduction in &report.deductions {
            let _ = writeln!(out, "  {}", deduction.name);
            for warning in &deduction.warnings {
                let _ = writeln!(out, "    ! {warning}");
            }
        }
    }

    if !report.risks.is_empty() {
        let _ = writeln!(out, "\nRiesgos:");
        for risk in &report.risks {
            let _ = writeln!(out, "  {risk}");
        }
    }

    if !report.risk_advice.label.is_empty() {
        let _ = writeln!(
            out,
            "\nPerfil de riesgo: {} ({}/100)",
            report.risk_advice.label, report.risk_advice.score
        );
    }

    if !report.alerts.is_empty() {
        let _ = writeln!(out, "\nAlertas:");
        for alert in &report.alerts {
            let _ = writeln!(out, "  {}: {}", alert.title, alert.description);
        }
    }

    let _ = writeln!(out, "\nPróximas obligaciones:");
    for line in render_obligations(&report.obligations).lines() {
        let _ = writeln!(out, "  {line}");
    }

    if let Some(rule) = &report.external_recommendation {
        let _ = writeln!(out, "\nRecomendación externa: {}", rule.recommendation);
    }
    out
}

pub fn render_projection(rows: &[ProjectionRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:>16} {:>16} {:>16} {:>16}",
        "Año", "Base", "IRPF", "IS", "Diferencia"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<6} {:>16} {:>16} {:>16} {:>16}",
            row.year,
            format_euros(row.taxable_income),
            format_euros(row.income_tax),
            format_euros(row.corporate_tax),
            format_euros(row.difference()),
        );
    }
    out
}

pub fn render_double_entry(entry: &DoubleEntry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<22} {:>16} {:>16}", "", "IRPF", "IS");
    let _ = writeln!(
        out,
        "{:<22} {:>16} {:>16}",
        "Ingresos brutos",
        format_euros(entry.income_tax.gross_income),
        format_euros(entry.corporate_tax.gross_income),
    );
    let _ = writeln!(
        out,
        "{:<22} {:>16} {:>16}",
        "Gastos deducibles",
        format_euros(entry.income_tax.deductible_expenses),
        format_euros(entry.corporate_tax.deductible_expenses),
    );
    let _ = writeln!(
        out,
        "{:<22} {:>16} {:>16}",
        "Base imponible",
        format_euros(entry.income_tax.taxable_income),
        format_euros(entry.corporate_tax.taxable_income),
    );
    let _ = writeln!(
        out,
        "{:<22} {:>16} {:>16}",
        "Cuota",
        format_euros(entry.income_tax.tax),
        format_euros(entry.corporate_tax.tax),
    );
    let _ = writeln!(out, "Diferencia: {}", format_euros(entry.difference));
    out
}

#[cfg(test)]
mod tests {
    use fiscal_core::LegalStructure;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn calculation_shows_only_the_applicable_profit_tax() {
        let calc = TaxCalculation {
            structure: LegalStructure::SelfEmployed,
            gross_revenue: dec!(65000),
            deductible_expenses: dec!(25000),
            taxable_income: dec!(40000),
            income_tax: Some(dec!(10501.50)),
            corporate_tax: None,
            vat: dec!(10920),
            social_security: dec!(12260),
            total_taxes: dec!(33681.50),
            net_income: dec!(6318.50),
            effective_rate: dec!(51.82),
        };

        let text = render_calculation(&calc);

        assert!(text.starts_with("Autónomo\n"));
        assert!(text.contains("IRPF:                 10.501,50 €"));
        assert!(!text.contains("Impuesto Sociedades"));
        assert!(text.contains("Tipo efectivo:        51.8 %"));
    }

    #[test]
    fn projection_lists_one_line_per_year() {
        let rows = [ProjectionRow {
            year: 2025,
            ebitda: dec!(50000),
            amortization: dec!(0),
            investments: dec!(0),
            taxable_income: dec!(50000),
            income_tax: dec!(14817.50),
            corporate_tax: dec!(12500),
        }];

        let text = render_projection(&rows);

        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().contains("2.317,50 €"));
    }
}
