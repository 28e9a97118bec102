//! Runs the demo profiles shipped with the CLI through the whole pipeline.

use std::path::PathBuf;

use chrono::NaiveDate;
use fiscal_cli::app::{self, AppContext};
use fiscal_cli::render;
use fiscal_cli::utils::read_json;
use fiscal_core::LegalStructure;
use fiscal_core::calculations::ProjectionInput;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join(name)
}

fn context() -> AppContext {
    AppContext::load(None, None, 2024).expect("built-in policy loads")
}

#[test]
fn test_demo_profile_with_itemized_expenses() {
    let input = app::load_input(&demo("profile.json")).expect("profile loads");
    let expenses = demo("expenses.json");
    let breakdown = app::load_breakdown(Some(expenses.as_path())).expect("expenses load");

    let calc = context().simulate(&input, LegalStructure::SelfEmployed, breakdown.as_ref());

    assert_eq!(calc.taxable_income, dec!(40000));
    assert_eq!(calc.income_tax, Some(dec!(10501.50)));
    assert!(calc.total_taxes > dec!(30000));
    assert!(calc.net_income < dec!(10000));
}

#[test]
fn test_demo_report_renders_every_section() {
    let input = app::load_input(&demo("profile.json")).expect("profile loads");
    let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

    let report = context().report(&input, None, today).expect("report builds");
    let text = render::render_report(&report);

    assert_eq!(report.company_name, "Acme Software");
    assert!(text.starts_with("Informe fiscal 2024 - Acme Software"));
    assert!(text.contains("Perfil de riesgo: Equilibrio riesgo-beneficio (50/100)"));
    assert!(text.contains("Próximas obligaciones:"));
    assert!(text.contains("Modelo 303"));
    assert_eq!(report.obligations.len(), 3);
}

#[test]
fn test_demo_projection_rows() {
    let rows: Vec<ProjectionInput> = read_json(&demo("projection.json")).expect("rows load");

    let projected = context().project(&rows);

    assert_eq!(projected.len(), 3);
    assert_eq!(projected[0].taxable_income, dec!(65000));
    assert_eq!(projected[2].investments, dec!(0));
    assert_eq!(projected[2].taxable_income, dec!(135000));
}

#[tokio::test]
async fn test_demo_feed_has_no_match_for_tech_profile() {
    let input = app::load_input(&demo("profile.json")).expect("profile loads");
    let location = demo("feed.json").display().to_string();

    let rule = app::external_recommendation(Some(&location), &input).await;

    assert_eq!(rule, None);
}
