use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use fiscal_core::calculations::ProjectionInput;
use fiscal_core::LegalStructure;
use fiscal_core::rules::{fiscal_alerts, upcoming_obligations};
use fiscal_data::{write_projection, write_simulations};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use fiscal_cli::app::{self, AppContext};
use fiscal_cli::utils::read_json;
use fiscal_cli::{logging, render};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Compares Spanish legal structures (autónomo, SL, cooperativa) for a
/// business profile and explains the fiscal rules that apply to it.
#[derive(Debug, Parser)]
#[command(name = "fiscal", version)]
struct Cli {
    /// Policy TOML file. Defaults to the built-in 2024 policy.
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    /// Custom rule table (JSON list of rules). Defaults to the built-in rules.
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Fiscal year whose policy applies. Defaults to the current year.
    #[arg(long, global = true)]
    year: Option<i32>,

    /// Business profile as submitted by the intake form (JSON).
    #[arg(long, short, global = true)]
    input: Option<PathBuf>,

    /// Itemized annual expenses (JSON). Replaces the sector estimate.
    #[arg(long, global = true)]
    expenses: Option<PathBuf>,

    /// External rule feed: an http(s) URL or a JSON file.
    #[arg(long, global = true)]
    feed: Option<String>,

    /// Log filter, e.g. `debug` or `fiscal_core=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate one legal structure.
    Simulate {
        /// autonomo, sl, cooperativa or comunidad_bienes.
        #[arg(long, short, value_parser = parse_structure, default_value = "autonomo")]
        structure: LegalStructure,
    },
    /// Compare self-employment with a limited company.
    Compare,
    /// Show the fiscal rules, recommended regime and alerts for a profile.
    Rules,
    /// Build the full fiscal report.
    Report {
        /// Reference date for the filing calendar (YYYY-MM-DD).
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// List the next filing deadlines.
    Obligations {
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Expert multi-year projection of IRPF against IS.
    Project {
        /// JSON list of `{year, ebitda, amortization, investments}` rows.
        #[arg(long)]
        rows: PathBuf,
        /// Write the table as CSV to this file.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Tax the same gross income under IRPF and under IS.
    DoubleEntry {
        #[arg(long)]
        gross: Decimal,
        #[arg(long, default_value = "0")]
        irpf_expenses: Decimal,
        #[arg(long, default_value = "0")]
        is_expenses: Decimal,
        #[arg(long, default_value = "0")]
        extra: Decimal,
    },
    /// Export simulations as semicolon-separated CSV for accounting software.
    Export {
        /// Structures to export, comma separated.
        #[arg(
            long,
            value_parser = parse_structure,
            value_delimiter = ',',
            default_value = "autonomo,sl"
        )]
        structures: Vec<LegalStructure>,
        /// Output file; stdout when omitted.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

fn parse_structure(s: &str) -> Result<LegalStructure, String> {
    LegalStructure::parse(s).ok_or_else(|| {
        format!("unknown structure '{s}' (expected autonomo, sl, cooperativa or comunidad_bienes)")
    })
}

// ─── output helpers ──────────────────────────────────────────────────────────

fn emit<T: Serialize>(
    json: bool,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, value).context("failed to write JSON")?;
        writeln!(stdout)?;
    } else {
        write!(stdout, "{}", text(value))?;
    }
    Ok(())
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    })
}

fn required_input(cli: &Cli) -> Result<&Path> {
    cli.input
        .as_deref()
        .context("this command needs a business profile (--input profile.json)")
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();

    let cli = Cli::parse();

    if let Some(level) = &cli.log_level {
        logging::set_log_level(level)?;
    }
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }

    let today = Local::now().date_naive();
    let year = cli.year.unwrap_or(today.year());
    let ctx = AppContext::load(cli.policy.as_deref(), cli.rules.as_deref(), year)?;
    debug!(year, resolved = ctx.config().tax_year, "policy selected");

    match &cli.command {
        Command::Simulate { structure } => {
            let input = app::load_input(required_input(&cli)?)?;
            let breakdown = app::load_breakdown(cli.expenses.as_deref())?;
            let calc = ctx.simulate(&input, *structure, breakdown.as_ref());
            emit(cli.json, &calc, render::render_calculation)?;
        }
        Command::Compare => {
            let input = app::load_input(required_input(&cli)?)?;
            let breakdown = app::load_breakdown(cli.expenses.as_deref())?;
            let comparison = ctx.compare(&input, breakdown.as_ref());
            emit(cli.json, &comparison, render::render_comparison)?;
        }
        Command::Rules => {
            let input = app::load_input(required_input(&cli)?)?;
            let regime = ctx.engine.recommended_structure(&input);
            let rules = ctx.engine.evaluate(&input);
            let alerts = fiscal_alerts(&input);
            let external = app::external_recommendation(cli.feed.as_deref(), &input).await;

            #[derive(Serialize)]
            #[serde(rename_all = "camelCase")]
            struct RulesOutput<'a> {
                recommended_regime: &'a fiscal_core::TaxRegime,
                rules: &'a [&'a fiscal_core::FiscalRule],
                alerts: &'a [fiscal_core::FiscalAlert],
                #[serde(skip_serializing_if = "Option::is_none")]
                external_recommendation: Option<&'a fiscal_core::ExternalRule>,
            }
            let output = RulesOutput {
                recommended_regime: regime,
                rules: &rules,
                alerts: &alerts,
                external_recommendation: external.as_ref(),
            };
            emit(cli.json, &output, |o| {
                render::render_rules(
                    o.recommended_regime,
                    o.rules,
                    o.alerts,
                    o.external_recommendation,
                )
            })?;
        }
        Command::Report { today: reference } => {
            let input = app::load_input(required_input(&cli)?)?;
            let breakdown = app::load_breakdown(cli.expenses.as_deref())?;
            let external = app::external_recommendation(cli.feed.as_deref(), &input).await;
            let report = ctx
                .report(&input, breakdown.as_ref(), reference.unwrap_or(today))?
                .with_external_recommendation(external);
            emit(cli.json, &report, render::render_report)?;
        }
        Command::Obligations { today: reference } => {
            let obligations = upcoming_obligations(reference.unwrap_or(today));
            emit(cli.json, &obligations, |o| render::render_obligations(o))?;
        }
        Command::Project { rows, csv } => {
            let rows: Vec<ProjectionInput> = read_json(rows)?;
            let projected = ctx.project(&rows);
            if let Some(path) = csv {
                let out = open_output(Some(path))?;
                write_projection(out, &projected)
                    .with_context(|| format!("failed to export {}", path.display()))?;
                info!(path = %path.display(), rows = projected.len(), "projection exported");
            }
            emit(cli.json, &projected, |p| render::render_projection(p))?;
        }
        Command::DoubleEntry {
            gross,
            irpf_expenses,
            is_expenses,
            extra,
        } => {
            let entry = ctx.double_entry(*gross, *irpf_expenses, *is_expenses, *extra);
            emit(cli.json, &entry, render::render_double_entry)?;
        }
        Command::Export { structures, out } => {
            let input = app::load_input(required_input(&cli)?)?;
            let breakdown = app::load_breakdown(cli.expenses.as_deref())?;
            let records = ctx.export_records(&input, breakdown.as_ref(), structures);
            write_simulations(open_output(out.as_deref())?, &records)
                .context("failed to export simulations")?;
        }
    }

    Ok(())
}
