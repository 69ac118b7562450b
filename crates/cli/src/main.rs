mod cli;
mod loader;
mod report;
mod terminal;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use flowmap_core::{load_dotenv, Config, TracingLogger};
use flowmap_rules::EngineContext;
use tracing::info;

use crate::cli::{CliArgs, Command, OutputFormat};
use crate::terminal::Terminal;

fn main() -> Result<()> {
    load_dotenv();
    let config = Config::from_env();

    // RUST_LOG wins over FLOWMAP_LOG when both are set.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    config.log_summary();

    let args = CliArgs::parse();
    let terminal = Terminal::new();
    let ctx = EngineContext::from_config(&config, Arc::new(TracingLogger));

    if let Some(Command::Check { path }) = &args.command {
        let report = loader::check_rules(path, ctx)?;
        terminal.print_check(&report)?;
        if !report.is_clean() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let (rules_path, series_path) = match (&args.rules, &args.series) {
        (Some(r), Some(s)) => (r, s),
        _ => {
            terminal.print_error("both --rules and --series are required")?;
            std::process::exit(2);
        }
    };

    let set = loader::load_rule_set(rules_path, ctx)?;
    let series = loader::load_series(series_path, args.compute_stats)?;
    let reports = report::evaluate(&set, &series, args.page_query.as_deref());
    info!(
        series = reports.len(),
        matched = reports.iter().filter(|r| r.decision.is_some()).count(),
        "evaluated series"
    );

    match args.output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&reports)
                .context("failed to serialize decisions")?;
            println!("{}", json);
        }
        OutputFormat::Text => terminal.print_reports(&reports)?,
    }
    Ok(())
}
