use crate::cli::{Args, Command, OutputArgs, OutputFormat};
use crate::config::Config;
use crate::logging::setup_logging;
use crate::utils::{fmt_duration, log_if_slow};
use anyhow::Context;
use clap::Parser;
use profmerge::dedup::{self, Plan};
use profmerge::{input, render};
use std::io::{IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::{error, info};

mod cli;
mod config;
mod logging;
mod utils;

const SLOW_PLAN_THRESHOLD: Duration = Duration::from_secs(2);

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Logging depends on the config, so a config failure can only go to stderr directly
    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    setup_logging(&config, args.tracing);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        commit = env!("GIT_COMMIT_SHORT"),
        "starting profmerge"
    );

    match run(&args.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Command, config: &Config) -> anyhow::Result<()> {
    let matching = &config.matching;
    let start = Instant::now();

    let (plan, output) = match command {
        Command::Dedupe { records, output } => {
            let records = input::read_records(records).context("Failed to load records")?;
            info!(records = records.len(), "planning self-merge");
            let plan = dedup::plan_self_merge(&records, matching)?;
            (plan, output)
        }
        Command::Reconcile {
            records,
            roster,
            output,
        } => {
            let records = input::read_records(records).context("Failed to load records")?;
            let roster = input::read_roster(roster).context("Failed to load roster")?;
            info!(
                records = records.len(),
                roster = roster.len(),
                "planning roster reconciliation"
            );
            let plan = dedup::plan_roster(&records, &roster, matching)?;
            (plan, output)
        }
    };

    log_if_slow(start, SLOW_PLAN_THRESHOLD, "planning");
    info!(duration = fmt_duration(start.elapsed()), "plan ready");

    emit(&plan, output, config)
}

fn emit(plan: &Plan, output: &OutputArgs, config: &Config) -> anyhow::Result<()> {
    if output.output.is_some() || !std::io::stdout().is_terminal() {
        yansi::disable();
    }

    let rendered = match output.format {
        OutputFormat::Sql => render::sql(plan, &config.sql_options()),
        OutputFormat::Json => render::json(plan).context("Failed to serialize plan")?,
        OutputFormat::Text => render::text(plan),
    };

    match &output.output {
        Some(path) => write_file(path, &rendered),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write plan to stdout")
        }
    }
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write plan to {}", path.display()))?;
    info!(path = %path.display(), "plan written");
    Ok(())
}
