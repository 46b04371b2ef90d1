//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Plan professor-record cleanups: dedupe a table against itself or
/// reconcile it against an official roster.
///
/// Plans are printed for review; nothing is applied.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Log output format
    #[arg(long, value_enum, default_value_t = TracingFormat::Pretty, global = true)]
    pub tracing: TracingFormat,

    /// TOML config file (defaults to ./profmerge.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge duplicate records within one list
    Dedupe {
        /// JSON array of {"id", "name"} records
        #[arg(long)]
        records: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Rename or merge records to match an authoritative roster
    Reconcile {
        /// JSON array of {"id", "name"} records
        #[arg(long)]
        records: PathBuf,

        /// JSON array of names, or of {"teacherName": ...} objects
        #[arg(long)]
        roster: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Plan rendering
    #[arg(long, value_enum, default_value_t = OutputFormat::Sql)]
    pub format: OutputFormat,

    /// Write the plan here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracingFormat {
    Pretty,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Sql,
    Json,
    Text,
}
