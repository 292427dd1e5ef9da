//! CLI argument definitions for the sample harmonizer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sample-harmonizer",
    version,
    about = "Harmonize clinical sample spreadsheets into a fixed template",
    long_about = "Harmonize raw lab sheets and shipping manifests into a fixed template.\n\n\
                  Column mappings, units, and inputs are described in a TOML job file.\n\
                  Controlled values are normalized with synonym tables."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values in trace logs. Cell values are patient data.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Harmonize the inputs described by a job file.
    Run(RunArgs),

    /// List the template fields and their accepted values.
    Fields,

    /// Show the synonym tables in use.
    Synonyms(SynonymsArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the TOML job file.
    #[arg(value_name = "JOB")]
    pub job: PathBuf,

    /// Output directory (overrides the job file).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Dataset name used for output files (overrides the job file).
    #[arg(long = "dataset", value_name = "NAME")]
    pub dataset: Option<String>,

    /// Skip writing the JSON run report.
    #[arg(long = "no-report")]
    pub no_report: bool,
}

#[derive(Parser)]
pub struct SynonymsArgs {
    /// Directory of synonym CSV files (default: built-in tables).
    #[arg(long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Print every entry of one table, e.g. `gender_mappings`.
    #[arg(long = "table", value_name = "NAME")]
    pub table: Option<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
