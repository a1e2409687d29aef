//! CLI argument definitions for the NSMO preparation tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "nsmo",
    version,
    about = "Prepare the NSMO mortgage survey for modeling",
    long_about = "Clean the National Survey of Mortgage Originations public use file, join the \
                  monthly 30-year Treasury yield, derive Beta and one-hot encode categorical \
                  variables.\n\n\
                  Writes the prepared table as CSV and the variable classification as JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Run every preparation stage and write the outputs.
    Run(RunArgs),

    /// List the format codes of a metadata directory by kind.
    Formats(FormatsArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Survey public use file.
    #[arg(value_name = "SURVEY_CSV", default_value = "bin/nsmo_v50_1321_puf.csv")]
    pub survey: PathBuf,

    /// Daily yield series.
    #[arg(value_name = "YIELD_CSV", default_value = "bin/DGS30.csv")]
    pub yields: PathBuf,

    /// Prepared table to write.
    #[arg(value_name = "OUTPUT_CSV", default_value = "bin/cleaned_and_joined.csv")]
    pub output: PathBuf,

    /// Directory holding variable_formats.toml, category_catalog.toml and exclusions.toml.
    #[arg(long = "metadata-dir", value_name = "DIR", default_value = ".")]
    pub metadata_dir: PathBuf,

    /// Where to write the variable classification.
    #[arg(
        long = "variables-out",
        value_name = "PATH",
        default_value = "cleaned_variables.json"
    )]
    pub variables_out: PathBuf,

    /// Pipeline options file (TOML). Flags given here override it.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Fraction of finite Beta values clipped at the low end.
    #[arg(long = "winsor-lower", value_name = "FRACTION")]
    pub winsor_lower: Option<f64>,

    /// Fraction of finite Beta values clipped at the high end.
    #[arg(long = "winsor-upper", value_name = "FRACTION")]
    pub winsor_upper: Option<f64>,

    /// Add a `{column}_nan` indicator for categorical columns with nulls.
    #[arg(long = "encode-nulls")]
    pub encode_nulls: bool,

    /// Fail when a column has no format code or an unknown one.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Run every stage without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct FormatsArgs {
    /// Directory holding the metadata files.
    #[arg(long = "metadata-dir", value_name = "DIR", default_value = ".")]
    pub metadata_dir: PathBuf,
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
