//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "labor-series",
    version,
    about = "County labor statistics joined to population estimates",
    long_about = "Build county series identifiers, reshape the labor statistics export and\n\
                  the census population tables, and join them into one monthly table."
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
    /// Build the series identifier list from an entity code table.
    Series(SeriesArgs),

    /// Run the full pipeline and write the merged table.
    Build(BuildArgs),

    /// Show the configured sources and their layouts.
    Sources(SourcesArgs),
}

#[derive(Parser)]
pub struct SeriesArgs {
    /// Pipe-delimited entity code table.
    #[arg(long = "codes", value_name = "FILE")]
    pub codes: PathBuf,

    /// Identifier list to write, one per line.
    #[arg(long = "output", value_name = "FILE")]
    pub output: PathBuf,

    /// Fail unless the table has exactly this many entities.
    #[arg(long = "expected-entities", value_name = "N")]
    pub expected_entities: Option<usize>,

    /// Series identifier prefix.
    #[arg(long = "prefix", default_value = labor_model::DEFAULT_SERIES_PREFIX)]
    pub prefix: String,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// Pipeline configuration (TOML). Relative paths resolve against its directory.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Data directory laid out as the built-in Ohio configuration expects.
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct BuildArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output directory for generated files.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// File name of the merged table (overrides the configuration).
    #[arg(long = "output-name", value_name = "NAME")]
    pub output_name: Option<String>,

    /// Also write a JSON run manifest.
    #[arg(long = "manifest")]
    pub manifest: bool,

    /// Run every stage but write nothing.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Exit with status 2 when historical periods have unmatched keys.
    #[arg(long = "deny-unmatched")]
    pub deny_unmatched: bool,
}

#[derive(Parser)]
pub struct SourcesArgs {
    /// Pipeline configuration (TOML); the built-in configuration when omitted.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
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
