//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Sensor Merge - normalizes two sensor JSON sources into one time-ordered document
#[derive(Parser, Debug)]
#[command(
    name = "sensor-merge",
    author,
    version,
    about = "Merge two sensor reading sources into one time-ordered JSON document",
    long_about = "Reads sensor readings recorded in two JSON schemas (ISO-8601 timestamps \n\
                  and numeric epoch timestamps), converts them into one canonical record \n\
                  shape, merges and stably sorts them by timestamp, and writes the result \n\
                  to the configured sinks.\n\n\
                  Running without a subcommand is the same as `sensor-merge run`.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors (the run summary is still printed)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SENSOR_MERGE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub run: RunArgs,
}

impl Cli {
    /// Subcommand to execute, `run` when none was given
    pub fn resolved_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(self.run.clone()))
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Convert, merge and write the two sources
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display the effective configuration
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON); defaults apply when absent
    #[arg(short, long, env = "SENSOR_MERGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the format A input path
    #[arg(long, env = "SENSOR_MERGE_INPUT_A")]
    pub input_a: Option<PathBuf>,

    /// Override the format B input path
    #[arg(long, env = "SENSOR_MERGE_INPUT_B")]
    pub input_b: Option<PathBuf>,

    /// Override the output path of the first file sink
    #[arg(short, long, env = "SENSOR_MERGE_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Treat a missing input file as an empty source instead of failing
    #[arg(long, env = "SENSOR_MERGE_ALLOW_MISSING")]
    pub allow_missing: bool,

    /// Exit with an error when no record survives conversion
    #[arg(long, env = "SENSOR_MERGE_FAIL_ON_EMPTY")]
    pub fail_on_empty: bool,

    /// Validate configuration and exit without reading inputs
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON instead of the text summary
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, env = "SENSOR_MERGE_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Args, Debug, Clone)]
pub struct InfoArgs {
    /// Path to configuration file; built-in defaults when absent
    #[arg(short, long, env = "SENSOR_MERGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, conflicts_with = "toml")]
    pub json: bool,

    /// Output the effective configuration as TOML
    #[arg(long)]
    pub toml: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}
