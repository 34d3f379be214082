//! Command-line interface definitions.
//!
//! Defines the CLI structure for weeklight using `clap`: generating the
//! highlights artifact, inspecting a single week's comparison, viewing the
//! per-week report, and checking configuration.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Weekly store sales comparison with generated highlights
#[derive(Parser, Debug)]
#[command(name = "weeklight")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file [default: weeklight.toml if present]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate highlights for every week pair and write the artifact
    Run(RunArgs),

    /// Print the comparison table and summary text for one week
    Compare(CompareArgs),

    /// Show the weekly report (totals, store breakdown, highlight)
    Show(ShowArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `weeklight check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration and report whether the API key is set.
    Config,
}

/// Arguments for the `run` subcommand.
///
/// Flags override the matching configuration values.
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Sales CSV to read.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Highlights CSV to write.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Model identifier sent to the service.
    #[arg(long)]
    pub model: Option<String>,

    /// Maximum generation calls in flight.
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Override log level (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Arguments for the `compare` subcommand.
#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// Week to compare (YYYY-MM-DD or DD-MM-YYYY).
    #[arg(short, long, value_parser = parse_week)]
    pub week: NaiveDate,

    /// Week to compare against [default: the preceding week in the data].
    #[arg(long, value_parser = parse_week)]
    pub previous: Option<NaiveDate>,

    /// Sales CSV to read.
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

/// Arguments for the `show` subcommand.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Week to show; lists selectable weeks when omitted.
    #[arg(short, long, value_parser = parse_week)]
    pub week: Option<NaiveDate>,

    /// Sales CSV to read.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Highlights CSV to read.
    #[arg(long)]
    pub highlights: Option<PathBuf>,
}

/// Parse a week given as ISO `YYYY-MM-DD` or as `DD-MM-YYYY`.
///
/// # Errors
///
/// Returns a message naming both accepted formats.
pub fn parse_week(value: &str) -> Result<NaiveDate, String> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d-%m-%Y"))
        .map_err(|_| format!("'{value}' is not a date (expected YYYY-MM-DD or DD-MM-YYYY)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2010, 2, 12).unwrap();
        assert_eq!(parse_week("2010-02-12"), Ok(expected));
        assert_eq!(parse_week("12-02-2010"), Ok(expected));
        assert!(parse_week("Feb 12").is_err());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::parse_from([
            "weeklight",
            "compare",
            "--week",
            "2010-02-12",
            "--json",
            "--config",
            "custom.toml",
        ]);
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        match cli.command {
            Commands::Compare(args) => {
                assert_eq!(args.week, NaiveDate::from_ymd_opt(2010, 2, 12).unwrap());
                assert!(args.previous.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn run_overrides_parse() {
        let cli = Cli::parse_from([
            "weeklight",
            "run",
            "--input",
            "sales.csv",
            "--max-concurrency",
            "4",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.input, Some(PathBuf::from("sales.csv")));
                assert_eq!(args.max_concurrency, Some(4));
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn check_config_parses() {
        let cli = Cli::parse_from(["weeklight", "check", "config", "-q"]);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Check(CheckCommand::Config)));
    }
}
