//! Global flag handling and subcommand dispatch.

use super::command::{CheckCommand, Cli, ColorChoice, Commands};
use super::{check, compare, output, run, show};
use crate::error::Result;

/// Apply global output flags. Call once, before any handler prints.
pub fn configure(cli: &Cli) {
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(output::OutputConfig::new(cli.json, cli.quiet, cli.verbose));
}

/// Run the selected subcommand.
///
/// # Errors
///
/// Returns the handler's error; the caller reports it and exits non-zero.
pub async fn execute(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Run(args) => run::execute(cli, args).await,
        Commands::Compare(args) => compare::execute(cli, args),
        Commands::Show(args) => show::execute(cli, args),
        Commands::Check(CheckCommand::Config) => check::execute_config(cli),
    }
}
