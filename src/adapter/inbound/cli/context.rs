//! Setup shared by command handlers: config, logging, dataset.

use std::path::Path;

use tracing::debug;

use super::command::Cli;
use crate::adapter::outbound::csv::read_table_from_path;
use crate::domain::SalesDataset;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Resolve configuration from `--config` or the default location.
pub(super) fn load_config(cli: &Cli) -> Result<Config> {
    Config::resolve(cli.config.as_deref())
}

/// Start logging, letting `--log-level`, `-v` and `-q` override the file.
pub(super) fn init_logging(config: &Config, cli: &Cli, level: Option<&str>) {
    let mut logging = config.logging.clone();
    if let Some(level) = level {
        logging.level = level.to_string();
    } else if cli.quiet {
        logging.level = "error".into();
    } else if cli.verbose >= 2 {
        logging.level = "trace".into();
    } else if cli.verbose == 1 {
        logging.level = "debug".into();
    }
    logging.init();
}

/// Read and validate the sales file.
pub(super) fn load_dataset(config: &Config, path: &Path) -> Result<SalesDataset> {
    let raw = read_table_from_path(path)?;
    let dataset = SalesDataset::load(&raw, &config.dataset.options())?;
    debug!(
        path = %path.display(),
        records = dataset.len(),
        weeks = dataset.weeks_ascending().len(),
        "Dataset loaded"
    );
    Ok(dataset)
}
