//! Handler for `check config`.

use std::path::Path;

use serde_json::json;

use super::command::Cli;
use super::context::load_config;
use super::output;
use crate::adapter::outbound::llm::openai::API_KEY_ENV;
use crate::error::Result;
use crate::infrastructure::config::settings::DEFAULT_CONFIG_PATH;
use crate::infrastructure::factory::llm::api_key_from_env;

/// Validate configuration without reading data or calling the service.
pub fn execute_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let source = cli.config.as_deref().map_or_else(
        || {
            if Path::new(DEFAULT_CONFIG_PATH).exists() {
                DEFAULT_CONFIG_PATH.to_string()
            } else {
                "defaults".to_string()
            }
        },
        |path| path.display().to_string(),
    );
    let key_present = api_key_from_env().is_some();
    let dataset_present = Path::new(&config.dataset.path).exists();

    if output::is_json() {
        output::json_output(json!({
            "command": "check.config",
            "valid": true,
            "source": source,
            "dataset": config.dataset.path,
            "dataset_present": dataset_present,
            "output": config.output.path,
            "model": config.llm.model,
            "max_concurrency": config.generation.max_concurrency,
            "api_key_present": key_present,
        }));
        return Ok(());
    }

    output::section("Configuration Check");
    output::field("Config", &source);
    output::success("Configuration is valid");

    output::section("Summary");
    output::field("Dataset", &config.dataset.path);
    output::field("Output", &config.output.path);
    output::field("Model", &config.llm.model);
    output::field("Endpoint", &config.llm.base_url);
    output::field("Concurrency", config.generation.max_concurrency);
    output::field("Placement", format!("{:?}", config.comparison.total_placement));

    if dataset_present {
        output::success("Dataset file found");
    } else {
        output::warning(&format!("Dataset file not found: {}", config.dataset.path));
    }
    if key_present {
        output::success(&format!("{API_KEY_ENV} detected"));
    } else {
        output::warning(&format!("{API_KEY_ENV} not set (required for `weeklight run`)"));
    }

    Ok(())
}
