//! LLM client factory.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::llm::openai::{OpenAi, API_KEY_ENV};
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::llm::Llm;

/// Build the text-generation client, reading the key from `OPENAI_API_KEY`.
///
/// # Errors
///
/// Returns [`ConfigError::MissingField`] if the key is unset or blank, or an
/// error if the configured base URL is invalid.
pub fn build_llm_client(config: &Config) -> Result<Arc<dyn Llm>> {
    let api_key = require_api_key(std::env::var(API_KEY_ENV).ok())?;
    build_llm_client_with_key(config, api_key)
}

/// Build the text-generation client with an explicit key.
///
/// # Errors
///
/// Returns an error if the configured base URL is invalid.
pub fn build_llm_client_with_key(config: &Config, api_key: String) -> Result<Arc<dyn Llm>> {
    let client = OpenAi::new(api_key, &config.llm.base_url, config.llm.max_tokens)?;
    info!(
        provider = client.name(),
        endpoint = %client.endpoint(),
        model = %config.llm.model,
        "LLM client initialized"
    );
    Ok(Arc::new(client))
}

/// The API key, if set and non-blank.
#[must_use]
pub fn api_key_from_env() -> Option<String> {
    require_api_key(std::env::var(API_KEY_ENV).ok()).ok()
}

/// Reject an unset or blank key.
///
/// # Errors
///
/// Returns [`ConfigError::MissingField`] naming `OPENAI_API_KEY`.
pub fn require_api_key(value: Option<String>) -> std::result::Result<String, ConfigError> {
    value
        .filter(|key| !key.trim().is_empty())
        .ok_or(ConfigError::MissingField { field: API_KEY_ENV })
}
