//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; every section has defaults, so an
//! empty file is valid. The API key is read from the environment, never from
//! the file.
//!
//! # Example
//!
//! ```no_run
//! use weeklight::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("weeklight.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use url::Url;

use super::dataset::{ComparisonConfig, DatasetConfig, OutputConfig};
use super::llm::LlmConfig;
use super::logging::LoggingConfig;
use super::pricing::PricingConfig;
use crate::application::highlight::GenerationConfig;
use crate::error::{ConfigError, Result};

/// Config file read when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "weeklight.toml";

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    /// Sales input file and parsing options.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Highlights artifact location.
    #[serde(default)]
    pub output: OutputConfig,

    /// Text-generation service settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Retry, timeout and concurrency for generation calls.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Per-million-token rates used for cost accounting.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Comparison table layout.
    #[serde(default)]
    pub comparison: ComparisonConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` if given, else [`DEFAULT_CONFIG_PATH`] if it exists, else
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `path` cannot be read, or if the
    /// chosen file fails to parse or validate.
    #[allow(clippy::result_large_err)]
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are present and values are within
    /// acceptable ranges.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.dataset.path.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "dataset.path",
            }
            .into());
        }
        if self.dataset.date_format.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "dataset.date_format",
            }
            .into());
        }
        if self.dataset.store_threshold == 0 {
            return Err(ConfigError::InvalidValue {
                field: "store_threshold",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.output.path.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "output.path",
            }
            .into());
        }

        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "llm.model" }.into());
        }
        if let Err(e) = Url::parse(&self.llm.base_url) {
            return Err(ConfigError::InvalidValue {
                field: "base_url",
                reason: e.to_string(),
            }
            .into());
        }
        if self.llm.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_tokens",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        let generation = &self.generation;
        if generation.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if generation.max_delay_ms < generation.initial_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "max_delay_ms",
                reason: "must be >= initial_delay_ms".to_string(),
            }
            .into());
        }
        if generation.backoff_multiplier < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "backoff_multiplier",
                reason: "must be >= 1.0".to_string(),
            }
            .into());
        }
        if generation.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if generation.max_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_concurrency",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.pricing.prompt_rate_per_million < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "prompt_rate_per_million",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }
        if self.pricing.completion_rate_per_million < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "completion_rate_per_million",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("expected 'pretty' or 'json', got '{}'", self.logging.format),
            }
            .into());
        }

        Ok(())
    }
}
