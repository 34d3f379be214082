use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Text-generation service errors.
///
/// Transport failures surface as [`Error::Http`] or [`Error::Connection`]
/// on a single attempt; the generator folds them into
/// [`GenerationError::Exhausted`] once its retry budget is spent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("generation request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("generation service returned an empty completion")]
    EmptyCompletion,

    #[error("generation failed after {attempts} attempt(s): {last_error}")]
    Exhausted { attempts: u32, last_error: String },

    /// Shutdown was requested while the request was still retrying.
    #[error("generation cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<crate::domain::error::DataFormatError> for Error {
    fn from(err: crate::domain::error::DataFormatError) -> Self {
        Error::Domain(DomainError::DataFormat(err))
    }
}
