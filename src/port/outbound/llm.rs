//! LLM completion port for highlight generation.
//!
//! Defines a generic interface for large language model completion requests.

use async_trait::async_trait;

use crate::error::Result;

/// A single-message completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier understood by the provider.
    pub model: String,
    /// Full prompt, sent as one user-role message.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Client for large language model text completion.
///
/// Implementations wrap a specific provider and handle authentication and
/// response parsing. Retries and timeouts are the caller's concern.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`) so one client can
/// serve concurrent week pairs.
///
/// # Errors
///
/// The [`complete`](Self::complete) method returns an error for API failures
/// or invalid responses.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Return the provider name for logging.
    fn name(&self) -> &'static str;

    /// Send a completion request and return the generated text.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response is invalid.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
