//! Text-generation service configuration.

use serde::Deserialize;

use crate::adapter::outbound::llm::openai::DEFAULT_BASE_URL;

/// OpenAI-compatible chat completions settings.
///
/// The API key is never read from the file; it comes from
/// `OPENAI_API_KEY` in the environment or a `.env` file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LlmConfig {
    /// Model identifier.
    ///
    /// Defaults to "gpt-3.5-turbo".
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL; `/chat/completions` is appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Maximum tokens in the response.
    ///
    /// Highlights are two sentences, so the default is small. Defaults to 256.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_model() -> String {
    "gpt-3.5-turbo".into()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

const fn default_max_tokens() -> usize {
    256
}
