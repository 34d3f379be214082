//! OpenAI LLM client.
//!
//! Provides an implementation of the [`Llm`] trait for the OpenAI
//! Chat Completions API or any endpoint that speaks the same protocol.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, GenerationError, Result};
use crate::port::outbound::llm::{CompletionRequest, Llm};

/// Default OpenAI API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI API client.
///
/// Implements the [`Llm`] trait for making chat completion requests.
/// Model and temperature travel with each [`CompletionRequest`].
#[derive(Debug)]
pub struct OpenAi {
    /// HTTP client for API requests.
    client: Client,
    /// API key for authentication.
    api_key: String,
    /// Fully resolved chat completions endpoint.
    endpoint: Url,
    /// Maximum tokens to generate in the response.
    max_tokens: usize,
}

impl OpenAi {
    /// Create a new OpenAI client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL.
    pub fn new(api_key: impl Into<String>, base_url: &str, max_tokens: usize) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            api_key: api_key.into(),
            endpoint: completions_endpoint(base_url)?,
            max_tokens,
        })
    }

    /// The endpoint requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn completions_endpoint(base_url: &str) -> Result<Url> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(Url::parse(&base)?.join("chat/completions")?)
}

#[derive(Serialize)]
struct Request<'a> {
    model: &'a str,
    max_tokens: usize,
    temperature: f64,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct Response {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl Response {
    fn into_text(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::EmptyCompletion.into())
    }
}

#[async_trait]
impl Llm for OpenAi {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = Request {
            model: &request.model,
            max_tokens: self.max_tokens,
            temperature: request.temperature,
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Connection(e.to_string()))?
            .json::<Response>()
            .await?;

        response.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Request/Response Serialization Tests ====================

    #[test]
    fn test_request_serialization() {
        let request = Request {
            model: "gpt-3.5-turbo",
            max_tokens: 256,
            temperature: 0.0,
            messages: vec![Message {
                role: "user",
                content: "Total sales changed by 100 dollars.",
            }],
        };

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["max_tokens"], 256);
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(
            json["messages"][0]["content"],
            "Total sales changed by 100 dollars."
        );
    }

    #[test]
    fn test_response_deserialization_single_choice() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1677652288,
            "model": "gpt-3.5-turbo",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Total sales increased by ($100) (6.67%)."
                },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 10,
                "completion_tokens": 15,
                "total_tokens": 25
            }
        }"#;

        let response: Response = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.into_text().unwrap(),
            "Total sales increased by ($100) (6.67%)."
        );
    }

    #[test]
    fn test_first_choice_wins() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "First response"}},
                {"message": {"role": "assistant", "content": "Second response"}}
            ]
        }"#;

        let response: Response = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_text().unwrap(), "First response");
    }

    #[test]
    fn test_empty_choices_is_an_error() {
        let response: Response = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            response.into_text(),
            Err(Error::Generation(GenerationError::EmptyCompletion))
        ));
    }

    #[test]
    fn test_null_content_is_an_error() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let response: Response = serde_json::from_str(json).unwrap();
        assert!(response.into_text().is_err());
    }

    #[test]
    fn test_malformed_response_missing_choices() {
        let json = r#"{"id": "chatcmpl-123", "object": "chat.completion"}"#;
        let result: std::result::Result<Response, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    // ==================== Client Construction Tests ====================

    #[test]
    fn test_default_endpoint() {
        let client = OpenAi::new("key", DEFAULT_BASE_URL, 256).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(client.name(), "openai");
    }

    #[test]
    fn test_trailing_slash_base_url() {
        let client = OpenAi::new("key", "http://localhost:8080/v1/", 256).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            OpenAi::new("key", "not a url", 256),
            Err(Error::Url(_))
        ));
    }
}

