//! OpenAI-compatible Chat Completions provider.
//!
//! Sends non-streaming `POST {base_url}/v1/chat/completions` requests with
//! bearer auth and reads the first choice's message content.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::error::LlmError;
use super::message::Message;
use super::provider::ChatProvider;
use super::types::{CompletionResult, RequestOptions, TokenUsage};

/// Default API base URL.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Configuration for [`OpenAiProvider`].
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Base URL, with or without a trailing `/v1`.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl OpenAiConfig {
    /// Create a config for the given key and model against the public API.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.into(),
            model: model.into(),
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Full chat completions URL. A trailing `/` or `/v1` on the base is
    /// folded so both `https://host` and `https://host/v1` work.
    pub fn completions_url(&self) -> String {
        let trimmed = self.base_url.trim_end_matches('/');
        let base = trimmed.strip_suffix("/v1").unwrap_or(trimmed);
        format!("{base}/v1/chat/completions")
    }
}

/// Build the JSON request body for the Chat Completions API.
pub fn build_completions_request(
    model: &str,
    messages: &[Message],
    options: &RequestOptions,
) -> serde_json::Value {
    let mut body = serde_json::json!({
        "model": model,
        "messages": messages,
    });

    if let Some(obj) = body.as_object_mut() {
        if let Some(max_tokens) = options.max_tokens {
            obj.insert("max_tokens".into(), serde_json::json!(max_tokens));
        }
        if let Some(temp) = options.temperature {
            obj.insert("temperature".into(), serde_json::json!(temp));
        }
    }

    body
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Parse a Chat Completions response body into a [`CompletionResult`].
///
/// # Errors
///
/// Returns [`LlmError::Protocol`] when the body is not valid JSON, has no
/// choices, or the first choice carries no text content.
pub fn parse_completion_response(body: &str) -> Result<CompletionResult, LlmError> {
    let response: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::Protocol(format!("invalid completion response: {e}")))?;

    let first = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Protocol("completion response has no choices".into()))?;

    let text = first
        .message
        .and_then(|m| m.content)
        .ok_or_else(|| LlmError::Protocol("first choice has no message content".into()))?;

    Ok(CompletionResult {
        text,
        usage: response.usage.unwrap_or_default(),
    })
}

/// Chat Completions provider for OpenAI and compatible servers.
pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

impl OpenAiProvider {
    /// Create a provider with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] if the API key or model is empty, or the
    /// HTTP client cannot be built.
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Config("OpenAI API key is empty".into()));
        }
        if config.model.trim().is_empty() {
            return Err(LlmError::Config("model name is empty".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    fn map_http_error(status: reqwest::StatusCode, body: &str) -> LlmError {
        let message = extract_error_message(body);
        let code = status.as_u16();
        match code {
            401 | 403 => LlmError::Auth(format!("OpenAI authentication failed: {message}")),
            429 => LlmError::RateLimited(format!("OpenAI rate limited: {message}")),
            500..=599 => LlmError::Server(format!("OpenAI HTTP {code}: {message}")),
            _ => LlmError::Api(format!("OpenAI HTTP {code}: {message}")),
        }
    }
}

/// Extract an error message from an OpenAI error response body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn send(
        &self,
        messages: &[Message],
        options: &RequestOptions,
    ) -> Result<CompletionResult, LlmError> {
        let url = self.config.completions_url();
        let body = build_completions_request(&self.config.model, messages, options);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Api(format!(
                        "OpenAI request timed out after {}s",
                        self.config.timeout_secs
                    ))
                } else {
                    LlmError::Api(format!("OpenAI request failed: {e}"))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Api(format!("failed to read OpenAI response: {e}")))?;

        if !status.is_success() {
            return Err(Self::map_http_error(status, &text));
        }

        parse_completion_response(&text)
    }
}
