//! Request options and completion results.

use serde::{Deserialize, Serialize};

/// Token counts reported by the provider for one completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenUsage {
    /// Number of tokens in the prompt.
    pub prompt_tokens: u64,
    /// Number of tokens in the completion.
    pub completion_tokens: u64,
    /// Total reported by the provider.
    pub total_tokens: u64,
}

impl TokenUsage {
    /// Create a usage record; the total is prompt + completion.
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

/// The text and token usage of one successful completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    /// The first choice's message content.
    pub text: String,
    /// Token usage, zeroed if the provider did not report it.
    pub usage: TokenUsage,
}

/// Sampling options forwarded with every request.
///
/// `None` leaves the provider default in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 = deterministic).
    pub temperature: Option<f64>,
}

impl RequestOptions {
    /// Create request options with provider defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_total_is_sum() {
        let usage = TokenUsage::new(500, 200);
        assert_eq!(usage.total_tokens, 700);
    }

    #[test]
    fn usage_deserializes_with_missing_fields() {
        let usage: TokenUsage =
            serde_json::from_str(r#"{"prompt_tokens": 12}"#).expect("deserialize");
        assert_eq!(usage.prompt_tokens, 12);
        assert_eq!(usage.completion_tokens, 0);
    }

    #[test]
    fn options_default_to_provider_defaults() {
        let opts = RequestOptions::new();
        assert!(opts.max_tokens.is_none());
        assert!(opts.temperature.is_none());

        let opts = opts.with_max_tokens(512).with_temperature(0.2);
        assert_eq!(opts.max_tokens, Some(512));
        assert_eq!(opts.temperature, Some(0.2));
    }
}
