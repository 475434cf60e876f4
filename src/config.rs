//! Configuration for the retrieval pipeline.
//!
//! Loaded from TOML with every section optional, then overlaid with
//! environment variables:
//!
//! ```toml
//! workers = 10
//! default_top_n = 20
//!
//! [llm]
//! model = "gpt-4o-mini"
//! temperature = 0.2
//!
//! [llm.retry]
//! max_attempts = 100
//!
//! [search]
//! results_per_query = 10
//! serp_engine = "google"
//!
//! [search.backends]
//! searxng_url = "http://127.0.0.1:8888"
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use web_search::{BackendConfig, SearchConfig};

use crate::error::{Result, RetrievalError};
use crate::llm::budget::{DEFAULT_CONTEXT_BUDGET_CHARS, MIN_TRUNCATION_REMAINDER};
use crate::llm::openai::{DEFAULT_OPENAI_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::llm::{CompletionGateway, OpenAiConfig, OpenAiProvider, RequestOptions, RetryPolicy};

/// Default number of concurrent scoring workers.
pub const DEFAULT_WORKERS: usize = 10;

/// Default number of URLs returned by a retrieval.
pub const DEFAULT_TOP_N: usize = 20;

/// Default number of query-synthesis attempts.
pub const DEFAULT_QUERY_ATTEMPTS: u32 = 5;

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Completion gateway settings.
    pub llm: LlmConfig,
    /// Search backend settings.
    pub search: SearchConfig,
    /// Concurrent scoring workers.
    pub workers: usize,
    /// URLs returned when the caller does not choose a count.
    pub default_top_n: usize,
    /// Query-synthesis attempts before a parse failure is surfaced.
    pub query_attempts: u32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            search: SearchConfig::default(),
            workers: DEFAULT_WORKERS,
            default_top_n: DEFAULT_TOP_N,
            query_attempts: DEFAULT_QUERY_ATTEMPTS,
        }
    }
}

impl RetrievalConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| RetrievalError::Config(e.to_string()))
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_lookup(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary variable lookup.
    ///
    /// `OPENAI_API_KEY` and `OPENAI_API_BASE` set the gateway credentials;
    /// the search variables are read by [`BackendConfig::from_lookup`]. Set
    /// variables win over file values. Empty values count as unset.
    pub fn apply_lookup<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(key) = get("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(base) = get("OPENAI_API_BASE") {
            self.llm.base_url = base;
        }
        self.search.backends.merge(BackendConfig::from_lookup(&lookup));
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(RetrievalError::Config("workers must be greater than 0".into()));
        }
        if self.query_attempts == 0 {
            return Err(RetrievalError::Config(
                "query_attempts must be greater than 0".into(),
            ));
        }
        self.llm.validate()?;
        self.search
            .validate()
            .map_err(|e| RetrievalError::Config(e.to_string()))
    }
}

/// Completion gateway settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL, with or without `/v1`.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Bearer token. Usually supplied through `OPENAI_API_KEY`.
    pub api_key: Option<String>,
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Context budget in chars.
    pub context_budget_chars: usize,
    /// Backoff for transient failures.
    pub retry: RetryPolicy,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("context_budget_chars", &self.context_budget_chars)
            .field("retry", &self.retry)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            api_key: None,
            temperature: None,
            max_tokens: None,
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            context_budget_chars: DEFAULT_CONTEXT_BUDGET_CHARS,
            retry: RetryPolicy::default(),
        }
    }
}

impl LlmConfig {
    /// Validate gateway settings.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(RetrievalError::Config("llm.model must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(RetrievalError::Config(
                "llm.timeout_secs must be greater than 0".into(),
            ));
        }
        if self.context_budget_chars < MIN_TRUNCATION_REMAINDER {
            return Err(RetrievalError::Config(format!(
                "llm.context_budget_chars must be at least {MIN_TRUNCATION_REMAINDER}"
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(RetrievalError::Config(
                "llm.retry.max_attempts must be greater than 0".into(),
            ));
        }
        if let Some(temp) = self.temperature {
            if !(0.0..=2.0).contains(&temp) {
                return Err(RetrievalError::Config(format!(
                    "llm.temperature must be within 0.0..=2.0, got {temp}"
                )));
            }
        }
        Ok(())
    }

    /// Sampling options derived from this config.
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Build an OpenAI-compatible gateway.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Config`] if no API key is configured, or an
    /// LLM config error if the provider rejects the settings.
    pub fn build_gateway(&self) -> Result<CompletionGateway> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            RetrievalError::Config("no LLM API key configured (set OPENAI_API_KEY)".into())
        })?;
        let provider_config = OpenAiConfig::new(api_key, self.model.clone())
            .with_base_url(self.base_url.clone())
            .with_timeout_secs(self.timeout_secs);
        let provider = OpenAiProvider::new(provider_config)?;
        Ok(CompletionGateway::new(Arc::new(provider))
            .with_options(self.request_options())
            .with_retry_policy(self.retry.clone())
            .with_context_budget(self.context_budget_chars))
    }
}
