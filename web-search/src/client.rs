//! The configured backend, chosen once at construction.

use crate::backend::SearchBackend;
use crate::backends::{BingBackend, SearXngBackend, SerpApiBackend};
use crate::config::{SearchConfig, SelectedBackend};
use crate::error::SearchError;
use crate::http;
use crate::types::{BackendKind, SearchOutcome};

/// Whichever backend [`crate::BackendConfig::resolve`] selected.
///
/// Holds one HTTP client for its whole lifetime.
#[derive(Debug, Clone)]
pub enum WebSearch {
    /// Self-hosted SearXNG.
    SearXng(SearXngBackend),
    /// Bing Web Search v7.
    Bing(BingBackend),
    /// SerpAPI.
    SerpApi(SerpApiBackend),
}

impl WebSearch {
    /// Validate `config`, resolve backend precedence, and build the client.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the config is invalid or no
    /// backend is configured, and [`SearchError::Http`] if the HTTP client
    /// cannot be built.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let selected = config.backends.resolve()?;
        let client = http::build_client(config)?;

        let backend = match selected {
            SelectedBackend::SearXng { base_url } => {
                Self::SearXng(SearXngBackend::new(client, &base_url)?)
            }
            SelectedBackend::Bing {
                endpoint,
                subscription_key,
            } => Self::Bing(BingBackend::new(client, endpoint, subscription_key, config)),
            SelectedBackend::SerpApi { endpoint, api_key } => {
                Self::SerpApi(SerpApiBackend::new(client, endpoint, api_key, config))
            }
        };

        tracing::info!(backend = %backend.kind(), "web search backend selected");
        Ok(backend)
    }
}

impl SearchBackend for WebSearch {
    async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        match self {
            Self::SearXng(backend) => backend.search(query).await,
            Self::Bing(backend) => backend.search(query).await,
            Self::SerpApi(backend) => backend.search(query).await,
        }
    }

    fn kind(&self) -> BackendKind {
        match self {
            Self::SearXng(backend) => backend.kind(),
            Self::Bing(backend) => backend.kind(),
            Self::SerpApi(backend) => backend.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;

    #[test]
    fn no_backend_is_config_error() {
        let err = WebSearch::from_config(&SearchConfig::default()).unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }

    #[test]
    fn invalid_config_rejected_before_resolution() {
        let config = SearchConfig {
            results_per_query: 0,
            backends: BackendConfig {
                serpapi_key: Some("key".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = WebSearch::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("results_per_query"));
    }

    #[test]
    fn precedence_is_applied() {
        let config = SearchConfig {
            backends: BackendConfig {
                searxng_url: Some("http://127.0.0.1:8888".into()),
                serpapi_key: Some("key".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let search = WebSearch::from_config(&config).expect("build");
        assert_eq!(search.kind(), BackendKind::SearXng);
    }

    #[test]
    fn serpapi_selected_alone() {
        let config = SearchConfig {
            backends: BackendConfig {
                serpapi_key: Some("key".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let search = WebSearch::from_config(&config).expect("build");
        assert!(matches!(search, WebSearch::SerpApi(_)));
    }
}
