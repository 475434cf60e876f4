//! Backend credentials and per-query search settings.
//!
//! [`BackendConfig`] enumerates every credential a backend may need.
//! [`BackendConfig::resolve`] applies the fixed precedence (SearXNG, then
//! Bing, then SerpAPI) exactly once and yields a [`SelectedBackend`]; the
//! environment is never consulted again after that.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::error::SearchError;
use crate::types::{BackendKind, SerpEngine};

/// Default Bing Web Search v7 endpoint.
pub const DEFAULT_BING_ENDPOINT: &str = "https://api.bing.microsoft.com/v7.0/search";

/// Default SerpAPI endpoint.
pub const DEFAULT_SERPAPI_ENDPOINT: &str = "https://serpapi.com/search.json";

/// SearXNG address used when `USE_SEARXNG=true` but `SEARXNG_URL` is unset.
pub const DEFAULT_SEARXNG_URL: &str = "http://127.0.0.1:8888";

/// Credentials for every supported backend. Any subset may be set.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of a self-hosted SearXNG instance (JSON output enabled).
    pub searxng_url: Option<String>,
    /// Bing Web Search v7 subscription key.
    pub bing_subscription_key: Option<String>,
    /// Bing endpoint override. Defaults to [`DEFAULT_BING_ENDPOINT`].
    pub bing_endpoint: Option<String>,
    /// SerpAPI key.
    pub serpapi_key: Option<String>,
    /// SerpAPI endpoint override. Defaults to [`DEFAULT_SERPAPI_ENDPOINT`].
    pub serpapi_endpoint: Option<String>,
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("searxng_url", &self.searxng_url)
            .field(
                "bing_subscription_key",
                &self.bing_subscription_key.as_ref().map(|_| "<redacted>"),
            )
            .field("bing_endpoint", &self.bing_endpoint)
            .field("serpapi_key", &self.serpapi_key.as_ref().map(|_| "<redacted>"))
            .field("serpapi_endpoint", &self.serpapi_endpoint)
            .finish()
    }
}

/// A backend chosen by [`BackendConfig::resolve`], with validated endpoints.
#[derive(Clone, PartialEq, Eq)]
pub enum SelectedBackend {
    /// Self-hosted SearXNG.
    SearXng {
        /// Instance base URL.
        base_url: Url,
    },
    /// Bing Web Search v7.
    Bing {
        /// Full search endpoint.
        endpoint: Url,
        /// Subscription key sent as `Ocp-Apim-Subscription-Key`.
        subscription_key: String,
    },
    /// SerpAPI.
    SerpApi {
        /// Full search endpoint.
        endpoint: Url,
        /// API key sent as the `api_key` query parameter.
        api_key: String,
    },
}

impl SelectedBackend {
    /// Which backend kind this selection represents.
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::SearXng { .. } => BackendKind::SearXng,
            Self::Bing { .. } => BackendKind::Bing,
            Self::SerpApi { .. } => BackendKind::SerpApi,
        }
    }
}

impl fmt::Debug for SelectedBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SearXng { base_url } => f
                .debug_struct("SearXng")
                .field("base_url", &base_url.as_str())
                .finish(),
            Self::Bing { endpoint, .. } => f
                .debug_struct("Bing")
                .field("endpoint", &endpoint.as_str())
                .finish_non_exhaustive(),
            Self::SerpApi { endpoint, .. } => f
                .debug_struct("SerpApi")
                .field("endpoint", &endpoint.as_str())
                .finish_non_exhaustive(),
        }
    }
}

impl BackendConfig {
    /// Read backend credentials from the process environment.
    ///
    /// | Variable                          | Field                   |
    /// |-----------------------------------|-------------------------|
    /// | `USE_SEARXNG=true`, `SEARXNG_URL` | `searxng_url`           |
    /// | `BING_SEARCH_V7_SUBSCRIPTION_KEY` | `bing_subscription_key` |
    /// | `BING_SEARCH_V7_ENDPOINT`         | `bing_endpoint`         |
    /// | `SERP_API_KEY`                    | `serpapi_key`           |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let searxng_url = match get("USE_SEARXNG").as_deref() {
            Some("true") => Some(get("SEARXNG_URL").unwrap_or_else(|| DEFAULT_SEARXNG_URL.into())),
            _ => None,
        };

        Self {
            searxng_url,
            bing_subscription_key: get("BING_SEARCH_V7_SUBSCRIPTION_KEY"),
            bing_endpoint: get("BING_SEARCH_V7_ENDPOINT"),
            serpapi_key: get("SERP_API_KEY"),
            serpapi_endpoint: None,
        }
    }

    /// Overlay every field that is set in `other` onto `self`.
    pub fn merge(&mut self, other: BackendConfig) {
        if other.searxng_url.is_some() {
            self.searxng_url = other.searxng_url;
        }
        if other.bing_subscription_key.is_some() {
            self.bing_subscription_key = other.bing_subscription_key;
        }
        if other.bing_endpoint.is_some() {
            self.bing_endpoint = other.bing_endpoint;
        }
        if other.serpapi_key.is_some() {
            self.serpapi_key = other.serpapi_key;
        }
        if other.serpapi_endpoint.is_some() {
            self.serpapi_endpoint = other.serpapi_endpoint;
        }
    }

    /// Choose the backend: SearXNG first, then Bing, then SerpAPI.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if nothing is configured or the
    /// chosen backend's endpoint is not a valid URL.
    pub fn resolve(&self) -> Result<SelectedBackend, SearchError> {
        if let Some(base) = &self.searxng_url {
            return Ok(SelectedBackend::SearXng {
                base_url: parse_endpoint("searxng_url", base)?,
            });
        }
        if let Some(key) = &self.bing_subscription_key {
            let endpoint = self.bing_endpoint.as_deref().unwrap_or(DEFAULT_BING_ENDPOINT);
            return Ok(SelectedBackend::Bing {
                endpoint: parse_endpoint("bing_endpoint", endpoint)?,
                subscription_key: key.clone(),
            });
        }
        if let Some(key) = &self.serpapi_key {
            let endpoint = self
                .serpapi_endpoint
                .as_deref()
                .unwrap_or(DEFAULT_SERPAPI_ENDPOINT);
            return Ok(SelectedBackend::SerpApi {
                endpoint: parse_endpoint("serpapi_endpoint", endpoint)?,
                api_key: key.clone(),
            });
        }
        Err(SearchError::Config(
            "no search backend configured: set USE_SEARXNG, \
             BING_SEARCH_V7_SUBSCRIPTION_KEY or SERP_API_KEY"
                .into(),
        ))
    }
}

fn parse_endpoint(field: &str, raw: &str) -> Result<Url, SearchError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| SearchError::Config(format!("{field} is not a valid URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(SearchError::Config(format!(
            "{field} must use http or https, got {other}"
        ))),
    }
}

/// Configuration shared by every backend query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Backend credentials; resolved once when the client is built.
    pub backends: BackendConfig,
    /// Result count requested per query (Bing and SerpAPI only).
    pub results_per_query: usize,
    /// Drop results before this date, `dd/mm/yyyy` (SerpAPI only).
    pub filter_date: Option<String>,
    /// Upstream engine used by SerpAPI.
    pub serp_engine: SerpEngine,
    /// Bing market code (`mkt`).
    pub market: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Custom User-Agent string. Defaults to `web-search/<version>`.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backends: BackendConfig::default(),
            results_per_query: 10,
            filter_date: None,
            serp_engine: SerpEngine::Google,
            market: "zh-CN".into(),
            timeout_seconds: 30,
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `results_per_query` must be greater than 0
    /// - `timeout_seconds` must be greater than 0
    /// - `filter_date`, when set, must look like `dd/mm/yyyy`
    /// - `market` must not be empty
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.results_per_query == 0 {
            return Err(SearchError::Config(
                "results_per_query must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if let Some(date) = &self.filter_date {
            if !is_dd_mm_yyyy(date) {
                return Err(SearchError::Config(format!(
                    "filter_date must be dd/mm/yyyy, got {date:?}"
                )));
            }
        }
        if self.market.trim().is_empty() {
            return Err(SearchError::Config("market must not be empty".into()));
        }
        Ok(())
    }
}

fn is_dd_mm_yyyy(date: &str) -> bool {
    let parts: Vec<&str> = date.split('/').collect();
    matches!(parts.as_slice(), [d, m, y]
        if d.len() == 2 && m.len() == 2 && y.len() == 4
            && parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_digit())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert_eq!(config.results_per_query, 10);
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.market, "zh-CN");
        assert!(config.filter_date.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_results_per_query_rejected() {
        let config = SearchConfig {
            results_per_query: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("results_per_query"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn filter_date_format_checked() {
        let ok = SearchConfig {
            filter_date: Some("01/01/2023".into()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let bad = SearchConfig {
            filter_date: Some("2023-01-01".into()),
            ..Default::default()
        };
        assert!(bad.validate().unwrap_err().to_string().contains("filter_date"));
    }

    #[test]
    fn nothing_configured_is_config_error() {
        let err = BackendConfig::default().resolve().unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
        assert!(err.to_string().contains("no search backend"));
    }

    #[test]
    fn searxng_wins_over_everything() {
        let config = BackendConfig::from_lookup(lookup(&[
            ("USE_SEARXNG", "true"),
            ("SEARXNG_URL", "http://search.local:8080"),
            ("BING_SEARCH_V7_SUBSCRIPTION_KEY", "bing-key"),
            ("SERP_API_KEY", "serp-key"),
        ]));
        let selected = config.resolve().expect("resolve");
        assert_eq!(selected.kind(), BackendKind::SearXng);
    }

    #[test]
    fn use_searxng_must_be_exactly_true() {
        let config = BackendConfig::from_lookup(lookup(&[
            ("USE_SEARXNG", "yes"),
            ("SERP_API_KEY", "serp-key"),
        ]));
        assert!(config.searxng_url.is_none());
        assert_eq!(config.resolve().expect("resolve").kind(), BackendKind::SerpApi);
    }

    #[test]
    fn searxng_defaults_url() {
        let config = BackendConfig::from_lookup(lookup(&[("USE_SEARXNG", "true")]));
        assert_eq!(config.searxng_url.as_deref(), Some(DEFAULT_SEARXNG_URL));
    }

    #[test]
    fn bing_wins_over_serpapi() {
        let config = BackendConfig::from_lookup(lookup(&[
            ("BING_SEARCH_V7_SUBSCRIPTION_KEY", "bing-key"),
            ("SERP_API_KEY", "serp-key"),
        ]));
        match config.resolve().expect("resolve") {
            SelectedBackend::Bing {
                endpoint,
                subscription_key,
            } => {
                assert_eq!(endpoint.as_str(), DEFAULT_BING_ENDPOINT);
                assert_eq!(subscription_key, "bing-key");
            }
            other => panic!("expected Bing, got {other:?}"),
        }
    }

    #[test]
    fn empty_env_values_count_as_unset() {
        let config = BackendConfig::from_lookup(lookup(&[
            ("BING_SEARCH_V7_SUBSCRIPTION_KEY", ""),
            ("SERP_API_KEY", "serp-key"),
        ]));
        assert_eq!(config.resolve().expect("resolve").kind(), BackendKind::SerpApi);
    }

    #[test]
    fn invalid_endpoint_rejected() {
        let config = BackendConfig {
            searxng_url: Some("not a url".into()),
            ..Default::default()
        };
        let err = config.resolve().unwrap_err();
        assert!(err.to_string().contains("searxng_url"));

        let config = BackendConfig {
            searxng_url: Some("ftp://search.local".into()),
            ..Default::default()
        };
        assert!(config.resolve().is_err());
    }

    #[test]
    fn debug_redacts_keys() {
        let config = BackendConfig {
            bing_subscription_key: Some("super-secret".into()),
            serpapi_key: Some("also-secret".into()),
            ..Default::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("also-secret"));

        let selected = config.resolve().expect("resolve");
        assert!(!format!("{selected:?}").contains("super-secret"));
    }

    #[test]
    fn merge_overlays_only_set_fields() {
        let mut base = BackendConfig {
            serpapi_key: Some("from-file".into()),
            bing_endpoint: Some("https://bing.example/search".into()),
            ..Default::default()
        };
        base.merge(BackendConfig {
            serpapi_key: Some("from-env".into()),
            ..Default::default()
        });
        assert_eq!(base.serpapi_key.as_deref(), Some("from-env"));
        assert_eq!(base.bing_endpoint.as_deref(), Some("https://bing.example/search"));
    }
}
