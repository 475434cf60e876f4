//! # web-search
//!
//! Web search over one of three interchangeable JSON backends, normalised
//! to a single [`SnippetRecord`] shape.
//!
//! ## Design
//!
//! - Backends: self-hosted SearXNG, Bing Web Search v7, SerpAPI
//!   (Google / Baidu / Bing upstreams)
//! - Backend choice is made once from a [`BackendConfig`], in fixed order:
//!   SearXNG, then Bing, then SerpAPI
//! - Each query is one HTTP GET; non-2xx fails the query
//! - An answered-but-empty result list is [`SearchOutcome::NoResults`],
//!   not an error, so callers can tell "nothing matched" from "broken"
//!
//! ## Security
//!
//! - Subscription and API keys never appear in `Debug` output or errors
//! - Search queries are logged only at trace level

pub mod backend;
pub mod backends;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use backend::SearchBackend;
pub use client::WebSearch;
pub use config::{BackendConfig, SearchConfig, SelectedBackend};
pub use error::{Result, SearchError};
pub use types::{BackendKind, SearchOutcome, SerpEngine, SnippetRecord};

/// Build the configured backend and run a single query.
///
/// Convenience for one-off searches; long-lived callers should keep a
/// [`WebSearch`] and reuse its HTTP client.
///
/// # Errors
///
/// Same as [`WebSearch::from_config`] and [`SearchBackend::search`].
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> web_search::Result<()> {
/// let config = web_search::SearchConfig {
///     backends: web_search::BackendConfig::from_env(),
///     ..Default::default()
/// };
/// match web_search::search("rust programming", &config).await? {
///     web_search::SearchOutcome::Hits(hits) => {
///         for hit in hits.values() {
///             println!("{}: {}", hit.title, hit.url);
///         }
///     }
///     web_search::SearchOutcome::NoResults(message) => println!("{message}"),
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<SearchOutcome> {
    WebSearch::from_config(config)?.search(query).await
}
