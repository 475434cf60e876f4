//! SearXNG backend: self-hosted meta-search with JSON output.
//!
//! The instance must have the `json` output format enabled in its
//! `settings.yml`; otherwise it answers 403.

use std::collections::BTreeMap;

use serde_json::Value;
use url::Url;

use super::string_field;
use crate::backend::SearchBackend;
use crate::error::SearchError;
use crate::http;
use crate::types::{BackendKind, SearchOutcome, SnippetRecord};

/// SearXNG JSON API client.
#[derive(Debug, Clone)]
pub struct SearXngBackend {
    client: reqwest::Client,
    search_url: Url,
}

impl SearXngBackend {
    /// Create a backend for the instance at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `/search` cannot be joined onto
    /// `base_url`.
    pub fn new(client: reqwest::Client, base_url: &Url) -> Result<Self, SearchError> {
        let search_url = join_search_path(base_url)?;
        Ok(Self { client, search_url })
    }
}

impl SearchBackend for SearXngBackend {
    async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let q = http::strip_quotes(query);
        tracing::trace!(query = q, "SearXNG search");

        let request = self
            .client
            .get(self.search_url.clone())
            .query(&[("q", q), ("format", "json")]);

        let body = http::fetch_json(BackendKind::SearXng, request).await?;
        Ok(parse_searxng_json(&body))
    }

    fn kind(&self) -> BackendKind {
        BackendKind::SearXng
    }
}

/// `http://host:8888` and `http://host/searx/` both resolve to their
/// `search` endpoint.
fn join_search_path(base_url: &Url) -> Result<Url, SearchError> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("search")
        .map_err(|e| SearchError::Config(format!("invalid SearXNG base URL: {e}")))
}

/// Map a SearXNG JSON body onto snippet records.
///
/// A missing `results` array is an empty hit map, not an error.
fn parse_searxng_json(body: &Value) -> SearchOutcome {
    let mut hits = BTreeMap::new();
    let results = body.get("results").and_then(Value::as_array);

    for (idx, hit) in results.into_iter().flatten().enumerate() {
        let (Some(url), Some(title)) = (string_field(hit, "url"), string_field(hit, "title"))
        else {
            tracing::debug!(idx, "SearXNG hit without url or title skipped");
            continue;
        };
        hits.insert(
            idx,
            SnippetRecord {
                url,
                title,
                snippet: string_field(hit, "content"),
                date: string_field(hit, "publishedDate"),
                source: string_field(hit, "engine"),
                highlighted_words: None,
            },
        );
    }

    SearchOutcome::Hits(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_results() {
        let body = json!({
            "query": "rust",
            "results": [
                {"title": "Rust", "url": "https://rust-lang.org", "content": "A language", "engine": "duckduckgo"},
                {"title": "Crates", "url": "https://crates.io"}
            ]
        });
        let SearchOutcome::Hits(hits) = parse_searxng_json(&body) else {
            panic!("expected hits");
        };
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[&0].snippet.as_deref(), Some("A language"));
        assert_eq!(hits[&0].source.as_deref(), Some("duckduckgo"));
        assert_eq!(hits[&1].snippet, None);
        assert_eq!(hits[&1].source, None);
    }

    #[test]
    fn missing_results_is_empty_hits() {
        let outcome = parse_searxng_json(&json!({"query": "rust"}));
        assert_eq!(outcome, SearchOutcome::Hits(BTreeMap::new()));
    }

    #[test]
    fn hit_without_url_is_skipped_but_keeps_positions() {
        let body = json!({
            "results": [
                {"title": "No URL"},
                {"title": "Second", "url": "https://second.com"}
            ]
        });
        let SearchOutcome::Hits(hits) = parse_searxng_json(&body) else {
            panic!("expected hits");
        };
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[&1].url, "https://second.com");
    }

    #[test]
    fn hit_with_blank_url_is_skipped() {
        let body = json!({
            "results": [
                {"title": "Blank", "url": "", "content": "relevant text"},
                {"title": "Spaces", "url": "   ", "content": "relevant text"},
                {"title": "Real", "url": "https://a.com", "content": "other"}
            ]
        });
        let SearchOutcome::Hits(hits) = parse_searxng_json(&body) else {
            panic!("expected hits");
        };
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[&2].url, "https://a.com");
    }

    #[test]
    fn search_path_joined_onto_base() {
        let base = Url::parse("http://127.0.0.1:8888").expect("url");
        assert_eq!(
            join_search_path(&base).expect("join").as_str(),
            "http://127.0.0.1:8888/search"
        );

        let nested = Url::parse("https://example.org/searx").expect("url");
        assert_eq!(
            join_search_path(&nested).expect("join").as_str(),
            "https://example.org/searx/search"
        );
    }

    #[test]
    fn kind_is_searxng() {
        let base = Url::parse("http://127.0.0.1:8888").expect("url");
        let backend = SearXngBackend::new(reqwest::Client::new(), &base).expect("backend");
        assert_eq!(backend.kind(), BackendKind::SearXng);
    }
}
