//! Bing Web Search v7 backend: Microsoft's commercial search API.
//!
//! Authenticated with the `Ocp-Apim-Subscription-Key` header. Organic
//! results live under `webPages.value`.

use std::collections::BTreeMap;

use serde_json::Value;
use url::Url;

use super::string_field;
use crate::backend::SearchBackend;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::types::{BackendKind, SearchOutcome, SnippetRecord};

/// Bing Web Search v7 client.
#[derive(Clone)]
pub struct BingBackend {
    client: reqwest::Client,
    endpoint: Url,
    subscription_key: String,
    market: String,
    count: usize,
}

impl std::fmt::Debug for BingBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BingBackend")
            .field("endpoint", &self.endpoint.as_str())
            .field("market", &self.market)
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl BingBackend {
    /// Create a backend calling `endpoint` with `subscription_key`.
    pub fn new(
        client: reqwest::Client,
        endpoint: Url,
        subscription_key: impl Into<String>,
        config: &SearchConfig,
    ) -> Self {
        Self {
            client,
            endpoint,
            subscription_key: subscription_key.into(),
            market: config.market.clone(),
            count: config.results_per_query,
        }
    }
}

impl SearchBackend for BingBackend {
    async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let q = http::strip_quotes(query);
        tracing::trace!(query = q, market = %self.market, "Bing search");

        let count = self.count.to_string();
        let request = self
            .client
            .get(self.endpoint.clone())
            .query(&[("q", q), ("mkt", self.market.as_str()), ("count", count.as_str())])
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key);

        let body = http::fetch_json(BackendKind::Bing, request).await?;
        parse_bing_json(&body, q)
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Bing
    }
}

/// Map a Bing v7 JSON body onto snippet records.
///
/// A body without `webPages.value` is a failed query.
fn parse_bing_json(body: &Value, query: &str) -> Result<SearchOutcome, SearchError> {
    let pages = body
        .get("webPages")
        .and_then(|w| w.get("value"))
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::NoResults(format!("no results found for query: '{query}'")))?;

    let mut hits = BTreeMap::new();
    for (idx, page) in pages.iter().enumerate() {
        let (Some(url), Some(title)) = (string_field(page, "url"), string_field(page, "name"))
        else {
            tracing::debug!(idx, "Bing page without url or name skipped");
            continue;
        };
        hits.insert(
            idx,
            SnippetRecord {
                url,
                title,
                snippet: string_field(page, "snippet"),
                date: string_field(page, "dateLastCrawled"),
                source: string_field(page, "displayUrl"),
                highlighted_words: None,
            },
        );
    }

    Ok(SearchOutcome::Hits(hits))
}
