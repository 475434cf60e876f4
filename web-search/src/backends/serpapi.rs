//! SerpAPI backend: aggregator over Google, Baidu and Bing.
//!
//! Each upstream engine names its result-count and date-filter parameters
//! differently; [`SerpApiBackend::request_params`] owns that mapping.
//! Organic results live under `organic_results`.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use url::Url;

use super::string_field;
use crate::backend::SearchBackend;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::types::{BackendKind, SearchOutcome, SerpEngine, SnippetRecord};

/// SerpAPI client.
#[derive(Clone)]
pub struct SerpApiBackend {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
    engine: SerpEngine,
    count: usize,
    filter_date: Option<String>,
}

impl std::fmt::Debug for SerpApiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiBackend")
            .field("endpoint", &self.endpoint.as_str())
            .field("engine", &self.engine)
            .field("count", &self.count)
            .field("filter_date", &self.filter_date)
            .finish_non_exhaustive()
    }
}

impl SerpApiBackend {
    /// Create a backend calling `endpoint` with `api_key`.
    pub fn new(
        client: reqwest::Client,
        endpoint: Url,
        api_key: impl Into<String>,
        config: &SearchConfig,
    ) -> Self {
        Self {
            client,
            endpoint,
            api_key: api_key.into(),
            engine: config.serp_engine,
            count: config.results_per_query,
            filter_date: config.filter_date.clone(),
        }
    }

    /// Query parameters for `query`, including the engine-specific count
    /// and `cdr:1,cd_min:<date>` filter.
    pub fn request_params(&self, query: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("engine", self.engine.name().to_owned()),
            ("q", http::strip_quotes(query).to_owned()),
            ("api_key", self.api_key.clone()),
        ];

        let (count_key, date_key) = match self.engine {
            SerpEngine::Google => {
                params.push(("google_domain", "google.com".to_owned()));
                ("num", "tbs")
            }
            SerpEngine::Baidu => ("rn", "gpc"),
            SerpEngine::Bing => ("count", "filters"),
        };
        params.push((count_key, self.count.to_string()));
        if let Some(date) = &self.filter_date {
            params.push((date_key, format!("cdr:1,cd_min:{date}")));
        }
        params
    }
}

impl SearchBackend for SerpApiBackend {
    async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let q = http::strip_quotes(query);
        tracing::trace!(query = q, engine = %self.engine, "SerpAPI search");

        let request = self
            .client
            .get(self.endpoint.clone())
            .query(&self.request_params(query));

        let body = http::fetch_json(BackendKind::SerpApi, request).await?;
        parse_serpapi_json(&body, q, self.filter_date.as_deref())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::SerpApi
    }
}

/// Map a SerpAPI JSON body onto snippet records.
///
/// No `organic_results` key is a failed query; an empty list is the
/// [`SearchOutcome::NoResults`] sentinel.
fn parse_serpapi_json(
    body: &Value,
    query: &str,
    filter_date: Option<&str>,
) -> Result<SearchOutcome, SearchError> {
    let Some(organic) = body.get("organic_results") else {
        let message = match filter_date {
            Some(date) => format!(
                "no results found for query: '{query}' with filtering on date={date}. \
                 Use a less restrictive query or do not filter on year."
            ),
            None => format!("no results found for query: '{query}'. Use a less restrictive query."),
        };
        return Err(SearchError::NoResults(message));
    };

    let pages = organic.as_array().ok_or_else(|| {
        SearchError::Parse(format!("SerpAPI organic_results is not an array for '{query}'"))
    })?;

    if pages.is_empty() {
        let date_note = filter_date
            .map(|d| format!(" with filter date={d}"))
            .unwrap_or_default();
        return Ok(SearchOutcome::NoResults(format!(
            "No results found for '{query}'{date_note}. \
             Try with a more general query, or remove the date filter."
        )));
    }

    let mut hits = BTreeMap::new();
    for (idx, page) in pages.iter().enumerate() {
        let (Some(url), Some(title)) = (string_field(page, "link"), string_field(page, "title"))
        else {
            tracing::debug!(idx, "SerpAPI result without link or title skipped");
            continue;
        };
        hits.insert(
            idx,
            SnippetRecord {
                url,
                title,
                snippet: string_field(page, "snippet"),
                date: string_field(page, "date"),
                source: string_field(page, "source"),
                highlighted_words: highlighted_words(page),
            },
        );
    }

    Ok(SearchOutcome::Hits(hits))
}

/// Deduplicated `snippet_highlighted_words`, sorted for stable output.
fn highlighted_words(page: &Value) -> Option<Vec<String>> {
    let words = page.get("snippet_highlighted_words")?.as_array()?;
    let unique: BTreeSet<String> = words
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_owned)
        .collect();
    Some(unique.into_iter().collect())
}
