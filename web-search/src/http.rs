//! Shared HTTP plumbing for backend requests.
//!
//! One [`reqwest::Client`] is built per backend and reused for every query;
//! [`fetch_json`] turns a prepared request into a decoded JSON body with
//! consistent error mapping.

use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::BackendKind;

/// User-Agent sent when the config does not override it.
const DEFAULT_USER_AGENT: &str = concat!("web-search/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] for JSON search APIs.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let ua = config
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Send `request`, fail on non-2xx status, and decode the body as JSON.
///
/// # Errors
///
/// - [`SearchError::Timeout`] if the request timed out
/// - [`SearchError::Http`] on connection failure or non-success status
/// - [`SearchError::Parse`] if the body is not JSON
pub async fn fetch_json(
    backend: BackendKind,
    request: reqwest::RequestBuilder,
) -> Result<serde_json::Value, SearchError> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            SearchError::Timeout(format!("{backend} request timed out: {e}"))
        } else {
            SearchError::Http(format!("{backend} request failed: {e}"))
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SearchError::Http(format!(
            "{backend} HTTP {}: {}",
            status.as_u16(),
            truncate_for_log(&body, 200)
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| SearchError::Http(format!("{backend} response read failed: {e}")))?;

    tracing::trace!(%backend, bytes = body.len(), "search response received");

    serde_json::from_str(&body)
        .map_err(|e| SearchError::Parse(format!("{backend} returned invalid JSON: {e}")))
}

/// Strip leading and trailing double quotes from a query.
pub fn strip_quotes(query: &str) -> &str {
    query.trim_start_matches('"').trim_end_matches('"')
}

fn truncate_for_log(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_owned(),
    }
}
