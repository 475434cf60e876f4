//! Trait definition for pluggable search backends.
//!
//! Each backend (SearXNG, Bing, SerpAPI) implements [`SearchBackend`] to
//! provide a uniform interface for querying and normalising results.

use crate::error::SearchError;
use crate::types::{BackendKind, SearchOutcome};

/// A pluggable web search backend.
///
/// Implementors call one provider's JSON API and map its hits onto
/// [`crate::SnippetRecord`]. Each backend handles its own:
///
/// - query cleanup (surrounding quotes are stripped)
/// - request parameters and authentication headers
/// - mapping of provider-specific field names
/// - the distinction between "no result container" (an error) and
///   "empty result list" ([`SearchOutcome::NoResults`])
///
/// All implementations must be `Send + Sync` so that callers can share one
/// backend across tasks.
pub trait SearchBackend: Send + Sync {
    /// Perform a web search for a single query.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the HTTP request fails, the status is not
    /// 2xx, or the response has no result container.
    fn search(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<SearchOutcome, SearchError>> + Send;

    /// Returns which [`BackendKind`] this implementation represents.
    fn kind(&self) -> BackendKind;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SnippetRecord;
    use std::collections::BTreeMap;

    /// A mock backend for testing trait bounds and async execution.
    struct MockBackend {
        hits: Vec<SnippetRecord>,
    }

    impl SearchBackend for MockBackend {
        async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
            if self.hits.is_empty() {
                return Err(SearchError::Http(format!("mock failure for {query}")));
            }
            Ok(SearchOutcome::Hits(
                self.hits.iter().cloned().enumerate().collect::<BTreeMap<_, _>>(),
            ))
        }

        fn kind(&self) -> BackendKind {
            BackendKind::SearXng
        }
    }

    #[test]
    fn mock_backend_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockBackend>();
    }

    #[tokio::test]
    async fn mock_backend_returns_hits() {
        let backend = MockBackend {
            hits: vec![SnippetRecord::new("https://test.com", "Test")],
        };
        let outcome = backend.search("test").await.expect("should succeed");
        assert_eq!(outcome.len(), 1);
    }

    #[tokio::test]
    async fn mock_backend_propagates_errors() {
        let backend = MockBackend { hits: vec![] };
        let err = backend.search("test").await.unwrap_err();
        assert!(err.to_string().contains("mock failure for test"));
    }
}
