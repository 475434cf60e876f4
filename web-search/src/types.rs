//! Core types for normalised search hits and backend identification.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One search hit, normalised across all backends.
///
/// `url` and `title` are always present. Every other field is `None` when
/// the provider response did not carry it; fields are never defaulted to
/// empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetRecord {
    /// The URL of the result page. Unique key for deduplication.
    pub url: String,
    /// The title of the result page.
    pub title: String,
    /// Text excerpt used as relevance input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Publication or crawl date as reported by the provider (free-form).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Provider-specific source label (engine name, display URL, outlet).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Words the provider highlighted in the snippet, deduplicated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_words: Option<Vec<String>>,
}

impl SnippetRecord {
    /// Create a record with only the required fields set.
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            snippet: None,
            date: None,
            source: None,
            highlighted_words: None,
        }
    }

    /// Set the snippet text.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    /// Returns the snippet if it carries any non-whitespace text.
    pub fn snippet_text(&self) -> Option<&str> {
        self.snippet.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Result of one backend query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Hits keyed by their position in the provider's result list.
    Hits(BTreeMap<usize, SnippetRecord>),
    /// The provider answered with an empty result list. Carries a
    /// human-readable message suitable for logging.
    NoResults(String),
}

impl SearchOutcome {
    /// Number of hits, zero for [`SearchOutcome::NoResults`].
    pub fn len(&self) -> usize {
        match self {
            Self::Hits(hits) => hits.len(),
            Self::NoResults(_) => 0,
        }
    }

    /// Returns `true` if there are no hits.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The supported search backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Self-hosted SearXNG meta-search instance.
    SearXng,
    /// Bing Web Search v7 commercial API.
    Bing,
    /// SerpAPI aggregator.
    SerpApi,
}

impl BackendKind {
    /// Returns the human-readable name of this backend.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SearXng => "SearXNG",
            Self::Bing => "Bing",
            Self::SerpApi => "SerpAPI",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Upstream engine that SerpAPI should query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerpEngine {
    /// Google, recommended to keep the count below 100.
    #[default]
    Google,
    /// Baidu, at most 50 results per page.
    Baidu,
    /// Bing, at most 50 results per page.
    Bing,
}

impl SerpEngine {
    /// Value of SerpAPI's `engine` parameter.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Baidu => "baidu",
            Self::Bing => "bing",
        }
    }
}

impl fmt::Display for SerpEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_record_omits_absent_fields_in_json() {
        let record = SnippetRecord::new("https://a.com", "A");
        let json = serde_json::to_value(&record).expect("serialize");
        let obj = json.as_object().expect("object");
        assert_eq!(obj.len(), 2);
        assert!(obj.contains_key("url"));
        assert!(obj.contains_key("title"));
    }

    #[test]
    fn snippet_text_ignores_blank() {
        let blank = SnippetRecord::new("https://a.com", "A").with_snippet("   ");
        assert_eq!(blank.snippet_text(), None);

        let missing = SnippetRecord::new("https://a.com", "A");
        assert_eq!(missing.snippet_text(), None);

        let present = SnippetRecord::new("https://a.com", "A").with_snippet("hello");
        assert_eq!(present.snippet_text(), Some("hello"));
    }

    #[test]
    fn outcome_len() {
        let mut hits = BTreeMap::new();
        hits.insert(0, SnippetRecord::new("https://a.com", "A"));
        hits.insert(3, SnippetRecord::new("https://b.com", "B"));
        assert_eq!(SearchOutcome::Hits(hits).len(), 2);

        let none = SearchOutcome::NoResults("nothing".into());
        assert!(none.is_empty());
    }

    #[test]
    fn backend_kind_display() {
        assert_eq!(BackendKind::SearXng.to_string(), "SearXNG");
        assert_eq!(BackendKind::Bing.to_string(), "Bing");
        assert_eq!(BackendKind::SerpApi.to_string(), "SerpAPI");
    }

    #[test]
    fn serp_engine_serde_is_lowercase() {
        let json = serde_json::to_string(&SerpEngine::Baidu).expect("serialize");
        assert_eq!(json, "\"baidu\"");
        let decoded: SerpEngine = serde_json::from_str("\"bing\"").expect("deserialize");
        assert_eq!(decoded, SerpEngine::Bing);
    }

    #[test]
    fn serp_engine_default_is_google() {
        assert_eq!(SerpEngine::default(), SerpEngine::Google);
    }
}
