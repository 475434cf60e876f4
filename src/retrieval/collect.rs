//! URL table built from per-query search results.
//!
//! URLs are compared as exact strings. The first query to report a URL
//! owns its entry; later sightings are ignored, so the snippet that gets
//! scored is the one from the earliest query. Hits with a blank URL are
//! never collected.

use std::collections::HashMap;

use tracing::debug;
use web_search::SnippetRecord;

/// One deduplicated search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedEntry {
    /// Insertion order across the whole collection run. Used for tie-breaks.
    pub seq: usize,
    /// The hit as first reported.
    pub record: SnippetRecord,
}

/// Insertion-ordered map from URL to its first-seen hit.
#[derive(Debug, Default)]
pub struct UrlTable {
    entries: Vec<CollectedEntry>,
    index: HashMap<String, usize>,
}

impl UrlTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record` unless its URL is blank or already present.
    ///
    /// Returns `true` if the record was added.
    pub fn insert(&mut self, record: SnippetRecord) -> bool {
        if record.url.trim().is_empty() {
            debug!(title = %record.title, "hit without url skipped");
            return false;
        }
        if self.index.contains_key(&record.url) {
            return false;
        }
        let seq = self.entries.len();
        self.index.insert(record.url.clone(), seq);
        self.entries.push(CollectedEntry { seq, record });
        true
    }

    /// Insert every record in order; returns how many were new.
    pub fn extend<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = SnippetRecord>,
    {
        records
            .into_iter()
            .map(|r| self.insert(r))
            .filter(|&added| added)
            .count()
    }

    /// Number of distinct URLs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no URL was collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[CollectedEntry] {
        &self.entries
    }

    /// `(seq, url, snippet)` for every entry with a non-blank snippet.
    pub fn scorable(&self) -> Vec<ScoreItem> {
        self.entries
            .iter()
            .filter_map(|entry| {
                entry.record.snippet_text().map(|snippet| ScoreItem {
                    seq: entry.seq,
                    url: entry.record.url.clone(),
                    snippet: snippet.to_owned(),
                })
            })
            .collect()
    }
}

/// A unit of scoring work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreItem {
    /// Sequence number of the source entry.
    pub seq: usize,
    /// The URL being scored.
    pub url: String,
    /// The snippet text sent to the scorer.
    pub snippet: String,
}
