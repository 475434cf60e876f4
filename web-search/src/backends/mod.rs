//! Search backend implementations.
//!
//! Each module provides a struct implementing [`crate::backend::SearchBackend`]
//! for one provider's JSON API.

pub mod bing;
pub mod searxng;
pub mod serpapi;

pub use bing::BingBackend;
pub use searxng::SearXngBackend;
pub use serpapi::SerpApiBackend;

use serde_json::Value;

/// Read `key` from a JSON hit as an owned string.
///
/// Missing, non-string and blank values are all `None`.
pub(crate) fn string_field(hit: &Value, key: &str) -> Option<String> {
    hit.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_owned)
}
