//! Autocomplete suggestion extraction.
//!
//! Each prefix-search hit contributes up to two candidates, its name and then
//! its brand. A candidate is kept when its lowercase form starts with the
//! lowercase prefix and no earlier suggestion has the same lowercase form.
//! Hits stop being read once `limit` suggestions are collected, and the
//! result is cut to `limit` since one hit can add two.

use crate::engine::schema::{FIELD_BRAND, FIELD_NAME};
use serde_json::Value;
use std::collections::HashSet;

/// Returns the `(name, brand)` candidates of a raw engine hit.
///
/// Reads `hit.document.nome` and `hit.document.marca`; missing or non-string
/// fields become empty strings.
#[must_use]
pub fn hit_candidates(hit: &Value) -> (&str, &str) {
    let document = hit.get("document");
    (
        string_field(document, FIELD_NAME),
        string_field(document, FIELD_BRAND),
    )
}

fn string_field<'a>(document: Option<&'a Value>, name: &str) -> &'a str {
    document
        .and_then(|doc| doc.get(name))
        .and_then(Value::as_str)
        .unwrap_or_default()
}

/// Builds the deduplicated suggestion list from `(name, brand)` pairs.
///
/// # Examples
///
/// ```
/// use search_tool::services::dedupe_suggestions;
///
/// let hits = [("iPhone 15", "Apple"), ("iPhone 15 Pro", "Apple")];
/// assert_eq!(
///     dedupe_suggestions("ip", hits, 5),
///     vec!["iPhone 15".to_string(), "iPhone 15 Pro".to_string()]
/// );
/// ```
#[must_use]
pub fn dedupe_suggestions<'a, I>(prefix: &str, hits: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let prefix = prefix.to_lowercase();
    let mut seen = HashSet::new();
    let mut suggestions = Vec::new();

    for (name, brand) in hits {
        for candidate in [name, brand] {
            let lowered = candidate.to_lowercase();
            if lowered.starts_with(&prefix) && seen.insert(lowered) {
                suggestions.push(candidate.to_string());
            }
        }

        if suggestions.len() >= limit {
            break;
        }
    }

    suggestions.truncate(limit);
    suggestions
}
