//! Search queries and response envelopes.
//!
//! Every envelope serializes its optional fields as `null` instead of
//! omitting them, so clients see the same shape on success and error paths.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Maximum number of search results per request.
pub const MAX_SEARCH_LIMIT: u32 = 100;

/// Default number of autocomplete suggestions.
pub const DEFAULT_AUTOCOMPLETE_LIMIT: u32 = 5;

/// Maximum number of autocomplete suggestions per request.
pub const MAX_AUTOCOMPLETE_LIMIT: u32 = 20;

/// Outcome of an operation, as reported in every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The engine call succeeded.
    Success,
    /// The engine call failed; see the envelope message.
    Error,
}

impl Status {
    /// Returns the status as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// User-facing sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Cheapest first.
    Price,
    /// Best rated first.
    Rating,
    /// Best text match first, ties broken by rating.
    Relevance,
}

impl SortKey {
    /// Parses a sort key.
    ///
    /// Accepts the public parameter values (`preco`, `avaliacao`,
    /// `relevancia`) and their English names. Matching is exact; anything
    /// else yields `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "preco" | "price" => Some(Self::Price),
            "avaliacao" | "rating" => Some(Self::Rating),
            "relevancia" | "relevance" => Some(Self::Relevance),
            _ => None,
        }
    }
}

/// A structured product search.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchQuery {
    /// Free-text query.
    pub text: String,
    /// Exact category filter.
    pub category: Option<String>,
    /// Exact brand filter.
    pub brand: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
    /// Raw sort key; unknown values fall back to the default order.
    pub sort: Option<String>,
    /// Page size, in `[1, 100]`.
    pub limit: u32,
    /// Record offset; see [`crate::services::pagination`] for its precision.
    pub offset: u32,
}

impl SearchQuery {
    /// Creates a query for `text` with default paging and no filters.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: DEFAULT_SEARCH_LIMIT,
            ..Self::default()
        }
    }

    /// Sets the category filter.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the brand filter.
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Sets the price bounds.
    #[must_use]
    pub const fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Sets the sort key.
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Sets limit and offset.
    #[must_use]
    pub const fn with_page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    /// Validates paging and price constraints.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when the limit is out of range, a
    /// price is negative or not finite, or the maximum price is below the
    /// minimum.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SEARCH_LIMIT).contains(&self.limit) {
            return Err(Error::InvalidInput(format!(
                "limit must be between 1 and {MAX_SEARCH_LIMIT}"
            )));
        }
        for (name, price) in [("preco_min", self.min_price), ("preco_max", self.max_price)] {
            if let Some(price) = price {
                if !price.is_finite() || price < 0.0 {
                    return Err(Error::InvalidInput(format!(
                        "{name} must be greater than or equal to 0"
                    )));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if max < min {
                return Err(Error::InvalidInput(
                    "preco_max must be greater than or equal to preco_min".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Search response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Outcome.
    pub status: Status,
    /// The query text as received.
    pub query: String,
    /// Number of matches reported by the engine.
    pub total: u64,
    /// Raw engine hits, passed through unchanged.
    pub results: Vec<Value>,
    /// Filter expression sent to the engine, if any.
    pub filters: Option<String>,
    /// Failure description on error.
    pub message: Option<String>,
}

impl SearchResponse {
    /// Builds a success envelope.
    #[must_use]
    pub fn success(
        query: impl Into<String>,
        total: u64,
        results: Vec<Value>,
        filters: Option<String>,
    ) -> Self {
        Self {
            status: Status::Success,
            query: query.into(),
            total,
            results,
            filters,
            message: None,
        }
    }

    /// Builds an error envelope with no results.
    #[must_use]
    pub fn error(
        query: impl Into<String>,
        filters: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status: Status::Error,
            query: query.into(),
            total: 0,
            results: Vec::new(),
            filters,
            message: Some(message.into()),
        }
    }
}

/// Autocomplete response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteResponse {
    /// Outcome.
    pub status: Status,
    /// The prefix as received.
    pub prefix: String,
    /// Deduplicated suggestions, at most the requested limit.
    pub suggestions: Vec<String>,
    /// Failure description on error.
    pub message: Option<String>,
}

impl AutocompleteResponse {
    /// Builds a success envelope.
    #[must_use]
    pub fn success(prefix: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self {
            status: Status::Success,
            prefix: prefix.into(),
            suggestions,
            message: None,
        }
    }

    /// Builds an error envelope with no suggestions.
    #[must_use]
    pub fn error(prefix: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            prefix: prefix.into(),
            suggestions: Vec::new(),
            message: Some(message.into()),
        }
    }
}

/// Index response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexResponse {
    /// Outcome.
    pub status: Status,
    /// The stored document, as echoed by the engine.
    pub document: Option<Value>,
    /// Failure description on error.
    pub message: Option<String>,
}

impl IndexResponse {
    /// Builds a success envelope.
    #[must_use]
    pub const fn success(document: Value) -> Self {
        Self {
            status: Status::Success,
            document: Some(document),
            message: None,
        }
    }

    /// Builds an error envelope.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            document: None,
            message: Some(message.into()),
        }
    }
}

/// Delete response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Outcome.
    pub status: Status,
    /// Id of the removed document.
    pub deleted_id: Option<String>,
    /// Failure description on error.
    pub message: Option<String>,
}

impl DeleteResponse {
    /// Builds a success envelope.
    #[must_use]
    pub fn success(deleted_id: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            deleted_id: Some(deleted_id.into()),
            message: None,
        }
    }

    /// Builds an error envelope.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            deleted_id: None,
            message: Some(message.into()),
        }
    }
}

/// Overall service health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// API and engine are up.
    Healthy,
    /// API is up, engine is not reachable.
    Degraded,
    /// The probe itself failed.
    Unhealthy,
}

/// Engine connectivity as seen by the health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineStatus {
    /// The engine answered.
    Connected,
    /// The engine did not answer.
    Disconnected,
    /// The probe failed unexpectedly.
    Error,
}

/// Health check response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: HealthStatus,
    /// API process status, always `running` when this is served.
    pub api_status: String,
    /// Engine connectivity.
    #[serde(rename = "typesense_status")]
    pub engine_status: EngineStatus,
    /// Engine details, e.g. `{"collections": 1}`.
    #[serde(rename = "typesense_info")]
    pub engine_info: Option<Value>,
    /// Human-readable summary.
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("preco", Some(SortKey::Price))]
    #[test_case("price", Some(SortKey::Price))]
    #[test_case("avaliacao", Some(SortKey::Rating))]
    #[test_case("rating", Some(SortKey::Rating))]
    #[test_case("relevancia", Some(SortKey::Relevance))]
    #[test_case("relevance", Some(SortKey::Relevance))]
    #[test_case("PRECO", None ; "case sensitive")]
    #[test_case("popularity", None ; "unknown")]
    #[test_case("", None ; "empty")]
    fn test_sort_key_parse(input: &str, expected: Option<SortKey>) {
        assert_eq!(SortKey::parse(input), expected);
    }

    #[test]
    fn test_validate_rejects_inverted_price_range() {
        let query = SearchQuery::new("tv").with_price_range(Some(100.0), Some(50.0));
        let err = query.validate().unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("preco_max"));
    }

    #[test]
    fn test_validate_accepts_equal_prices() {
        let query = SearchQuery::new("tv").with_price_range(Some(50.0), Some(50.0));
        assert!(query.validate().is_ok());
    }

    #[test_case(0 ; "zero")]
    #[test_case(101 ; "over max")]
    fn test_validate_rejects_limit(limit: u32) {
        assert!(SearchQuery::new("tv").with_page(limit, 0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let query = SearchQuery::new("tv").with_price_range(Some(-1.0), None);
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_error_envelope_serializes_nulls() {
        let value = serde_json::to_value(SearchResponse::error("tv", None, "boom")).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["total"], 0);
        assert_eq!(value["results"], serde_json::json!([]));
        assert!(value["filters"].is_null());
        assert_eq!(value["message"], "boom");
    }

    #[test]
    fn test_success_envelope_has_null_message() {
        let value =
            serde_json::to_value(AutocompleteResponse::success("ip", vec!["iPhone".into()]))
                .unwrap();
        assert_eq!(value["status"], "success");
        assert!(value.as_object().unwrap().contains_key("message"));
        assert!(value["message"].is_null());
    }

    #[test]
    fn test_health_response_uses_engine_wire_names() {
        let value = serde_json::to_value(HealthResponse {
            status: HealthStatus::Degraded,
            api_status: "running".to_string(),
            engine_status: EngineStatus::Disconnected,
            engine_info: None,
            message: None,
        })
        .unwrap();
        assert_eq!(value["status"], "degraded");
        assert_eq!(value["typesense_status"], "disconnected");
        assert!(value["typesense_info"].is_null());
    }
}
