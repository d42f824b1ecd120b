//! Search engine client abstraction.
//!
//! The engine owns storage, tokenization, ranking and faceting. This module
//! defines the capability the rest of the crate consumes and the Typesense
//! implementation of it.
//!
//! # Error Modes
//!
//! | Engine answer | Mapped to |
//! |---------------|-----------|
//! | 404 | [`crate::Error::NotFound`] |
//! | 409 | [`crate::Error::AlreadyExists`] |
//! | Other non-2xx, connect failure, timeout | [`crate::Error::OperationFailed`] |
//!
//! Callers that need to distinguish "already exists" match on the variant;
//! error text is never inspected.

pub mod schema;
mod typesense;

pub use schema::{CollectionSchema, FieldSchema, product_collection_schema};
pub use typesense::TypesenseClient;

use crate::Result;
use crate::models::Product;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// Parameters of a single engine search call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Query text.
    pub q: String,
    /// Fields the query text is matched against.
    pub query_by: Vec<&'static str>,
    /// Filter expression.
    pub filter_by: Option<String>,
    /// Sort expression.
    pub sort_by: Option<String>,
    /// 1-based page number; engine default when absent.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: u32,
    /// Whether the last query token matches as a prefix; engine default when absent.
    pub prefix: Option<bool>,
}

impl SearchRequest {
    /// Renders the request as URL query pairs.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("q", self.q.clone()),
            ("query_by", self.query_by.join(",")),
            ("per_page", self.per_page.to_string()),
        ];
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sort_by", sort_by.clone()));
        }
        if let Some(filter_by) = &self.filter_by {
            pairs.push(("filter_by", filter_by.clone()));
        }
        if let Some(prefix) = self.prefix {
            pairs.push(("prefix", prefix.to_string()));
        }
        pairs
    }
}

/// Raw hits returned by a search call.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchHits {
    /// Hits, each usually `{"document": {...}, "highlights": [...], ...}`.
    #[serde(default)]
    pub hits: Vec<Value>,
    /// Total number of matching documents.
    #[serde(default)]
    pub found: u64,
}

/// Capability consumed from the search engine.
///
/// Implementations are shared across concurrent requests through
/// `Arc<dyn SearchEngine>` and must be safe for concurrent use.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// The engine name, for logs.
    fn name(&self) -> &'static str;

    /// Runs a search over the products collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine call fails.
    async fn search(&self, request: &SearchRequest) -> Result<SearchHits>;

    /// Creates or fully replaces a product document, returning it as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the document or is unreachable.
    async fn upsert(&self, product: &Product) -> Result<Value>;

    /// Deletes a product document by id, returning the removed document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if no document has that id.
    async fn delete(&self, id: &str) -> Result<Value>;

    /// Returns the number of collections; used as a liveness probe.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is unreachable.
    async fn collection_count(&self) -> Result<usize>;

    /// Creates a collection.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AlreadyExists`] if the collection exists.
    async fn create_collection(&self, schema: &CollectionSchema) -> Result<()>;
}
