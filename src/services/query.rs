//! Query façade over the search engine.
//!
//! Validates caller input, translates it into engine requests and shapes the
//! engine answers into response envelopes. Input errors are returned as
//! [`Error::InvalidInput`] before the engine is contacted. Engine failures
//! are folded into envelopes with `status: "error"` and never surface as `Err`.

use super::filter::build_filter;
use super::pagination::Page;
use super::sort::{DEFAULT_SORT, SORT_RATING_DESC, resolve_sort};
use super::suggest::{dedupe_suggestions, hit_candidates};
use crate::engine::schema::{AUTOCOMPLETE_QUERY_FIELDS, SEARCH_QUERY_FIELDS};
use crate::engine::{SearchEngine, SearchRequest, product_collection_schema};
use crate::models::{
    AutocompleteResponse, DeleteResponse, EngineStatus, HealthResponse, HealthStatus,
    IndexResponse, MAX_AUTOCOMPLETE_LIMIT, Product, SearchQuery, SearchResponse,
};
use crate::observability::{REQUEST_DURATION_MS, REQUESTS_TOTAL};
use crate::{Error, Result};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Outcome of [`QueryService::ensure_collection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionSetup {
    /// The collection was created.
    Created,
    /// The collection was already there.
    AlreadyExisted,
}

/// Search, autocomplete and document operations over one products collection.
#[derive(Clone)]
pub struct QueryService {
    engine: Arc<dyn SearchEngine>,
    collection: String,
}

impl std::fmt::Debug for QueryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryService")
            .field("engine", &self.engine.name())
            .field("collection", &self.collection)
            .finish()
    }
}

impl QueryService {
    /// Creates a service over `engine`, managing the named collection.
    #[must_use]
    pub fn new(engine: Arc<dyn SearchEngine>, collection: impl Into<String>) -> Self {
        Self {
            engine,
            collection: collection.into(),
        }
    }

    /// The collection name.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Runs a product search.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the query fails validation. Engine
    /// failures are reported in the envelope instead.
    #[instrument(skip(self, query), fields(operation = "search", q = %query.text))]
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        query.validate()?;
        let start = Instant::now();

        let filters = build_filter(
            query.category.as_deref(),
            query.brand.as_deref(),
            query.min_price,
            query.max_price,
        );
        let sort_by = resolve_sort(query.sort.as_deref()).unwrap_or(DEFAULT_SORT);
        let page = Page::from_offset(query.offset, query.limit);

        let request = SearchRequest {
            q: query.text.clone(),
            query_by: SEARCH_QUERY_FIELDS.to_vec(),
            filter_by: filters.clone(),
            sort_by: Some(sort_by.to_string()),
            page: Some(page.page),
            per_page: page.per_page,
            prefix: None,
        };

        let response = match self.engine.search(&request).await {
            Ok(hits) => {
                tracing::debug!(found = hits.found, returned = hits.hits.len(), "Search completed");
                SearchResponse::success(&query.text, hits.found, hits.hits, filters)
            },
            Err(e) => {
                tracing::error!(error = %e, "Search failed");
                SearchResponse::error(&query.text, filters, e.to_string())
            },
        };

        record_metrics("search", response.status.as_str(), start);
        Ok(response)
    }

    /// Suggests product names and brands starting with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `prefix` is empty or `limit` is not
    /// in `1..=20`.
    #[instrument(skip(self), fields(operation = "autocomplete"))]
    pub async fn autocomplete(&self, prefix: &str, limit: u32) -> Result<AutocompleteResponse> {
        if prefix.is_empty() {
            return Err(Error::InvalidInput("q must not be empty".to_string()));
        }
        if !(1..=MAX_AUTOCOMPLETE_LIMIT).contains(&limit) {
            return Err(Error::InvalidInput(format!(
                "limit must be between 1 and {MAX_AUTOCOMPLETE_LIMIT}"
            )));
        }
        let start = Instant::now();

        let request = SearchRequest {
            q: prefix.to_string(),
            query_by: AUTOCOMPLETE_QUERY_FIELDS.to_vec(),
            filter_by: None,
            sort_by: Some(SORT_RATING_DESC.to_string()),
            page: None,
            per_page: limit,
            prefix: Some(true),
        };

        let response = match self.engine.search(&request).await {
            Ok(hits) => {
                let suggestions = dedupe_suggestions(
                    prefix,
                    hits.hits.iter().map(hit_candidates),
                    limit as usize,
                );
                AutocompleteResponse::success(prefix, suggestions)
            },
            Err(e) => {
                tracing::error!(error = %e, "Autocomplete failed");
                AutocompleteResponse::error(prefix, e.to_string())
            },
        };

        record_metrics("autocomplete", response.status.as_str(), start);
        Ok(response)
    }

    /// Creates or replaces a product document.
    #[instrument(skip(self, product), fields(operation = "index", id = %product.id))]
    pub async fn index(&self, product: &Product) -> IndexResponse {
        let start = Instant::now();
        let response = match self.engine.upsert(product).await {
            Ok(document) => {
                tracing::info!("Product indexed");
                IndexResponse::success(document)
            },
            Err(e) => {
                tracing::error!(error = %e, "Indexing failed");
                IndexResponse::error(e.to_string())
            },
        };
        record_metrics("index", response.status.as_str(), start);
        response
    }

    /// Deletes a product document by id.
    #[instrument(skip(self), fields(operation = "delete"))]
    pub async fn delete(&self, id: &str) -> DeleteResponse {
        let start = Instant::now();
        let response = match self.engine.delete(id).await {
            Ok(_) => {
                tracing::info!("Product deleted");
                DeleteResponse::success(id)
            },
            Err(e) => {
                tracing::warn!(error = %e, "Delete failed");
                DeleteResponse::error(e.to_string())
            },
        };
        record_metrics("delete", response.status.as_str(), start);
        response
    }

    /// Probes the engine.
    ///
    /// A transport or engine failure yields `degraded`; an unexpected answer
    /// (e.g. a conflict or missing resource on the probe) yields `unhealthy`.
    #[instrument(skip(self), fields(operation = "health"))]
    pub async fn health(&self) -> HealthResponse {
        let start = Instant::now();
        let response = match self.engine.collection_count().await {
            Ok(collections) => HealthResponse {
                status: HealthStatus::Healthy,
                api_status: "running".to_string(),
                engine_status: EngineStatus::Connected,
                engine_info: Some(json!({ "collections": collections })),
                message: Some("API and engine running normally".to_string()),
            },
            Err(e @ Error::OperationFailed { .. }) => {
                tracing::warn!(engine = self.engine.name(), error = %e, "Engine unavailable");
                HealthResponse {
                    status: HealthStatus::Degraded,
                    api_status: "running".to_string(),
                    engine_status: EngineStatus::Disconnected,
                    engine_info: None,
                    message: Some(format!("API running, engine unavailable: {e}")),
                }
            },
            Err(e) => {
                tracing::error!(engine = self.engine.name(), error = %e, "Health probe failed");
                HealthResponse {
                    status: HealthStatus::Unhealthy,
                    api_status: "running".to_string(),
                    engine_status: EngineStatus::Error,
                    engine_info: None,
                    message: Some(format!("Health check failed: {e}")),
                }
            },
        };
        let status = if response.status == HealthStatus::Healthy {
            "success"
        } else {
            "error"
        };
        record_metrics("health", status, start);
        response
    }

    /// Creates the products collection unless it already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine fails for any reason other than the
    /// collection already existing.
    #[instrument(skip(self), fields(operation = "setup", collection = %self.collection))]
    pub async fn ensure_collection(&self) -> Result<CollectionSetup> {
        let schema = product_collection_schema(&self.collection);
        match self.engine.create_collection(&schema).await {
            Ok(()) => {
                tracing::info!("Collection created");
                Ok(CollectionSetup::Created)
            },
            Err(Error::AlreadyExists(_)) => {
                tracing::info!("Collection already exists");
                Ok(CollectionSetup::AlreadyExisted)
            },
            Err(e) => Err(e),
        }
    }
}

/// Records request count and latency for one façade operation.
fn record_metrics(operation: &'static str, status: &'static str, start: Instant) {
    metrics::counter!(REQUESTS_TOTAL, "operation" => operation, "status" => status).increment(1);
    metrics::histogram!(REQUEST_DURATION_MS, "operation" => operation)
        .record(start.elapsed().as_secs_f64() * 1000.0);
}
