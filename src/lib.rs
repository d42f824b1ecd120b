//! # search-tool
//!
//! A product search REST API over a Typesense search engine.
//!
//! The engine owns storage, tokenization, ranking and faceting. This crate
//! translates HTTP requests into engine calls and shapes the responses:
//!
//! - Filter construction from category, brand and price bounds
//! - Sort key mapping to engine sort expressions
//! - Offset/limit to page/per-page translation
//! - Case-insensitive autocomplete suggestion deduplication
//! - Uniform success/error response envelopes
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use search_tool::{QueryService, SearchQuery, SearchToolConfig, TypesenseClient};
//!
//! let config = SearchToolConfig::load_default();
//! let engine = Arc::new(TypesenseClient::new(&config.engine)?);
//! let service = QueryService::new(engine, &config.engine.collection);
//!
//! let response = service.search(&SearchQuery::new("iphone")).await?;
//! assert_eq!(response.status, search_tool::Status::Success);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod config;
pub mod engine;
pub mod models;
pub mod observability;
pub mod server;
pub mod services;

pub use config::{EngineConfig, SearchToolConfig, ServerConfig};
pub use engine::{SearchEngine, TypesenseClient};
pub use models::{
    AutocompleteResponse, DeleteResponse, HealthResponse, IndexResponse, Product, ProductInput,
    SearchQuery, SearchResponse, SortKey, Status, derive_product_id,
};
pub use services::QueryService;

/// Error type for search-tool operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Price range inverted, parameters out of range, invalid product fields |
/// | `OperationFailed` | Engine unreachable, timeouts, unexpected engine status codes |
/// | `NotFound` | Engine answered 404 (unknown document or collection) |
/// | `AlreadyExists` | Engine answered 409 (collection or document already present) |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided by the caller.
    ///
    /// Raised before the engine is contacted. The HTTP layer maps it to a
    /// 400 response.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An engine or transport operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// The engine reported that the requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The engine reported that the resource already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),
}

impl Error {
    /// Returns true for errors caused by the caller's input.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Result type alias for search-tool operations.
pub type Result<T> = std::result::Result<T, Error>;
