//! Data models for search-tool.
//!
//! Product documents, search queries and the response envelopes returned by
//! every service operation.

mod product;
mod search;

pub use product::{
    MAX_DERIVED_ID_LENGTH, MAX_DESCRIPTION_LENGTH, MAX_FACET_LENGTH, MAX_NAME_LENGTH, MAX_RATING,
    Product, ProductInput, derive_product_id,
};
pub use search::{
    AutocompleteResponse, DEFAULT_AUTOCOMPLETE_LIMIT, DEFAULT_SEARCH_LIMIT, DeleteResponse,
    EngineStatus, HealthResponse, HealthStatus, IndexResponse, MAX_AUTOCOMPLETE_LIMIT,
    MAX_SEARCH_LIMIT, SearchQuery, SearchResponse, SortKey, Status,
};
