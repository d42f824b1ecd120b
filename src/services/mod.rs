//! Business logic services.
//!
//! The pure translation steps (filter, sort, pagination, suggestion
//! deduplication) are free functions; [`QueryService`] composes them over a
//! [`crate::engine::SearchEngine`].

mod filter;
pub mod pagination;
mod query;
mod sort;
mod suggest;

pub use filter::{AND_OPERATOR, build_filter};
pub use pagination::Page;
pub use query::{CollectionSetup, QueryService};
pub use sort::{DEFAULT_SORT, SORT_PRICE_ASC, SORT_RATING_DESC, SORT_RELEVANCE, resolve_sort};
pub use suggest::{dedupe_suggestions, hit_candidates};
