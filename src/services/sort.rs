//! Sort key resolution.

use crate::models::SortKey;

/// Ascending price.
pub const SORT_PRICE_ASC: &str = "preco:asc";

/// Descending rating.
pub const SORT_RATING_DESC: &str = "avaliacao:desc";

/// Descending text match, ties broken by descending rating.
pub const SORT_RELEVANCE: &str = "_text_match:desc,avaliacao:desc";

/// Sort applied when the caller gives no usable key.
pub const DEFAULT_SORT: &str = SORT_RELEVANCE;

impl SortKey {
    /// Returns the engine sort expression for this key.
    #[must_use]
    pub const fn sort_expression(self) -> &'static str {
        match self {
            Self::Price => SORT_PRICE_ASC,
            Self::Rating => SORT_RATING_DESC,
            Self::Relevance => SORT_RELEVANCE,
        }
    }
}

/// Maps a raw sort key to an engine sort expression.
///
/// Returns `None` for an absent or unrecognized key, meaning "use the
/// default order". Never fails.
#[must_use]
pub fn resolve_sort(key: Option<&str>) -> Option<&'static str> {
    key.and_then(SortKey::parse).map(SortKey::sort_expression)
}
