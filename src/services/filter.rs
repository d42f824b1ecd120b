//! Filter expression builder.
//!
//! Turns structured search parameters into the engine filter syntax:
//!
//! - `categoria:<value>` - exact category
//! - `marca:<value>` - exact brand
//! - `preco:>=<value>` - minimum price
//! - `preco:<=<value>` - maximum price
//!
//! Clauses always appear in that order and are joined with ` && `.

use crate::engine::schema::{FIELD_BRAND, FIELD_CATEGORY, FIELD_PRICE};

/// Engine logical AND operator, with surrounding spaces.
pub const AND_OPERATOR: &str = " && ";

/// Builds the filter expression for the given parameters.
///
/// Returns `None` when no parameter is present. Empty category or brand
/// strings are treated as absent.
///
/// # Examples
///
/// ```
/// use search_tool::services::build_filter;
///
/// assert_eq!(build_filter(None, None, None, None), None);
/// assert_eq!(
///     build_filter(Some("notebooks"), None, Some(1000.0), None).as_deref(),
///     Some("categoria:notebooks && preco:>=1000.0")
/// );
/// ```
#[must_use]
pub fn build_filter(
    category: Option<&str>,
    brand: Option<&str>,
    min_price: Option<f64>,
    max_price: Option<f64>,
) -> Option<String> {
    let mut clauses = Vec::with_capacity(4);

    if let Some(category) = category.filter(|c| !c.is_empty()) {
        clauses.push(format!("{FIELD_CATEGORY}:{category}"));
    }
    if let Some(brand) = brand.filter(|b| !b.is_empty()) {
        clauses.push(format!("{FIELD_BRAND}:{brand}"));
    }
    if let Some(min) = min_price {
        clauses.push(format!("{FIELD_PRICE}:>={}", format_price(min)));
    }
    if let Some(max) = max_price {
        clauses.push(format!("{FIELD_PRICE}:<={}", format_price(max)));
    }

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(AND_OPERATOR))
    }
}

/// Formats a price bound, keeping one decimal place for whole numbers.
fn format_price(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
