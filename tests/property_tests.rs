//! Property-based tests for the query translation layer.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Filter clauses appear once per present input, in fixed order
//! - Suggestions are bounded, unique and prefix-matching
//! - Pagination always lands on the page containing the offset
//! - Derived ids are bounded and contain only word characters

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use search_tool::derive_product_id;
use search_tool::services::{AND_OPERATOR, Page, build_filter, dedupe_suggestions, resolve_sort};
use std::collections::HashSet;

fn facet() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-zA-Z0-9]{1,12}")
}

fn price() -> impl Strategy<Value = Option<f64>> {
    prop::option::of(0.0f64..100_000.0)
}

proptest! {
    /// Property: one clause per present input, in category/brand/min/max order.
    #[test]
    fn prop_filter_clause_order(
        category in facet(),
        brand in facet(),
        min in price(),
        max in price(),
    ) {
        let filter = build_filter(category.as_deref(), brand.as_deref(), min, max);
        let present = [category.is_some(), brand.is_some(), min.is_some(), max.is_some()]
            .iter()
            .filter(|p| **p)
            .count();

        match filter {
            None => prop_assert_eq!(present, 0),
            Some(filter) => {
                let clauses: Vec<&str> = filter.split(AND_OPERATOR).collect();
                prop_assert_eq!(clauses.len(), present);

                let mut expected_prefixes = Vec::new();
                if category.is_some() { expected_prefixes.push("categoria:"); }
                if brand.is_some() { expected_prefixes.push("marca:"); }
                if min.is_some() { expected_prefixes.push("preco:>="); }
                if max.is_some() { expected_prefixes.push("preco:<="); }
                for (clause, prefix) in clauses.iter().zip(expected_prefixes) {
                    prop_assert!(clause.starts_with(prefix), "{} should start with {}", clause, prefix);
                }
            },
        }
    }

    /// Property: price bounds survive formatting as numbers.
    #[test]
    fn prop_filter_price_parses_back(min in 0.0f64..1_000_000.0) {
        let filter = build_filter(None, None, Some(min), None).unwrap();
        let value: f64 = filter.trim_start_matches("preco:>=").parse().unwrap();
        prop_assert!((value - min).abs() < 1e-9);
    }

    /// Property: suggestions are bounded, unique ignoring case, and match the prefix.
    #[test]
    fn prop_suggestions_bounded_unique_and_prefixed(
        prefix in "[a-cA-C]{1,2}",
        pairs in prop::collection::vec(("[a-cA-C]{1,4}", "[a-cA-C]{1,4}"), 0..20),
        limit in 0usize..10,
    ) {
        let hits = pairs.iter().map(|(n, b)| (n.as_str(), b.as_str()));
        let suggestions = dedupe_suggestions(&prefix, hits, limit);

        prop_assert!(suggestions.len() <= limit);

        let lowered_prefix = prefix.to_lowercase();
        let mut seen = HashSet::new();
        for suggestion in &suggestions {
            let lowered = suggestion.to_lowercase();
            prop_assert!(lowered.starts_with(&lowered_prefix));
            prop_assert!(seen.insert(lowered), "duplicate suggestion {}", suggestion);
        }
    }

    /// Property: with a generous limit every matching candidate is suggested.
    #[test]
    fn prop_suggestions_complete_under_large_limit(
        pairs in prop::collection::vec(("[ab]{1,3}", "[ab]{1,3}"), 0..8),
    ) {
        let hits = pairs.iter().map(|(n, b)| (n.as_str(), b.as_str()));
        let suggestions = dedupe_suggestions("a", hits, 100);

        let expected: HashSet<String> = pairs
            .iter()
            .flat_map(|(n, b)| [n.to_lowercase(), b.to_lowercase()])
            .filter(|c| c.starts_with('a'))
            .collect();
        let actual: HashSet<String> = suggestions.iter().map(|s| s.to_lowercase()).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Property: the engine page always contains the requested offset.
    #[test]
    fn prop_page_contains_offset(offset in 0u32..1_000_000, limit in 1u32..=100) {
        let page = Page::from_offset(offset, limit);
        prop_assert!(page.page >= 1);
        prop_assert_eq!(page.per_page, limit);

        let start = page.effective_offset();
        prop_assert!(start <= u64::from(offset));
        prop_assert!(u64::from(offset) < start + u64::from(limit));
    }

    /// Property: unknown sort keys never produce an expression.
    #[test]
    fn prop_unknown_sort_keys_resolve_to_none(key in "[a-z]{1,12}") {
        prop_assume!(!matches!(
            key.as_str(),
            "preco" | "price" | "avaliacao" | "rating" | "relevancia" | "relevance"
        ));
        prop_assert_eq!(resolve_sort(Some(&key)), None);
    }

    /// Property: derived ids are bounded and contain no whitespace or punctuation.
    #[test]
    fn prop_derived_id_shape(name in "[a-zA-Z0-9 _!?.,()-]{0,120}") {
        let id = derive_product_id(&name);
        prop_assert!(id.chars().count() <= 50);
        prop_assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        prop_assert_eq!(derive_product_id(&name), id);
    }
}
