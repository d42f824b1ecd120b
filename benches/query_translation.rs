//! Benchmarks for the query translation layer.
//!
//! Benchmark targets:
//! - Filter construction: <1us
//! - Suggestion deduplication over a full page of hits: <20us
//! - Engine query pair rendering: <2us

// Criterion macros generate items without docs - this is expected for benchmarks
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use search_tool::engine::SearchRequest;
use search_tool::engine::schema::SEARCH_QUERY_FIELDS;
use search_tool::services::{Page, build_filter, dedupe_suggestions, hit_candidates, resolve_sort};
use serde_json::{Value, json};
use std::hint::black_box;
use std::time::Duration;

// ============================================================================
// Filter / Sort / Pagination
// ============================================================================

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    group.measurement_time(Duration::from_secs(3));

    group.bench_function("empty", |b| {
        b.iter(|| build_filter(black_box(None), black_box(None), None, None));
    });

    group.bench_function("all_clauses", |b| {
        b.iter(|| {
            build_filter(
                black_box(Some("smartphones")),
                black_box(Some("Samsung")),
                black_box(Some(500.0)),
                black_box(Some(2499.9)),
            )
        });
    });

    group.bench_function("sort_and_page", |b| {
        b.iter(|| {
            (
                resolve_sort(black_box(Some("avaliacao"))),
                Page::from_offset(black_box(25), black_box(10)),
            )
        });
    });

    group.finish();
}

// ============================================================================
// Suggestion deduplication
// ============================================================================

fn sample_hits(count: usize) -> Vec<Value> {
    let brands = ["Samsung", "SAMSUNG", "Sony", "Apple", "samsung"];
    (0..count)
        .map(|i| {
            json!({
                "document": {
                    "nome": format!("Samsung Produto {i}"),
                    "marca": brands[i % brands.len()],
                },
                "text_match": 100 - i,
            })
        })
        .collect()
}

fn bench_dedupe(c: &mut Criterion) {
    let mut group = c.benchmark_group("dedupe_suggestions");

    for count in [5usize, 20, 100] {
        let hits = sample_hits(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &hits, |b, hits| {
            b.iter(|| dedupe_suggestions(black_box("sam"), hits.iter().map(hit_candidates), 20));
        });
    }

    group.finish();
}

// ============================================================================
// Request rendering
// ============================================================================

fn bench_query_pairs(c: &mut Criterion) {
    let request = SearchRequest {
        q: "notebook gamer".to_string(),
        query_by: SEARCH_QUERY_FIELDS.to_vec(),
        filter_by: Some("categoria:notebooks && preco:>=3000.0".to_string()),
        sort_by: Some("_text_match:desc,avaliacao:desc".to_string()),
        page: Some(3),
        per_page: 10,
        prefix: None,
    };

    c.bench_function("query_pairs", |b| {
        b.iter(|| black_box(&request).to_query_pairs());
    });
}

criterion_group!(benches, bench_filter, bench_dedupe, bench_query_pairs);
criterion_main!(benches);
