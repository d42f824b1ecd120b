//! Shared test doubles.

#![allow(dead_code, clippy::unwrap_used)]

use async_trait::async_trait;
use search_tool::engine::{CollectionSchema, SearchEngine, SearchHits, SearchRequest};
use search_tool::models::Product;
use search_tool::{Error, Result};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-memory engine keeping documents by id.
///
/// Search matches documents whose name or brand contains the query text,
/// case-insensitively; `*` matches everything. Filters and sort are recorded
/// but not applied.
#[derive(Default)]
pub struct MockEngine {
    documents: Mutex<BTreeMap<String, Value>>,
    collections: Mutex<BTreeSet<String>>,
    unreachable: AtomicBool,
    search_calls: AtomicUsize,
    last_request: Mutex<Option<SearchRequest>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail as if the engine were down.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SearchRequest> {
        self.last_request.lock().unwrap().clone()
    }

    pub fn document(&self, id: &str) -> Option<Value> {
        self.documents.lock().unwrap().get(id).cloned()
    }

    pub fn insert(&self, product: &Product) {
        self.documents
            .lock()
            .unwrap()
            .insert(product.id.clone(), serde_json::to_value(product).unwrap());
    }

    fn check(&self, operation: &str) -> Result<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(Error::OperationFailed {
                operation: operation.to_string(),
                cause: "connect error: connection refused".to_string(),
            });
        }
        Ok(())
    }
}

fn field<'a>(document: &'a Value, name: &str) -> &'a str {
    document.get(name).and_then(Value::as_str).unwrap_or_default()
}

#[async_trait]
impl SearchEngine for MockEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchHits> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.check("engine_search")?;

        let needle = request.q.to_lowercase();
        let matches: Vec<Value> = self
            .documents
            .lock()
            .unwrap()
            .values()
            .filter(|doc| {
                needle == "*"
                    || field(doc, "nome").to_lowercase().contains(&needle)
                    || field(doc, "marca").to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        let found = matches.len() as u64;
        let hits = matches
            .into_iter()
            .take(request.per_page as usize)
            .map(|document| serde_json::json!({ "document": document, "text_match": 1 }))
            .collect();
        Ok(SearchHits { hits, found })
    }

    async fn upsert(&self, product: &Product) -> Result<Value> {
        self.check("engine_upsert")?;
        self.insert(product);
        Ok(serde_json::to_value(product).unwrap())
    }

    async fn delete(&self, id: &str) -> Result<Value> {
        self.check("engine_delete")?;
        self.documents
            .lock()
            .unwrap()
            .remove(id)
            .ok_or_else(|| Error::NotFound(format!("Could not find a document with id: {id}")))
    }

    async fn collection_count(&self) -> Result<usize> {
        self.check("engine_list_collections")?;
        Ok(self.collections.lock().unwrap().len())
    }

    async fn create_collection(&self, schema: &CollectionSchema) -> Result<()> {
        self.check("engine_create_collection")?;
        if self.collections.lock().unwrap().insert(schema.name.clone()) {
            Ok(())
        } else {
            Err(Error::AlreadyExists(format!(
                "A collection with name `{}` already exists.",
                schema.name
            )))
        }
    }
}
