//! Typesense REST client.

use super::{CollectionSchema, SearchEngine, SearchHits, SearchRequest};
use crate::config::EngineConfig;
use crate::models::Product;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;
use tracing::instrument;

/// Header carrying the engine API key.
const API_KEY_HEADER: &str = "X-TYPESENSE-API-KEY";

/// Async client for a Typesense server, bound to one products collection.
#[derive(Debug, Clone)]
pub struct TypesenseClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
    collection: String,
}

impl TypesenseClient {
    /// Creates a client from engine settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the configured host does not form a
    /// valid URL, or [`Error::OperationFailed`] if the HTTP client cannot be
    /// built.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url())
            .map_err(|e| Error::InvalidInput(format!("engine url '{}': {e}", config.base_url())))?;

        let mut builder = reqwest::Client::builder();
        if config.timeout_secs > 0 {
            let timeout = Duration::from_secs(config.timeout_secs);
            builder = builder.timeout(timeout).connect_timeout(timeout);
        }
        let client = builder.build().map_err(|e| Error::OperationFailed {
            operation: "build_engine_client".to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            collection: config.collection.clone(),
        })
    }

    /// Points the client at a different server, keeping the other settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `base_url` is not a valid URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = Url::parse(base_url)
            .map_err(|e| Error::InvalidInput(format!("engine url '{base_url}': {e}")))?;
        Ok(self)
    }

    /// The collection this client reads and writes.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Builds an endpoint URL, percent-encoding each path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::InvalidInput(format!("engine url '{}' cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn documents_endpoint(&self, extra: &[&str]) -> Result<Url> {
        let mut segments = vec!["collections", self.collection.as_str(), "documents"];
        segments.extend_from_slice(extra);
        self.endpoint(&segments)
    }

    /// Sends a request and decodes the JSON body of a successful response.
    async fn send(
        &self,
        operation: &'static str,
        method: Method,
        url: Url,
        query: &[(&'static str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let mut request = self
            .client
            .request(method, url)
            .header(API_KEY_HEADER, self.api_key.expose_secret());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            let error_kind = if e.is_timeout() {
                "timeout"
            } else if e.is_connect() {
                "connect"
            } else if e.is_request() {
                "request"
            } else {
                "unknown"
            };
            tracing::error!(
                engine = "typesense",
                operation = operation,
                error = %e,
                error_kind = error_kind,
                "Engine request failed"
            );
            Error::OperationFailed {
                operation: operation.to_string(),
                cause: format!("{error_kind} error: {e}"),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                engine = "typesense",
                operation = operation,
                status = %status,
                body = %body,
                "Engine returned error status"
            );
            return Err(status_error(operation, status, &body));
        }

        response.json::<Value>().await.map_err(|e| {
            tracing::error!(
                engine = "typesense",
                operation = operation,
                error = %e,
                "Failed to parse engine response"
            );
            Error::OperationFailed {
                operation: operation.to_string(),
                cause: format!("invalid response body: {e}"),
            }
        })
    }
}

/// Maps a non-2xx engine answer to an error variant.
fn status_error(operation: &str, status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string());

    match status {
        StatusCode::NOT_FOUND => Error::NotFound(message),
        StatusCode::CONFLICT => Error::AlreadyExists(message),
        _ => Error::OperationFailed {
            operation: operation.to_string(),
            cause: format!("engine returned status {status}: {message}"),
        },
    }
}

#[async_trait]
impl SearchEngine for TypesenseClient {
    fn name(&self) -> &'static str {
        "typesense"
    }

    #[instrument(skip(self, request), fields(engine = "typesense", q = %request.q))]
    async fn search(&self, request: &SearchRequest) -> Result<SearchHits> {
        let url = self.documents_endpoint(&["search"])?;
        let body = self
            .send("engine_search", Method::GET, url, &request.to_query_pairs(), None)
            .await?;
        serde_json::from_value(body).map_err(|e| Error::OperationFailed {
            operation: "engine_search".to_string(),
            cause: format!("unexpected search response: {e}"),
        })
    }

    #[instrument(skip(self, product), fields(engine = "typesense", id = %product.id))]
    async fn upsert(&self, product: &Product) -> Result<Value> {
        let url = self.documents_endpoint(&[])?;
        let document = serde_json::to_value(product).map_err(|e| Error::OperationFailed {
            operation: "engine_upsert".to_string(),
            cause: e.to_string(),
        })?;
        self.send(
            "engine_upsert",
            Method::POST,
            url,
            &[("action", "upsert".to_string())],
            Some(&document),
        )
        .await
    }

    #[instrument(skip(self), fields(engine = "typesense"))]
    async fn delete(&self, id: &str) -> Result<Value> {
        let url = self.documents_endpoint(&[id])?;
        self.send("engine_delete", Method::DELETE, url, &[], None).await
    }

    async fn collection_count(&self) -> Result<usize> {
        let url = self.endpoint(&["collections"])?;
        let body = self
            .send("engine_list_collections", Method::GET, url, &[], None)
            .await?;
        body.as_array()
            .map(Vec::len)
            .ok_or_else(|| Error::OperationFailed {
                operation: "engine_list_collections".to_string(),
                cause: "expected a JSON array of collections".to_string(),
            })
    }

    #[instrument(skip(self, schema), fields(engine = "typesense", collection = %schema.name))]
    async fn create_collection(&self, schema: &CollectionSchema) -> Result<()> {
        let url = self.endpoint(&["collections"])?;
        let body = serde_json::to_value(schema).map_err(|e| Error::OperationFailed {
            operation: "engine_create_collection".to_string(),
            cause: e.to_string(),
        })?;
        self.send("engine_create_collection", Method::POST, url, &[], Some(&body))
            .await?;
        Ok(())
    }
}
