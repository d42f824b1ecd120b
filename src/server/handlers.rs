//! HTTP handlers.
//!
//! Handlers parse parameters, call [`QueryService`](crate::QueryService) and
//! serialize the envelope it returns. Malformed parameters and
//! [`Error::InvalidInput`] become a JSON error body with a 4xx status; every
//! other outcome is a 200 with the operation's envelope.

use super::AppState;
use crate::Error;
use crate::models::{
    AutocompleteResponse, DEFAULT_AUTOCOMPLETE_LIMIT, DEFAULT_SEARCH_LIMIT, DeleteResponse,
    HealthResponse, IndexResponse, ProductInput, SearchQuery, SearchResponse,
};
use crate::observability::current_request_id;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Error returned by handlers before an envelope is produced.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Builds a 400 error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(message) => Self::bad_request(message),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: other.to_string(),
            },
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(
            status = %self.status,
            message = %self.message,
            request_id = current_request_id().as_deref().unwrap_or_default(),
            "Request rejected"
        );
        let body = json!({ "status": "error", "message": self.message });
        (self.status, Json(body)).into_response()
    }
}

/// Query string of `GET /api/v1/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search text.
    pub q: String,
    /// Category filter.
    pub categoria: Option<String>,
    /// Brand filter.
    pub marca: Option<String>,
    /// Minimum price.
    pub preco_min: Option<f64>,
    /// Maximum price.
    pub preco_max: Option<f64>,
    /// Sort key.
    pub sort: Option<String>,
    /// Page size.
    #[serde(default = "default_search_limit")]
    pub limit: u32,
    /// Record offset.
    #[serde(default)]
    pub offset: u32,
}

const fn default_search_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

impl From<SearchParams> for SearchQuery {
    fn from(params: SearchParams) -> Self {
        Self {
            text: params.q,
            category: params.categoria,
            brand: params.marca,
            min_price: params.preco_min,
            max_price: params.preco_max,
            sort: params.sort,
            limit: params.limit,
            offset: params.offset,
        }
    }
}

/// Query string of `GET /api/v1/autocomplete`.
#[derive(Debug, Deserialize)]
pub struct AutocompleteParams {
    /// Prefix to complete.
    pub q: String,
    /// Maximum number of suggestions.
    #[serde(default = "default_autocomplete_limit")]
    pub limit: u32,
}

const fn default_autocomplete_limit() -> u32 {
    DEFAULT_AUTOCOMPLETE_LIMIT
}

/// `GET /api/v1/search`
pub async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params?;
    let query = SearchQuery::from(params);
    Ok(Json(state.service.search(&query).await?))
}

/// `GET /api/v1/autocomplete`
pub async fn autocomplete(
    State(state): State<Arc<AppState>>,
    params: Result<Query<AutocompleteParams>, QueryRejection>,
) -> Result<Json<AutocompleteResponse>, ApiError> {
    let Query(params) = params?;
    Ok(Json(
        state.service.autocomplete(&params.q, params.limit).await?,
    ))
}

/// `POST /api/v1/index`
pub async fn index(
    State(state): State<Arc<AppState>>,
    input: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<IndexResponse>, ApiError> {
    let Json(input) = input?;
    let product = input.into_product()?;
    Ok(Json(state.service.index(&product).await))
}

/// `DELETE /api/v1/documents/{id}`
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<DeleteResponse> {
    Json(state.service.delete(&id).await)
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(state.service.health().await)
}

/// `GET /`
pub async fn root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "name": state.info.name,
        "description": state.info.description,
        "version": state.info.version,
        "health": "/health",
        "endpoints": {
            "search": "/api/v1/search",
            "autocomplete": "/api/v1/autocomplete",
            "index": "/api/v1/index",
            "delete": "/api/v1/documents/{id}",
        },
    }))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError {
        status: StatusCode::NOT_FOUND,
        message: "route not found".to_string(),
    }
}
