//! HTTP server.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/` | service info |
//! | GET | `/health` | health probe |
//! | GET | `/api/v1/search` | product search |
//! | GET | `/api/v1/autocomplete` | prefix suggestions |
//! | POST | `/api/v1/index` | create or replace a product |
//! | DELETE | `/api/v1/documents/{id}` | delete a product |

pub mod handlers;

use crate::config::{SearchToolConfig, ServerConfig};
use crate::observability::{REQUEST_ID_HEADER, RequestId, with_request_id};
use crate::services::QueryService;
use crate::{Error, Result};
use axum::Router;
use axum::extract::Request;
use axum::http::{HeaderValue, Method, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

/// Static service description served on `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    /// Service name.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Version string.
    pub version: String,
}

impl AppInfo {
    /// Takes the description fields from the loaded config.
    #[must_use]
    pub fn from_config(config: &SearchToolConfig) -> Self {
        Self {
            name: config.app_name.clone(),
            description: config.app_description.clone(),
            version: config.app_version.clone(),
        }
    }
}

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The query façade.
    pub service: QueryService,
    /// Service description.
    pub info: AppInfo,
}

/// Builds the application router.
#[must_use]
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let api = Router::new()
        .route("/search", get(handlers::search))
        .route("/autocomplete", get(handlers::autocomplete))
        .route("/index", post(handlers::index))
        .route("/documents/{id}", delete(handlers::delete));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .nest("/api/v1", api)
        .fallback(handlers::not_found)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id))
        .with_state(Arc::new(state))
}

/// Builds the CORS layer; a `*` entry allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            },
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Assigns or propagates `x-request-id` and scopes it over the request.
async fn request_id(request: Request, next: Next) -> Response {
    let inbound = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok());
    let id = RequestId::from_header(inbound);
    let header_value = HeaderValue::from_str(id.as_str()).ok();

    let span = tracing::info_span!(
        "request",
        request_id = %id,
        method = %request.method(),
        path = %request.uri().path()
    );
    let mut response = with_request_id(id, next.run(request)).instrument(span).await;

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Binds `config.host:config.port` and serves until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the bind fails or the server stops with an I/O error.
pub async fn serve(router: Router, config: &ServerConfig) -> Result<()> {
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|e| Error::OperationFailed {
            operation: "bind".to_string(),
            cause: format!("{}:{}: {e}", config.host, config.port),
        })?;
    let addr: SocketAddr = listener.local_addr().map_err(|e| Error::OperationFailed {
        operation: "bind".to_string(),
        cause: e.to_string(),
    })?;

    tracing::info!(addr = %addr, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::OperationFailed {
            operation: "serve".to_string(),
            cause: e.to_string(),
        })?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
