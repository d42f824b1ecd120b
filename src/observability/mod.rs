//! Observability and telemetry.
//!
//! Structured logging through `tracing-subscriber`, Prometheus metrics, and
//! per-request correlation IDs.

mod logging;
mod metrics;
mod request_context;

pub use logging::{LOG_FORMAT_ENV, LogFormat, LoggingConfig};
pub use metrics::{
    DEFAULT_METRICS_PORT, METRICS_ENABLED_ENV, METRICS_PORT_ENV, MetricsConfig, REQUEST_DURATION_MS,
    REQUESTS_TOTAL, install_prometheus,
};
pub use request_context::{
    REQUEST_ID_HEADER, RequestId, current_request_id, with_request_id,
};

use crate::config::SearchToolConfig;
use crate::{Error, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Full observability configuration.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Metrics configuration.
    pub metrics: MetricsConfig,
}

impl ObservabilityConfig {
    /// Resolves observability settings from the loaded config and environment.
    #[must_use]
    pub fn from_config(config: &SearchToolConfig) -> Self {
        Self {
            logging: LoggingConfig::from_settings(Some(&config.logging), config.debug),
            metrics: MetricsConfig::from_settings(Some(&config.metrics)),
        }
    }
}

/// Handle for observability runtime components.
#[derive(Debug, Default)]
pub struct ObservabilityHandle {
    metrics: Option<PrometheusHandle>,
}

impl ObservabilityHandle {
    /// Renders the current metrics in Prometheus text format, if enabled.
    #[must_use]
    pub fn render_metrics(&self) -> Option<String> {
        self.metrics.as_ref().map(PrometheusHandle::render)
    }
}

/// Initializes logging and metrics for the process.
///
/// Can succeed only once per process: the global subscriber and the global
/// metrics recorder both refuse to be replaced.
///
/// # Errors
///
/// Returns an error if the log filter directive is invalid, a global
/// subscriber is already set, or the metrics exporter fails to install.
pub fn init(config: &ObservabilityConfig) -> Result<ObservabilityHandle> {
    let filter = EnvFilter::try_new(&config.logging.filter).map_err(|e| {
        Error::InvalidInput(format!("log filter '{}': {e}", config.logging.filter))
    })?;

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match config.logging.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()
        .map_err(|e| Error::OperationFailed {
            operation: "logging_init".to_string(),
            cause: e.to_string(),
        })?;

    let metrics = install_prometheus(&config.metrics)?;
    tracing::debug!(
        format = ?config.logging.format,
        filter = %config.logging.filter,
        metrics = metrics.is_some(),
        "Observability initialized"
    );
    Ok(ObservabilityHandle { metrics })
}
