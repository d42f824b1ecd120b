//! Prometheus metrics.
//!
//! Every façade operation records [`REQUESTS_TOTAL`] labelled by `operation`
//! and `status`, and [`REQUEST_DURATION_MS`] labelled by `operation`.

use crate::config::{MetricsSettings, parse_bool};
use crate::{Error, Result};
use metrics::Unit;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Environment variable enabling the exporter.
pub const METRICS_ENABLED_ENV: &str = "SEARCH_TOOL_METRICS_ENABLED";
/// Environment variable setting the exporter port.
pub const METRICS_PORT_ENV: &str = "SEARCH_TOOL_METRICS_PORT";
/// Default exporter port.
pub const DEFAULT_METRICS_PORT: u16 = 9090;

/// Counter of façade operations.
pub const REQUESTS_TOTAL: &str = "search_requests_total";
/// Histogram of façade operation latency, engine round trip included.
pub const REQUEST_DURATION_MS: &str = "search_request_duration_ms";

/// Metrics configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,
    /// Address to bind the metrics exporter.
    pub listen_addr: SocketAddr,
}

impl MetricsConfig {
    /// Builds metrics configuration from config settings with env overrides.
    #[must_use]
    pub fn from_settings(settings: Option<&MetricsSettings>) -> Self {
        Self::from_settings_with(settings, |key| std::env::var(key).ok())
    }

    /// Builds metrics configuration reading overrides through `lookup`.
    #[must_use]
    pub fn from_settings_with<F>(settings: Option<&MetricsSettings>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut enabled = settings.and_then(|config| config.enabled).unwrap_or(false);
        let mut port = settings
            .and_then(|config| config.port)
            .unwrap_or(DEFAULT_METRICS_PORT);

        if let Some(v) = lookup(METRICS_ENABLED_ENV).as_deref().and_then(parse_bool) {
            enabled = v;
        }
        if let Some(v) = lookup(METRICS_PORT_ENV).and_then(|v| v.trim().parse().ok()) {
            port = v;
        }

        Self {
            enabled,
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port),
        }
    }
}

/// Installs the Prometheus recorder and its HTTP listener.
///
/// Returns `None` when metrics are disabled. Must be called from within a
/// tokio runtime, which drives the listener.
///
/// # Errors
///
/// Returns an error if there is no runtime, the exporter cannot bind, or a
/// recorder is already installed.
pub fn install_prometheus(config: &MetricsConfig) -> Result<Option<PrometheusHandle>> {
    if !config.enabled {
        return Ok(None);
    }

    let runtime_handle = tokio::runtime::Handle::try_current().map_err(|e| Error::OperationFailed {
        operation: "metrics_exporter_build".to_string(),
        cause: e.to_string(),
    })?;

    let builder = PrometheusBuilder::new().with_http_listener(config.listen_addr);
    let (recorder, exporter) = {
        let _guard = runtime_handle.enter();
        builder.build().map_err(|e| Error::OperationFailed {
            operation: "metrics_exporter_build".to_string(),
            cause: e.to_string(),
        })?
    };
    let handle = recorder.handle();
    metrics::set_global_recorder(recorder).map_err(|e| Error::OperationFailed {
        operation: "metrics_recorder_install".to_string(),
        cause: e.to_string(),
    })?;
    runtime_handle.spawn(exporter);
    describe_metrics();

    tracing::info!(addr = %config.listen_addr, "Prometheus exporter listening");
    Ok(Some(handle))
}

/// Registers help text and units with the installed recorder.
fn describe_metrics() {
    metrics::describe_counter!(
        REQUESTS_TOTAL,
        Unit::Count,
        "Search API operations by operation and outcome"
    );
    metrics::describe_histogram!(
        REQUEST_DURATION_MS,
        Unit::Milliseconds,
        "Search API operation latency"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_by_default() {
        let config = MetricsConfig::from_settings_with(None, |_| None);
        assert!(!config.enabled);
        assert_eq!(config.listen_addr.port(), DEFAULT_METRICS_PORT);
    }

    #[test]
    fn test_env_overrides_settings() {
        let settings = MetricsSettings {
            enabled: Some(false),
            port: Some(9100),
        };
        let config = MetricsConfig::from_settings_with(Some(&settings), |key| match key {
            METRICS_ENABLED_ENV => Some("true".to_string()),
            METRICS_PORT_ENV => Some("9200".to_string()),
            _ => None,
        });
        assert!(config.enabled);
        assert_eq!(config.listen_addr.port(), 9200);
    }

    #[test]
    fn test_disabled_installs_nothing() {
        let config = MetricsConfig::from_settings_with(None, |_| None);
        assert!(install_prometheus(&config).unwrap().is_none());
    }

    #[test]
    fn test_described_metrics_render_with_help() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            describe_metrics();
            metrics::counter!(REQUESTS_TOTAL, "operation" => "search", "status" => "success")
                .increment(2);
        });

        let rendered = handle.render();
        assert!(rendered.contains("# HELP search_requests_total"));
        assert!(
            rendered.contains(r#"search_requests_total{operation="search",status="success"} 2"#)
        );
    }
}
