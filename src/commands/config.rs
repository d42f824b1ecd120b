//! Config command handler.

use search_tool::config::SearchToolConfig;
use search_tool::observability::{LoggingConfig, MetricsConfig};

/// Config command.
///
/// Prints the effective configuration; the engine API key is never shown.
pub fn cmd_config(config: &SearchToolConfig) -> anyhow::Result<()> {
    let logging = LoggingConfig::from_settings(Some(&config.logging), config.debug);
    let metrics = MetricsConfig::from_settings(Some(&config.metrics));

    println!("Current Configuration");
    println!("=====================");
    println!();
    println!("App: {} {}", config.app_name, config.app_version);
    println!("Description: {}", config.app_description);
    println!("Debug: {}", config.debug);
    println!();

    println!("Engine:");
    println!("  URL: {}", config.engine.base_url());
    println!("  API Key: [REDACTED]");
    println!("  Timeout: {}s", config.engine.timeout_secs);
    println!("  Collection: {}", config.engine.collection);
    println!();

    println!("Server:");
    println!("  Bind: {}:{}", config.server.host, config.server.port);
    println!("  CORS Origins: {}", config.server.cors_origins.join(", "));
    println!();

    println!("Observability:");
    println!("  Log Format: {:?}", logging.format);
    println!("  Log Filter: {}", logging.filter);
    if metrics.enabled {
        println!("  Metrics: enabled on {}", metrics.listen_addr);
    } else {
        println!("  Metrics: disabled");
    }

    Ok(())
}
