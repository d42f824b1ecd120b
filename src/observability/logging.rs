//! Structured logging configuration.

use crate::config::LoggingSettings;

/// Environment variable selecting the log format.
pub const LOG_FORMAT_ENV: &str = "SEARCH_TOOL_LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive, e.g. `info` or `search_tool=debug,tower_http=info`.
    pub filter: String,
}

impl LoggingConfig {
    /// Builds logging configuration from config settings with env overrides.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, debug: bool) -> Self {
        Self::from_settings_with(settings, debug, |key| std::env::var(key).ok())
    }

    /// Builds logging configuration reading overrides through `lookup`.
    ///
    /// `RUST_LOG` wins over the configured level, which wins over the debug
    /// flag.
    #[must_use]
    pub fn from_settings_with<F>(settings: Option<&LoggingSettings>, debug: bool, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let format = lookup(LOG_FORMAT_ENV)
            .as_deref()
            .and_then(LogFormat::parse)
            .or_else(|| {
                settings
                    .and_then(|s| s.format.as_deref())
                    .and_then(LogFormat::parse)
            })
            .unwrap_or_default();

        let filter = lookup("RUST_LOG")
            .filter(|v| !v.trim().is_empty())
            .or_else(|| settings.and_then(|s| s.level.clone()))
            .unwrap_or_else(|| if debug { "debug" } else { "info" }.to_string());

        Self { format, filter }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_follow_debug_flag() {
        let config = LoggingConfig::from_settings_with(None, false, lookup(&[]));
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.filter, "info");

        let config = LoggingConfig::from_settings_with(None, true, lookup(&[]));
        assert_eq!(config.filter, "debug");
    }

    #[test]
    fn test_env_wins_over_settings() {
        let settings = LoggingSettings {
            format: Some("pretty".to_string()),
            level: Some("warn".to_string()),
        };
        let config = LoggingConfig::from_settings_with(
            Some(&settings),
            false,
            lookup(&[(LOG_FORMAT_ENV, "JSON"), ("RUST_LOG", "search_tool=trace")]),
        );
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter, "search_tool=trace");
    }

    #[test]
    fn test_settings_used_when_env_absent() {
        let settings = LoggingSettings {
            format: Some("json".to_string()),
            level: Some("warn".to_string()),
        };
        let config = LoggingConfig::from_settings_with(Some(&settings), true, lookup(&[]));
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter, "warn");
    }

    #[test]
    fn test_unknown_format_falls_back() {
        assert_eq!(LogFormat::parse("xml"), None);
        let config =
            LoggingConfig::from_settings_with(None, false, lookup(&[(LOG_FORMAT_ENV, "xml")]));
        assert_eq!(config.format, LogFormat::Pretty);
    }
}
