//! Configuration management.
//!
//! Configuration is resolved in layers, later layers winning:
//!
//! 1. Built-in defaults
//! 2. A TOML config file (`--config`, `SEARCH_TOOL_CONFIG_PATH`, or the
//!    platform config directory)
//! 3. Environment variables (a `.env` file is loaded by the binary first)

use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default engine host.
pub const DEFAULT_ENGINE_HOST: &str = "localhost";
/// Default engine port.
pub const DEFAULT_ENGINE_PORT: u16 = 8108;
/// Default engine API key, matching a local development engine.
pub const DEFAULT_ENGINE_API_KEY: &str = "xyz";
/// Default engine request timeout.
pub const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 5;
/// Default products collection.
pub const DEFAULT_COLLECTION: &str = "produtos";
/// Default API bind host.
pub const DEFAULT_API_HOST: &str = "0.0.0.0";
/// Default API bind port.
pub const DEFAULT_API_PORT: u16 = 8000;

/// Main configuration for search-tool.
#[derive(Debug, Clone)]
pub struct SearchToolConfig {
    /// Application name.
    pub app_name: String,
    /// Application description.
    pub app_description: String,
    /// Application version.
    pub app_version: String,
    /// Debug mode: verbose logs and error details.
    pub debug: bool,
    /// Search engine connection.
    pub engine: EngineConfig,
    /// HTTP server.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingSettings,
    /// Metrics settings.
    pub metrics: MetricsSettings,
}

/// Search engine connection settings.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Engine host.
    pub host: String,
    /// Engine port.
    pub port: u16,
    /// `http` or `https`.
    pub protocol: String,
    /// Admin API key.
    pub api_key: SecretString,
    /// Request timeout in seconds (0 disables it).
    pub timeout_secs: u64,
    /// Products collection name.
    pub collection: String,
}

impl EngineConfig {
    /// Returns the engine base URL, e.g. `http://localhost:8108`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_ENGINE_HOST.to_string(),
            port: DEFAULT_ENGINE_PORT,
            protocol: "http".to_string(),
            api_key: SecretString::from(DEFAULT_ENGINE_API_KEY.to_string()),
            timeout_secs: DEFAULT_ENGINE_TIMEOUT_SECS,
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Allowed CORS origins; `*` allows any.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_API_HOST.to_string(),
            port: DEFAULT_API_PORT,
            cors_origins: vec!["*".to_string()],
        }
    }
}

/// Logging settings from the config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LoggingSettings {
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Filter directive, e.g. `info` or `search_tool=debug`.
    pub level: Option<String>,
}

/// Metrics settings from the config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct MetricsSettings {
    /// Whether the Prometheus exporter is installed.
    pub enabled: Option<bool>,
    /// Exporter listen port.
    pub port: Option<u16>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Application name.
    pub app_name: Option<String>,
    /// Application description.
    pub app_description: Option<String>,
    /// Debug mode.
    pub debug: Option<bool>,
    /// Engine section.
    pub engine: Option<ConfigFileEngine>,
    /// Server section.
    pub server: Option<ConfigFileServer>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
    /// Metrics section.
    pub metrics: Option<MetricsSettings>,
}

/// Engine section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileEngine {
    /// Host.
    pub host: Option<String>,
    /// Port.
    pub port: Option<u16>,
    /// Protocol.
    pub protocol: Option<String>,
    /// API key.
    pub api_key: Option<String>,
    /// Timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Collection name.
    pub collection: Option<String>,
}

/// Server section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileServer {
    /// Host.
    pub host: Option<String>,
    /// Port.
    pub port: Option<u16>,
    /// CORS origins.
    pub cors_origins: Option<Vec<String>>,
}

impl Default for SearchToolConfig {
    fn default() -> Self {
        Self {
            app_name: "search-tool".to_string(),
            app_description: "Product search API over a Typesense engine".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            debug: false,
            engine: EngineConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingSettings::default(),
            metrics: MetricsSettings::default(),
        }
    }
}

impl SearchToolConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config file.
    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the platform config dir (`search-tool/config.toml`) and falls
    /// back to defaults when no readable file is found.
    #[must_use]
    pub fn load_default() -> Self {
        Self::default_config_path()
            .filter(|path| path.exists())
            .and_then(|path| Self::load_from_file(&path).ok())
            .unwrap_or_default()
    }

    /// Returns the platform-specific default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|dirs| {
            dirs.config_dir()
                .join("search-tool")
                .join("config.toml")
        })
    }

    /// Converts a `ConfigFile` to `SearchToolConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(name) = file.app_name {
            config.app_name = name;
        }
        if let Some(description) = file.app_description {
            config.app_description = description;
        }
        if let Some(debug) = file.debug {
            config.debug = debug;
        }
        if let Some(engine) = file.engine {
            if let Some(host) = engine.host {
                config.engine.host = host;
            }
            if let Some(port) = engine.port {
                config.engine.port = port;
            }
            if let Some(protocol) = engine.protocol {
                config.engine.protocol = protocol;
            }
            if let Some(api_key) = engine.api_key {
                config.engine.api_key = SecretString::from(api_key);
            }
            if let Some(timeout) = engine.timeout_secs {
                config.engine.timeout_secs = timeout;
            }
            if let Some(collection) = engine.collection {
                config.engine.collection = collection;
            }
        }
        if let Some(server) = file.server {
            if let Some(host) = server.host {
                config.server.host = host;
            }
            if let Some(port) = server.port {
                config.server.port = port;
            }
            if let Some(origins) = server.cors_origins {
                config.server.cors_origins = origins;
            }
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }
        if let Some(metrics) = file.metrics {
            config.metrics = metrics;
        }

        config
    }

    /// Applies environment variable overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(env_var_ignore_case)
    }

    /// Applies overrides read through `lookup`.
    ///
    /// Recognized keys: `APP_NAME`, `DEBUG`, `TYPESENSE_HOST`,
    /// `TYPESENSE_PORT`, `TYPESENSE_PROTOCOL`, `TYPESENSE_API_KEY`,
    /// `TYPESENSE_TIMEOUT`, `PRODUCTS_COLLECTION`, `API_HOST`, `API_PORT`,
    /// `CORS_ORIGINS` (comma-separated). Each key is also tried in lowercase,
    /// so `.env` files written as `typesense_host=...` apply too.
    /// Unparseable values are ignored.
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .or_else(|| lookup(&key.to_ascii_lowercase()))
                .filter(|v| !v.trim().is_empty())
        };

        if let Some(v) = get("APP_NAME") {
            self.app_name = v;
        }
        if let Some(v) = get("DEBUG").and_then(|v| parse_bool(&v)) {
            self.debug = v;
        }
        if let Some(v) = get("TYPESENSE_HOST") {
            self.engine.host = v;
        }
        if let Some(v) = get("TYPESENSE_PORT").and_then(|v| v.trim().parse().ok()) {
            self.engine.port = v;
        }
        if let Some(v) = get("TYPESENSE_PROTOCOL") {
            self.engine.protocol = v;
        }
        if let Some(v) = get("TYPESENSE_API_KEY") {
            self.engine.api_key = SecretString::from(v);
        }
        if let Some(v) = get("TYPESENSE_TIMEOUT").and_then(|v| v.trim().parse().ok()) {
            self.engine.timeout_secs = v;
        }
        if let Some(v) = get("PRODUCTS_COLLECTION") {
            self.engine.collection = v;
        }
        if let Some(v) = get("API_HOST") {
            self.server.host = v;
        }
        if let Some(v) = get("API_PORT").and_then(|v| v.trim().parse().ok()) {
            self.server.port = v;
        }
        if let Some(v) = get("CORS_ORIGINS") {
            self.server.cors_origins = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect();
        }

        self
    }
}

/// Reads an environment variable, matching its name case-insensitively.
///
/// An exact match wins over one differing only in case.
fn env_var_ignore_case(key: &str) -> Option<String> {
    std::env::var(key).ok().or_else(|| {
        std::env::vars_os()
            .find(|(name, _)| name.to_str().is_some_and(|name| name.eq_ignore_ascii_case(key)))
            .and_then(|(_, value)| value.into_string().ok())
    })
}

/// Parses a boolean flag the way environment settings are usually written.
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
