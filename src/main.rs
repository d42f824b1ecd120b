//! Binary entry point for search-tool.
//!
//! Serves the product search API and provides maintenance commands for the
//! backing Typesense collection.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::{Parser, Subcommand};
use search_tool::config::SearchToolConfig;
use search_tool::observability::{self, LoggingConfig, ObservabilityConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Environment variable naming a config file when `--config` is absent.
const CONFIG_PATH_ENV: &str = "SEARCH_TOOL_CONFIG_PATH";

/// search-tool - product search API over Typesense.
#[derive(Parser)]
#[command(name = "search-tool")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve {
        /// Bind host (overrides config).
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create the products collection.
    Setup,

    /// Index products from a JSON array file.
    Seed {
        /// Path to the JSON file.
        file: PathBuf,
    },

    /// Check engine connectivity.
    Health,

    /// Show the effective configuration.
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config.with_env_overrides(),
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    let mut observability_config = ObservabilityConfig::from_config(&config);
    observability_config.logging =
        LoggingConfig::from_settings(Some(&config.logging), config.debug || cli.verbose);
    if !matches!(cli.command, Commands::Serve { .. }) {
        observability_config.metrics.enabled = false;
    }
    let _observability = match observability::init(&observability_config) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Failed to initialize observability: {e}");
            return ExitCode::FAILURE;
        },
    };

    match run_command(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

async fn run_command(command: Commands, config: SearchToolConfig) -> anyhow::Result<()> {
    match command {
        Commands::Serve { host, port } => commands::cmd_serve(config, host, port).await,
        Commands::Setup => commands::cmd_setup(config).await,
        Commands::Seed { file } => commands::cmd_seed(config, &file).await,
        Commands::Health => commands::cmd_health(config).await,
        Commands::Config => commands::cmd_config(&config),
    }
}

/// Loads configuration from `--config`, the config path env var, or the
/// platform default location.
fn load_config(path: Option<&Path>) -> search_tool::Result<SearchToolConfig> {
    if let Some(config_path) = path {
        return SearchToolConfig::load_from_file(config_path);
    }

    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        if !config_path.trim().is_empty() {
            return SearchToolConfig::load_from_file(Path::new(&config_path));
        }
    }

    Ok(SearchToolConfig::load_default())
}
