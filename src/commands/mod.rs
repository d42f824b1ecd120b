//! Command handlers module.
//!
//! - `core.rs`: serve, setup, health
//! - `seed.rs`: bulk-load products from a JSON file
//! - `config.rs`: configuration display

mod config;
mod core;
mod seed;

use anyhow::Context;
use search_tool::config::SearchToolConfig;
use search_tool::{QueryService, TypesenseClient};
use std::sync::Arc;

pub use config::cmd_config;
pub use core::{cmd_health, cmd_serve, cmd_setup};
pub use seed::cmd_seed;

/// Builds the façade over a Typesense client for the configured collection.
fn build_service(config: &SearchToolConfig) -> anyhow::Result<QueryService> {
    let client = TypesenseClient::new(&config.engine).context("creating engine client")?;
    Ok(QueryService::new(Arc::new(client), &config.engine.collection))
}
