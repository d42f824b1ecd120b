//! Core command handlers: serve, setup, health.

use super::build_service;
use anyhow::Context;
use search_tool::config::SearchToolConfig;
use search_tool::models::HealthStatus;
use search_tool::server::{self, AppInfo, AppState};
use search_tool::services::CollectionSetup;

/// Serve command.
///
/// Tries to create the products collection first; an unreachable engine is
/// logged and does not prevent the API from starting.
pub async fn cmd_serve(
    mut config: SearchToolConfig,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let service = build_service(&config)?;
    match service.ensure_collection().await {
        Ok(_) => tracing::info!(collection = service.collection(), "Products collection ready"),
        Err(e) => tracing::warn!(
            error = %e,
            "Could not set up products collection; engine may be unavailable"
        ),
    }

    let state = AppState {
        service,
        info: AppInfo::from_config(&config),
    };
    let router = server::build_router(state, &config.server.cors_origins);

    tracing::info!(
        name = %config.app_name,
        version = %config.app_version,
        engine = %config.engine.base_url(),
        "Starting API"
    );
    server::serve(router, &config.server)
        .await
        .context("running HTTP server")
}

/// Setup command.
pub async fn cmd_setup(config: SearchToolConfig) -> anyhow::Result<()> {
    let service = build_service(&config)?;
    let outcome = service
        .ensure_collection()
        .await
        .context("creating products collection")?;

    match outcome {
        CollectionSetup::Created => println!("Collection '{}' created", service.collection()),
        CollectionSetup::AlreadyExisted => {
            println!("Collection '{}' already exists", service.collection());
        },
    }
    Ok(())
}

/// Health command.
///
/// Prints the health envelope and fails unless the engine is reachable.
pub async fn cmd_health(config: SearchToolConfig) -> anyhow::Result<()> {
    let service = build_service(&config)?;
    let health = service.health().await;
    println!("{}", serde_json::to_string_pretty(&health)?);

    if health.status != HealthStatus::Healthy {
        anyhow::bail!("engine at {} is not healthy", config.engine.base_url());
    }
    Ok(())
}
