//! Seed command handler.
//!
//! Loads a JSON array of products and indexes each one, printing a line per
//! product and a summary.

use super::build_service;
use anyhow::Context;
use search_tool::QueryService;
use search_tool::config::SearchToolConfig;
use search_tool::models::{HealthStatus, ProductInput, Status};
use std::path::Path;

/// Counts from a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Products indexed.
    pub succeeded: usize,
    /// Products rejected locally or by the engine.
    pub failed: usize,
}

impl SeedReport {
    /// Total products attempted.
    pub const fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Percentage of products indexed.
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.total() as f64 * 100.0
        }
    }
}

/// Seed command.
pub async fn cmd_seed(config: SearchToolConfig, file: &Path) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let products = parse_products(&contents)
        .with_context(|| format!("parsing {}", file.display()))?;
    println!("Loaded {} products from {}", products.len(), file.display());

    let service = build_service(&config)?;

    let health = service.health().await;
    if health.status != HealthStatus::Healthy {
        anyhow::bail!(
            "engine at {} is not available: {}",
            config.engine.base_url(),
            health.message.unwrap_or_default()
        );
    }
    service
        .ensure_collection()
        .await
        .context("creating products collection")?;

    let report = seed_products(&service, products).await;

    println!();
    println!("Indexed:      {}", report.succeeded);
    println!("Failed:       {}", report.failed);
    println!("Success rate: {:.1}%", report.success_rate());

    if report.succeeded == 0 {
        anyhow::bail!("no products were indexed");
    }
    Ok(())
}

/// Parses a JSON array of products.
fn parse_products(contents: &str) -> serde_json::Result<Vec<ProductInput>> {
    serde_json::from_str(contents)
}

/// Validates and indexes each product in order.
async fn seed_products(service: &QueryService, products: Vec<ProductInput>) -> SeedReport {
    let total = products.len();
    let mut report = SeedReport::default();

    for (i, input) in products.into_iter().enumerate() {
        let position = i + 1;
        let name = input.name.clone();

        let product = match input.into_product() {
            Ok(product) => product,
            Err(e) => {
                report.failed += 1;
                println!("[{position:>3}/{total}] FAILED {name}: {e}");
                continue;
            },
        };

        let response = service.index(&product).await;
        if response.status == Status::Success {
            report.succeeded += 1;
            println!("[{position:>3}/{total}] ok     {name}");
        } else {
            report.failed += 1;
            println!(
                "[{position:>3}/{total}] FAILED {name}: {}",
                response.message.unwrap_or_default()
            );
        }
    }

    report
}
