// src/main.rs
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod catalog;
mod config;
mod dedupe;
mod export;
mod logging;
mod models;
mod normalize;
mod scrape;

use config::{load_config, Config};
use logging::FileLogger;
use models::Result;
use scrape::{Orchestrator, StrategyRegistry};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = match load_config("config.yml").await {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config.yml: {}. Using defaults.", e);
            Config::default()
        }
    };

    // Setup logging
    let directive = format!("hoa_harvester={}", config.logging.level);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    // Create output and log directories
    for path in [
        &config.output.json_path,
        &config.output.csv_path,
        &config.output.summary_path,
        &config.logging.log_path,
        &config.logging.error_log_path,
    ] {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
    }
    tokio::fs::create_dir_all(&config.output.temp_data_dir).await?;

    let logger = FileLogger::new(&config.logging.log_path, &config.logging.error_log_path);
    logger.info("South Florida HOA & Property Management harvester started");

    // Source catalog: a file when present, the built-in list otherwise
    let catalog = match catalog::load_catalog("sources.yml").await {
        Ok(sources) => {
            info!("Loaded {} sources from sources.yml", sources.len());
            sources
        }
        Err(_) => {
            info!("No sources.yml found, using built-in catalog");
            catalog::builtin_catalog()
        }
    };

    let registry = Arc::new(StrategyRegistry::with_defaults());
    let orchestrator = Orchestrator::new(Arc::new(config), registry, logger.clone());

    // Graceful shutdown on Ctrl+C
    tokio::select! {
        result = orchestrator.run(&catalog) => {
            let report = result?;
            logger.info(&format!(
                "Harvest completed: {} records exported, {} sources errored",
                report.records.len(),
                report.summary.total_errors
            ));
        }
        _ = signal::ctrl_c() => {
            logger.info("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
