//! HPA exporter - HorizontalPodAutoscaler target utilization exporter
//!
//! Periodically decodes autoscaler list payloads of any supported revision,
//! derives one target-utilization series per workload and metric, and writes
//! the series as JSON lines.

use anyhow::Result;
use exporter_lib::{
    health::components,
    observability::{ExporterMetrics, StructuredLogger},
    pipeline::{ExportCycle, ExportLoopBuilder},
    HealthRegistry, MetricDeriver,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;
mod sink;

const EXPORTER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting hpa-exporter");

    // Load configuration
    let config = config::ExporterConfig::load()?;
    info!(
        cluster_name = %config.cluster_name,
        sources = config.sources.len(),
        interval_secs = config.interval_secs,
        "Exporter configured"
    );

    // Initialize health registry
    let health_registry = HealthRegistry::new();
    health_registry.register(components::SOURCES).await;
    health_registry.register(components::EXPORT_LOOP).await;

    // Initialize metrics and structured logger
    let _metrics = ExporterMetrics::new();
    let logger = StructuredLogger::new(&config.cluster_name);
    logger.log_startup(EXPORTER_VERSION, config.sources.len());

    // Build the export loop
    let deriver = MetricDeriver::from_provider(config.metric_types(), &config.environment());
    let (export_loop, batch_rx) = ExportLoopBuilder::new()
        .cycle(ExportCycle::with_deriver(deriver))
        .sources(config.payload_sources())
        .interval(config.interval())
        .health(health_registry.clone())
        .logger(logger.clone())
        .build()?;

    let sink = sink::open(config.output_path.as_deref()).await?;

    // Create shared application state
    let app_state = Arc::new(api::AppState::new(health_registry.clone()));

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    // Start health and metrics server
    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));
    let loop_handle = tokio::spawn(export_loop.run(shutdown_rx));
    let sink_handle = tokio::spawn(sink.run(batch_rx, health_registry.clone()));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");

    let _ = shutdown_tx.send(());
    if let Err(e) = loop_handle.await {
        error!(error = %e, "Export loop task failed");
    }
    // The loop owned the only sender, so the sink drains what is left and exits
    if let Err(e) = sink_handle.await {
        error!(error = %e, "Sink task failed");
    }
    api_handle.abort();

    info!("Shutdown complete");

    Ok(())
}
