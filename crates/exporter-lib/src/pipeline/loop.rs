//! Scheduled export loop
//!
//! Runs the export cycle on a fixed interval and forwards each cycle's
//! series batch over a channel to whatever sink the caller attaches.

use super::{CycleReport, ExportCycle, PayloadSource};
use crate::health::{components, HealthRegistry};
use crate::observability::{ExporterMetrics, StructuredLogger};
use crate::timeseries::TimeSeries;
use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, Instant};
use tracing::{debug, info, warn};

/// Configuration for the export loop
#[derive(Debug, Clone)]
pub struct ExportLoopConfig {
    /// Time between cycles (default: 60 seconds)
    pub interval: Duration,
    /// Channel buffer size, in batches
    pub buffer_size: usize,
}

impl Default for ExportLoopConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            buffer_size: 16,
        }
    }
}

/// Series produced by one cycle, all stamped with the same end time
#[derive(Debug, Clone, PartialEq)]
pub struct ExportBatch {
    pub end_time: String,
    pub series: Vec<TimeSeries>,
}

/// Export loop that periodically decodes all sources and derives series
pub struct ExportLoop {
    cycle: ExportCycle,
    sources: Vec<Arc<dyn PayloadSource>>,
    config: ExportLoopConfig,
    batch_tx: mpsc::Sender<ExportBatch>,
    health: HealthRegistry,
    metrics: ExporterMetrics,
    logger: StructuredLogger,
}

impl ExportLoop {
    pub fn new(
        cycle: ExportCycle,
        sources: Vec<Arc<dyn PayloadSource>>,
        config: ExportLoopConfig,
        health: HealthRegistry,
        logger: StructuredLogger,
    ) -> (Self, mpsc::Receiver<ExportBatch>) {
        let (batch_tx, batch_rx) = mpsc::channel(config.buffer_size.max(1));

        let export_loop = Self {
            cycle,
            sources,
            config,
            batch_tx,
            health,
            metrics: ExporterMetrics::new(),
            logger,
        };

        (export_loop, batch_rx)
    }

    pub fn sources(&self) -> usize {
        self.sources.len()
    }

    /// Run until a shutdown signal arrives. The first cycle starts immediately.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        info!(
            interval_secs = self.config.interval.as_secs(),
            sources = self.sources.len(),
            "Starting export loop"
        );

        let mut ticker = interval(self.config.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_once().await;
                }
                _ = shutdown.recv() => {
                    info!("Shutting down export loop");
                    break;
                }
            }
        }
    }

    /// Run a single cycle stamped with the current time
    pub async fn run_once(&self) -> CycleReport {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let start = Instant::now();

        let report = self.cycle.run(&self.sources, &now).await;

        let elapsed = start.elapsed();
        self.metrics.observe_cycle_latency(elapsed.as_secs_f64());
        self.metrics
            .set_cycle_totals(report.hpas_decoded, report.series.len());

        for source_error in &report.source_errors {
            self.metrics.inc_source_errors();
            self.logger
                .log_source_error(&source_error.source, &source_error.error);
        }
        for diagnostic in &report.diagnostics {
            self.metrics.record_diagnostic(diagnostic);
        }
        self.logger.log_diagnostics(&report.diagnostics);
        self.logger.log_cycle(
            report.hpas_decoded,
            report.series.len(),
            report.skipped(),
            elapsed.as_millis(),
        );

        self.update_health(&report).await;

        if report.series.is_empty() {
            debug!("Cycle produced no series");
        } else {
            let batch = ExportBatch {
                end_time: now,
                series: report.series.clone(),
            };
            if let Err(e) = self.batch_tx.send(batch).await {
                warn!(error = %e, "Failed to send series batch to sink");
            }
        }

        report
    }

    async fn update_health(&self, report: &CycleReport) {
        let failed = report.failed_sources();
        if failed == 0 {
            self.health.set_healthy(components::SOURCES).await;
        } else if failed == self.sources.len() {
            self.health
                .set_unhealthy(components::SOURCES, "No payload source could be read and decoded")
                .await;
        } else {
            self.health
                .set_degraded(
                    components::SOURCES,
                    format!("{} of {} payload sources failed", failed, self.sources.len()),
                )
                .await;
        }

        self.health.set_healthy(components::EXPORT_LOOP).await;
        self.health.record_cycle(report).await;
        self.health.set_ready(true).await;
    }
}

/// Builder for creating the export loop
pub struct ExportLoopBuilder {
    cycle: Option<ExportCycle>,
    sources: Vec<Arc<dyn PayloadSource>>,
    config: ExportLoopConfig,
    health: Option<HealthRegistry>,
    logger: Option<StructuredLogger>,
}

impl ExportLoopBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            cycle: None,
            sources: Vec::new(),
            config: ExportLoopConfig::default(),
            health: None,
            logger: None,
        }
    }

    /// Set the export cycle (decoder and deriver)
    pub fn cycle(mut self, cycle: ExportCycle) -> Self {
        self.cycle = Some(cycle);
        self
    }

    /// Append a payload source; sources are read in the order added
    pub fn source(mut self, source: Arc<dyn PayloadSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn sources(mut self, sources: impl IntoIterator<Item = Arc<dyn PayloadSource>>) -> Self {
        self.sources.extend(sources);
        self
    }

    /// Set the cycle interval
    pub fn interval(mut self, interval: Duration) -> Self {
        self.config.interval = interval;
        self
    }

    /// Set the buffer size
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    pub fn health(mut self, health: HealthRegistry) -> Self {
        self.health = Some(health);
        self
    }

    pub fn logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Build the export loop
    pub fn build(self) -> Result<(ExportLoop, mpsc::Receiver<ExportBatch>)> {
        if self.sources.is_empty() {
            anyhow::bail!("At least one payload source is required");
        }
        if self.config.interval.is_zero() {
            anyhow::bail!("Export interval must be greater than zero");
        }

        let cycle = self
            .cycle
            .unwrap_or_else(|| ExportCycle::with_deriver(Default::default()));
        let health = self.health.unwrap_or_default();
        let logger = self
            .logger
            .unwrap_or_else(|| StructuredLogger::new(String::new()));

        Ok(ExportLoop::new(
            cycle,
            self.sources,
            self.config,
            health,
            logger,
        ))
    }
}

impl Default for ExportLoopBuilder {
    fn default() -> Self {
        Self::new()
    }
}
