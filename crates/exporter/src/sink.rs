//! JSON-lines sink for exported series

use anyhow::{Context, Result};
use exporter_lib::health::components;
use exporter_lib::pipeline::ExportBatch;
use exporter_lib::HealthRegistry;
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Writes one JSON document per time series
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write every series of the batch and flush; returns the lines written
    pub async fn write_batch(&mut self, batch: &ExportBatch) -> Result<usize> {
        for series in &batch.series {
            let mut line = serde_json::to_vec(series).context("Failed to serialize time series")?;
            line.push(b'\n');
            self.writer.write_all(&line).await?;
        }
        self.writer.flush().await?;

        Ok(batch.series.len())
    }

    /// Drain batches until every sender is gone
    pub async fn run(mut self, mut rx: mpsc::Receiver<ExportBatch>, health: HealthRegistry) {
        health.register(components::SINK).await;

        while let Some(batch) = rx.recv().await {
            match self.write_batch(&batch).await {
                Ok(written) => {
                    debug!(series = written, end_time = %batch.end_time, "Batch written");
                    health.set_healthy(components::SINK).await;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to write series batch");
                    health
                        .set_degraded(components::SINK, format!("write failed: {}", e))
                        .await;
                }
            }
        }

        info!("Series sink closed");
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Open the sink on the configured file (appending), or stdout
pub async fn open(output: Option<&Path>) -> Result<JsonLinesSink<BoxedWriter>> {
    let writer: BoxedWriter = match output {
        Some(path) => {
            let file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await
                .with_context(|| format!("Failed to open output file {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(tokio::io::stdout()),
    };

    Ok(JsonLinesSink::new(writer))
}
