//! Payload acquisition and the export cycle
//!
//! One cycle reads every configured payload source, list-decodes each with
//! its revision, and derives target-utilization series once over the
//! combined canonical list. Sources are visited in configuration order, so
//! the first-seen-wins rule of the deriver also applies across sources.

mod r#loop;


pub use r#loop::{ExportBatch, ExportLoop, ExportLoopBuilder, ExportLoopConfig};

use crate::decoder::Decoder;
use crate::diagnostics::Diagnostic;
use crate::schema::SchemaRevision;
use crate::timeseries::{MetricDeriver, TimeSeries};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

pub use async_trait::async_trait;

/// A producer of one list payload of a known revision
#[async_trait]
pub trait PayloadSource: Send + Sync {
    /// Read the raw list payload
    async fn fetch(&self) -> Result<Vec<u8>>;

    /// Revision the payload is expected to hold
    fn revision(&self) -> SchemaRevision;

    /// Human readable identity, used in logs and reports
    fn describe(&self) -> String;
}

/// List payload read from a file on every fetch
#[derive(Debug, Clone)]
pub struct FilePayloadSource {
    path: PathBuf,
    revision: SchemaRevision,
}

impl FilePayloadSource {
    pub fn new(path: impl Into<PathBuf>, revision: SchemaRevision) -> Self {
        Self {
            path: path.into(),
            revision,
        }
    }
}

#[async_trait]
impl PayloadSource for FilePayloadSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read payload file {}", self.path.display()))
    }

    fn revision(&self) -> SchemaRevision {
        self.revision
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.path.display(), self.revision)
    }
}

/// A payload source that could not be read during a cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceError {
    pub source: String,
    pub error: String,
}

/// Everything one cycle produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    /// In emission order
    pub series: Vec<TimeSeries>,
    /// Decode diagnostics per source in order, followed by derivation diagnostics
    pub diagnostics: Vec<Diagnostic>,
    pub hpas_decoded: usize,
    pub source_errors: Vec<SourceError>,
    /// Sources that were read but whose list envelope was rejected
    pub rejected_sources: Vec<SourceError>,
}

impl CycleReport {
    /// Diagnostics that left something out of the output
    pub fn skipped(&self) -> usize {
        self.diagnostics.len()
    }

    /// Sources that contributed nothing, whether unreadable or rejected
    pub fn failed_sources(&self) -> usize {
        self.source_errors.len() + self.rejected_sources.len()
    }
}

/// Decode-then-derive over a set of sources
#[derive(Debug, Clone)]
pub struct ExportCycle {
    decoder: Decoder<'static>,
    deriver: MetricDeriver,
}

impl ExportCycle {
    pub fn new(decoder: Decoder<'static>, deriver: MetricDeriver) -> Self {
        Self { decoder, deriver }
    }

    /// Cycle over the built-in registry
    pub fn with_deriver(deriver: MetricDeriver) -> Self {
        Self::new(Decoder::default(), deriver)
    }

    /// Run one cycle. Never fails: unreadable sources are reported and the
    /// cycle continues with the rest.
    pub async fn run(&self, sources: &[Arc<dyn PayloadSource>], now: &str) -> CycleReport {
        let mut hpas = Vec::new();
        let mut diagnostics = Vec::new();
        let mut source_errors = Vec::new();
        let mut rejected_sources = Vec::new();

        for source in sources {
            match source.fetch().await {
                Ok(payload) => {
                    let list = self.decoder.decode_list(&payload, source.revision());
                    if let Some(Diagnostic::ListRejected { cause, .. }) =
                        list.diagnostics.first()
                    {
                        rejected_sources.push(SourceError {
                            source: source.describe(),
                            error: cause.clone(),
                        });
                    }
                    hpas.extend(list.items);
                    diagnostics.extend(list.diagnostics);
                }
                Err(e) => source_errors.push(SourceError {
                    source: source.describe(),
                    error: format!("{:#}", e),
                }),
            }
        }

        let derivation = self.deriver.derive(&hpas, now);
        diagnostics.extend(derivation.diagnostics);

        CycleReport {
            series: derivation.series,
            diagnostics,
            hpas_decoded: hpas.len(),
            source_errors,
            rejected_sources,
        }
    }
}
