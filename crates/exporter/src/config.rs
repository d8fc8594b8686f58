//! Exporter configuration

use anyhow::{Context, Result};
use exporter_lib::pipeline::{FilePayloadSource, PayloadSource};
use exporter_lib::timeseries::{
    MetricTypes, StaticEnvironment, DEFAULT_CPU_METRIC_TYPE, DEFAULT_MEMORY_METRIC_TYPE,
};
use exporter_lib::SchemaRevision;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable naming an optional YAML config file
pub const CONFIG_FILE_ENV: &str = "EXPORTER_CONFIG";

/// One list payload to read each cycle
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceConfig {
    pub path: PathBuf,
    /// `v1`, `v2beta1`, `v2beta2` or `v2`
    pub revision: SchemaRevision,
}

/// Exporter configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExporterConfig {
    /// API server port for health/metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Seconds between export cycles
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Payload sources, read in this order every cycle
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,

    #[serde(default)]
    pub project_id: String,

    #[serde(default)]
    pub cluster_location: String,

    #[serde(default)]
    pub cluster_name: String,

    /// JSON-lines output file; stdout when unset
    #[serde(default)]
    pub output_path: Option<PathBuf>,

    #[serde(default = "default_cpu_metric_type")]
    pub cpu_metric_type: String,

    #[serde(default = "default_memory_metric_type")]
    pub memory_metric_type: String,
}

fn default_api_port() -> u16 {
    8080
}

fn default_interval() -> u64 {
    60
}

fn default_sources() -> Vec<SourceConfig> {
    vec![SourceConfig {
        path: PathBuf::from("/etc/hpa-exporter/hpas.yaml"),
        revision: SchemaRevision::V1,
    }]
}

fn default_cpu_metric_type() -> String {
    DEFAULT_CPU_METRIC_TYPE.to_string()
}

fn default_memory_metric_type() -> String {
    DEFAULT_MEMORY_METRIC_TYPE.to_string()
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            interval_secs: default_interval(),
            sources: default_sources(),
            project_id: String::new(),
            cluster_location: String::new(),
            cluster_name: String::new(),
            output_path: None,
            cpu_metric_type: default_cpu_metric_type(),
            memory_metric_type: default_memory_metric_type(),
        }
    }
}

impl ExporterConfig {
    /// Load configuration from the optional config file and environment
    pub fn load() -> Result<Self> {
        Self::load_from(std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from))
    }

    /// Environment variables (`EXPORTER_*`, `__` for nesting) override the file
    pub fn load_from(file: Option<PathBuf>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("EXPORTER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to read exporter configuration")?;

        config
            .try_deserialize()
            .context("Invalid exporter configuration")
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn metric_types(&self) -> MetricTypes {
        MetricTypes {
            cpu: self.cpu_metric_type.clone(),
            memory: self.memory_metric_type.clone(),
        }
    }

    pub fn environment(&self) -> StaticEnvironment {
        StaticEnvironment::new(
            self.project_id.as_str(),
            self.cluster_location.as_str(),
            self.cluster_name.as_str(),
        )
    }

    pub fn payload_sources(&self) -> Vec<Arc<dyn PayloadSource>> {
        self.sources
            .iter()
            .map(|source| {
                Arc::new(FilePayloadSource::new(source.path.clone(), source.revision))
                    as Arc<dyn PayloadSource>
            })
            .collect()
    }
}
