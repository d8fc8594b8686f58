//! HorizontalPodAutoscaler exporter library
//!
//! This crate provides the core functionality for:
//! - Decoding autoscaler payloads of any supported `autoscaling` revision
//! - Normalizing them into one canonical record
//! - Deriving deduplicated target-utilization time series
//! - Scheduled export cycles, health checks and observability

pub mod decoder;
pub mod diagnostics;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod pipeline;
pub mod schema;
pub mod timeseries;

pub use decoder::{decode_hpa, decode_hpa_list, Decoder, ListDecode};
pub use diagnostics::{Diagnostic, ObjectRef};
pub use error::DecodeError;
pub use health::{
    ComponentHealth, ComponentStatus, CycleSummary, HealthRegistry, HealthResponse,
    ReadinessResponse,
};
pub use models::*;
pub use observability::{ExporterMetrics, StructuredLogger};
pub use schema::{builtin_registry, HpaObject, SchemaRegistry, SchemaRevision};
pub use timeseries::{Derivation, MetricDeriver, MetricTypes, TimeSeries};
