//! Monitoring time series derived from canonical autoscalers
//!
//! This module provides:
//! - The submission record model handed to a metrics transport
//! - Environment label resolution
//! - The deduplicating deriver that turns autoscalers into series

mod deriver;
mod environment;
mod model;


pub use deriver::{
    Derivation, MetricDeriver, MetricKind, MetricTypes, TargetKey, DEFAULT_CPU_METRIC_TYPE,
    DEFAULT_MEMORY_METRIC_TYPE,
};
pub use environment::{EnvironmentLabels, EnvironmentProvider, StaticEnvironment};
pub use model::{
    metric_labels, resource_labels, Metric, MonitoredResource, Point, TimeInterval, TimeSeries,
    TypedValue, RESOURCE_TYPE,
};
