//! Time-series submission records
//!
//! Field names follow the monitoring API's JSON representation so a record
//! can be handed to a transport without further mapping.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Monitored resource type every autoscaler series is attached to
pub const RESOURCE_TYPE: &str = "k8s_pod";

pub mod resource_labels {
    pub const PROJECT_ID: &str = "project_id";
    pub const LOCATION: &str = "location";
    pub const CLUSTER_NAME: &str = "cluster_name";
    pub const NAMESPACE_NAME: &str = "namespace_name";
    pub const POD_NAME: &str = "pod_name";
}

pub mod metric_labels {
    pub const TARGETREF_APIVERSION: &str = "targetref_apiversion";
    pub const TARGETREF_KIND: &str = "targetref_kind";
    pub const TARGETREF_NAME: &str = "targetref_name";
    pub const MIN_REPLICAS: &str = "minReplicas";
    pub const MAX_REPLICAS: &str = "maxReplicas";
    pub const OBJECT_NAME: &str = "object_name";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    pub resource: MonitoredResource,
    pub metric: Metric,
    pub points: Vec<Point>,
}

impl TimeSeries {
    /// The single data point's value
    pub fn value(&self) -> Option<i64> {
        self.points.first().and_then(|p| p.value.int64_value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoredResource {
    #[serde(rename = "type")]
    pub type_: String,
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    #[serde(rename = "type")]
    pub type_: String,
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub interval: TimeInterval,
    pub value: TypedValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    /// Passed through verbatim from the caller
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int64_value: Option<i64>,
}
