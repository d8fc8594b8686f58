//! Core data models for the HPA exporter

use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace assigned to objects that do not declare one
pub const DEFAULT_NAMESPACE: &str = "default";

/// Replica floor assigned when the source omits `minReplicas`
pub const DEFAULT_MIN_REPLICAS: i32 = 1;

/// Kubernetes group/version/kind triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(group: impl Into<String>, version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// Split an `apiVersion` string (`group/version`, or bare `version` for the core group)
    pub fn from_api_version(api_version: &str, kind: impl Into<String>) -> Self {
        let (group, version) = match api_version.split_once('/') {
            Some((group, version)) => (group, version),
            None => ("", api_version),
        };
        Self::new(group, version, kind)
    }

    /// The `apiVersion` form of the group and version
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Kind={}", self.api_version(), self.kind)
    }
}

/// Workload scaled by an autoscaler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRef {
    pub api_version: String,
    pub kind: String,
    pub name: String,
}

/// Canonical autoscaler record, independent of the schema revision it was decoded from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hpa {
    pub namespace: String,
    pub name: String,
    pub target_ref: TargetRef,
    pub min_replicas: i32,
    pub max_replicas: i32,
    /// 0 means not configured
    #[serde(rename = "targetCPUPercentage")]
    pub target_cpu_percentage: i32,
    /// 0 means not configured
    pub target_memory_percentage: i32,
}

impl Hpa {
    /// True when at least one of the utilization targets is set
    pub fn has_targets(&self) -> bool {
        self.target_cpu_percentage > 0 || self.target_memory_percentage > 0
    }
}
