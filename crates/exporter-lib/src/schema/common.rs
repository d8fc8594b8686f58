//! Object metadata and normalization rules shared by every revision

use crate::models::{GroupVersionKind, TargetRef, DEFAULT_MIN_REPLICAS, DEFAULT_NAMESPACE};
use serde::{Deserialize, Serialize};

/// Metric source type that carries a per-pod resource utilization target
pub const RESOURCE_METRIC_TYPE: &str = "Resource";

pub const CPU_RESOURCE: &str = "cpu";
pub const MEMORY_RESOURCE: &str = "memory";

/// The `apiVersion`/`kind` marker every Kubernetes object carries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
}

impl TypeMeta {
    /// Read the marker without decoding the rest of the document
    pub fn from_value(value: &serde_yaml::Value) -> Self {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(serde_yaml::Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            api_version: field("apiVersion"),
            kind: field("kind"),
        }
    }

    /// Group/version/kind, when both halves of the marker are present
    pub fn gvk(&self) -> Option<GroupVersionKind> {
        match (&self.api_version, &self.kind) {
            (Some(api_version), Some(kind)) => {
                Some(GroupVersionKind::from_api_version(api_version, kind.clone()))
            }
            _ => None,
        }
    }
}

/// Subset of ObjectMeta read by the normalizers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ObjectMeta {
    /// Name as declared, empty when absent
    pub fn name_or_empty(&self) -> String {
        self.name.clone().unwrap_or_default()
    }

    /// Declared namespace, or `default` when absent or empty
    pub fn namespace_or_default(&self) -> String {
        match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => ns.to_string(),
            _ => DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// Reference to the scaled workload; identical across all revisions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossVersionObjectReference {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

impl From<&CrossVersionObjectReference> for TargetRef {
    fn from(reference: &CrossVersionObjectReference) -> Self {
        TargetRef {
            api_version: reference.api_version.clone(),
            kind: reference.kind.clone(),
            name: reference.name.clone(),
        }
    }
}

/// Absent means 1; an explicit 0 (paused) is kept as is
pub fn min_replicas_or_default(min_replicas: Option<i32>) -> i32 {
    min_replicas.unwrap_or(DEFAULT_MIN_REPLICAS)
}

/// CPU and memory utilization targets extracted from a metric spec list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UtilizationTargets {
    pub cpu: i32,
    pub memory: i32,
}

impl UtilizationTargets {
    /// Scan `(resource name, average utilization)` pairs of resource-type metrics.
    ///
    /// Every entry is visited; a later entry for the same resource overwrites an
    /// earlier one, and an entry without a utilization leaves the value untouched.
    pub fn scan<'a, I>(resources: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<i32>)>,
    {
        let mut targets = Self::default();
        for (name, utilization) in resources {
            let Some(utilization) = utilization else {
                continue;
            };
            match name {
                CPU_RESOURCE => targets.cpu = utilization,
                MEMORY_RESOURCE => targets.memory = utilization,
                _ => {}
            }
        }
        targets
    }
}
