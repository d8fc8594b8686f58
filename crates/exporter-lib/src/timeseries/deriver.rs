//! Derivation of target-utilization series from canonical autoscalers

use super::environment::{EnvironmentLabels, EnvironmentProvider};
use super::model::{
    metric_labels, resource_labels, Metric, MonitoredResource, Point, TimeInterval, TimeSeries,
    TypedValue, RESOURCE_TYPE,
};
use crate::diagnostics::Diagnostic;
use crate::models::Hpa;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

pub const DEFAULT_CPU_METRIC_TYPE: &str =
    "custom.googleapis.com/podautoscaler/hpa/cpu/target_utilization";
pub const DEFAULT_MEMORY_METRIC_TYPE: &str =
    "custom.googleapis.com/podautoscaler/hpa/memory/target_utilization";

/// Utilization metric an autoscaler can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Cpu,
    Memory,
}

impl MetricKind {
    /// Evaluation order within one autoscaler
    pub const ALL: [MetricKind; 2] = [MetricKind::Cpu, MetricKind::Memory];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Cpu => "cpu",
            MetricKind::Memory => "memory",
        }
    }

    /// Canonical target percentage for this metric, 0 when not configured
    pub fn percentage(&self, hpa: &Hpa) -> i32 {
        match self {
            MetricKind::Cpu => hpa.target_cpu_percentage,
            MetricKind::Memory => hpa.target_memory_percentage,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deduplication key: one series per workload and metric
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TargetKey {
    pub kind: String,
    pub namespace: String,
    pub name: String,
    pub metric: MetricKind,
}

impl TargetKey {
    pub fn new(hpa: &Hpa, metric: MetricKind) -> Self {
        Self {
            kind: hpa.target_ref.kind.clone(),
            namespace: hpa.namespace.clone(),
            name: hpa.target_ref.name.clone(),
            metric,
        }
    }
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}|{}", self.kind, self.namespace, self.name, self.metric)
    }
}

/// Metric type strings emitted for each metric kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricTypes {
    pub cpu: String,
    pub memory: String,
}

impl Default for MetricTypes {
    fn default() -> Self {
        Self {
            cpu: DEFAULT_CPU_METRIC_TYPE.to_string(),
            memory: DEFAULT_MEMORY_METRIC_TYPE.to_string(),
        }
    }
}

impl MetricTypes {
    pub fn for_kind(&self, kind: MetricKind) -> &str {
        match kind {
            MetricKind::Cpu => &self.cpu,
            MetricKind::Memory => &self.memory,
        }
    }
}

/// Series emitted by one derivation, plus everything that was skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Derivation {
    /// In emission order
    pub series: Vec<TimeSeries>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds target-utilization series from canonical autoscalers.
///
/// For every autoscaler, CPU then memory is considered. A target of 0 is not
/// configured and produces nothing. The first autoscaler (in input order) to
/// claim a `(kind, namespace, name, metric)` key wins; later claimants are
/// reported as [`Diagnostic::DuplicateTarget`].
#[derive(Debug, Clone, Default)]
pub struct MetricDeriver {
    metric_types: MetricTypes,
    environment: EnvironmentLabels,
}

impl MetricDeriver {
    pub fn new(metric_types: MetricTypes, environment: EnvironmentLabels) -> Self {
        Self {
            metric_types,
            environment,
        }
    }

    /// Resolve the environment labels from a provider once, up front
    pub fn from_provider(metric_types: MetricTypes, provider: &dyn EnvironmentProvider) -> Self {
        Self::new(metric_types, EnvironmentLabels::resolve(provider))
    }

    pub fn metric_types(&self) -> &MetricTypes {
        &self.metric_types
    }

    pub fn derive(&self, hpas: &[Hpa], now: &str) -> Derivation {
        let mut derivation = Derivation::default();
        let mut retained: HashMap<TargetKey, &Hpa> = HashMap::new();

        for hpa in hpas {
            if !hpa.has_targets() {
                derivation.diagnostics.push(Diagnostic::NoTargetsConfigured {
                    object: hpa.into(),
                    target: hpa.target_ref.clone(),
                });
                continue;
            }

            for kind in MetricKind::ALL {
                let percentage = kind.percentage(hpa);
                if percentage <= 0 {
                    continue;
                }

                match retained.entry(TargetKey::new(hpa, kind)) {
                    Entry::Occupied(entry) => {
                        derivation.diagnostics.push(Diagnostic::DuplicateTarget {
                            key: entry.key().clone(),
                            skipped: hpa.into(),
                            retained: (*entry.get()).into(),
                        });
                    }
                    Entry::Vacant(entry) => {
                        derivation
                            .series
                            .push(self.build_series(hpa, kind, i64::from(percentage), now));
                        entry.insert(hpa);
                    }
                }
            }
        }

        derivation
    }

    fn build_series(&self, hpa: &Hpa, kind: MetricKind, value: i64, now: &str) -> TimeSeries {
        TimeSeries {
            resource: MonitoredResource {
                type_: RESOURCE_TYPE.to_string(),
                labels: self.resource_labels(hpa),
            },
            metric: Metric {
                type_: self.metric_types.for_kind(kind).to_string(),
                labels: Self::metric_labels(hpa),
            },
            points: vec![Point {
                interval: TimeInterval {
                    end_time: now.to_string(),
                },
                value: TypedValue {
                    int64_value: Some(value),
                },
            }],
        }
    }

    fn resource_labels(&self, hpa: &Hpa) -> BTreeMap<String, String> {
        BTreeMap::from([
            (resource_labels::PROJECT_ID.to_string(), self.environment.project_id.clone()),
            (resource_labels::LOCATION.to_string(), self.environment.location.clone()),
            (resource_labels::CLUSTER_NAME.to_string(), self.environment.cluster_name.clone()),
            (resource_labels::NAMESPACE_NAME.to_string(), hpa.namespace.clone()),
            (resource_labels::POD_NAME.to_string(), hpa.target_ref.name.clone()),
        ])
    }

    fn metric_labels(hpa: &Hpa) -> BTreeMap<String, String> {
        BTreeMap::from([
            (metric_labels::TARGETREF_APIVERSION.to_string(), hpa.target_ref.api_version.clone()),
            (metric_labels::TARGETREF_KIND.to_string(), hpa.target_ref.kind.clone()),
            (metric_labels::TARGETREF_NAME.to_string(), hpa.target_ref.name.clone()),
            (metric_labels::MIN_REPLICAS.to_string(), hpa.min_replicas.to_string()),
            (metric_labels::MAX_REPLICAS.to_string(), hpa.max_replicas.to_string()),
            (metric_labels::OBJECT_NAME.to_string(), hpa.name.clone()),
        ])
    }
}
