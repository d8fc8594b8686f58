//! `autoscaling/v2` HorizontalPodAutoscaler (current)

use super::common::{
    min_replicas_or_default, CrossVersionObjectReference, ObjectMeta, UtilizationTargets,
    RESOURCE_METRIC_TYPE,
};
use crate::models::Hpa;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizontalPodAutoscaler {
    #[serde(default)]
    pub metadata: ObjectMeta,
    pub spec: HorizontalPodAutoscalerSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizontalPodAutoscalerSpec {
    pub scale_target_ref: CrossVersionObjectReference,
    #[serde(default)]
    pub min_replicas: Option<i32>,
    pub max_replicas: i32,
    #[serde(default)]
    pub metrics: Vec<MetricSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSpec {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceMetricSource>,
    /// Per-container targets; not part of the canonical record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_resource: Option<ContainerResourceMetricSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetricSource {
    pub name: String,
    #[serde(default)]
    pub target: MetricTarget,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerResourceMetricSource {
    pub name: String,
    pub container: String,
    #[serde(default)]
    pub target: MetricTarget,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTarget {
    #[serde(default, rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub average_utilization: Option<i32>,
}

/// Convert an `autoscaling/v2` object into the canonical record
pub fn normalize(hpa: &HorizontalPodAutoscaler) -> Hpa {
    let spec = &hpa.spec;
    let targets = UtilizationTargets::scan(
        spec.metrics
            .iter()
            .filter(|metric| metric.type_ == RESOURCE_METRIC_TYPE)
            .filter_map(|metric| metric.resource.as_ref())
            .map(|res| (res.name.as_str(), res.target.average_utilization)),
    );

    Hpa {
        namespace: hpa.metadata.namespace_or_default(),
        name: hpa.metadata.name_or_empty(),
        target_ref: (&spec.scale_target_ref).into(),
        min_replicas: min_replicas_or_default(spec.min_replicas),
        max_replicas: spec.max_replicas,
        target_cpu_percentage: targets.cpu,
        target_memory_percentage: targets.memory,
    }
}
