//! `autoscaling/v1` HorizontalPodAutoscaler
//!
//! The oldest revision exposes a single scalar CPU utilization target and
//! has no notion of a memory target.

use super::common::{min_replicas_or_default, CrossVersionObjectReference, ObjectMeta};
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
    #[serde(default, rename = "targetCPUUtilizationPercentage")]
    pub target_cpu_utilization_percentage: Option<i32>,
}

/// Convert an `autoscaling/v1` object into the canonical record
pub fn normalize(hpa: &HorizontalPodAutoscaler) -> Hpa {
    let spec = &hpa.spec;
    Hpa {
        namespace: hpa.metadata.namespace_or_default(),
        name: hpa.metadata.name_or_empty(),
        target_ref: (&spec.scale_target_ref).into(),
        min_replicas: min_replicas_or_default(spec.min_replicas),
        max_replicas: spec.max_replicas,
        target_cpu_percentage: spec.target_cpu_utilization_percentage.unwrap_or(0),
        target_memory_percentage: 0,
    }
}
