//! Schema revisions of the HorizontalPodAutoscaler resource
//!
//! This module declares the four autoscaling API revisions the exporter
//! understands, the typed shape of each, and the registry that maps a
//! `(group, version, kind)` marker to the shape used to decode it.

mod common;
pub mod v1;
pub mod v2;
pub mod v2beta1;
pub mod v2beta2;

pub use common::{
    min_replicas_or_default, CrossVersionObjectReference, ObjectMeta, TypeMeta,
    UtilizationTargets, CPU_RESOURCE, MEMORY_RESOURCE, RESOURCE_METRIC_TYPE,
};

use crate::models::{GroupVersionKind, Hpa};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub const AUTOSCALING_GROUP: &str = "autoscaling";
pub const HPA_KIND: &str = "HorizontalPodAutoscaler";
pub const HPA_LIST_KIND: &str = "HorizontalPodAutoscalerList";

/// Supported autoscaling API revisions, oldest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaRevision {
    V1,
    V2Beta1,
    V2Beta2,
    V2,
}

impl SchemaRevision {
    pub const ALL: [SchemaRevision; 4] = [
        SchemaRevision::V1,
        SchemaRevision::V2Beta1,
        SchemaRevision::V2Beta2,
        SchemaRevision::V2,
    ];

    pub fn version(&self) -> &'static str {
        match self {
            SchemaRevision::V1 => "v1",
            SchemaRevision::V2Beta1 => "v2beta1",
            SchemaRevision::V2Beta2 => "v2beta2",
            SchemaRevision::V2 => "v2",
        }
    }

    /// Marker of a single object of this revision
    pub fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind::new(AUTOSCALING_GROUP, self.version(), HPA_KIND)
    }

    /// Marker of a list of objects of this revision
    pub fn list_gvk(&self) -> GroupVersionKind {
        GroupVersionKind::new(AUTOSCALING_GROUP, self.version(), HPA_LIST_KIND)
    }
}

impl fmt::Display for SchemaRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", AUTOSCALING_GROUP, self.version())
    }
}

impl FromStr for SchemaRevision {
    type Err = String;

    /// Accepts the bare version (`v2beta2`) or the apiVersion (`autoscaling/v2beta2`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let version = s.strip_prefix("autoscaling/").unwrap_or(s);
        SchemaRevision::ALL
            .into_iter()
            .find(|rev| rev.version().eq_ignore_ascii_case(version))
            .ok_or_else(|| format!("unknown autoscaling revision '{}'", s))
    }
}

/// A decoded object, tagged with the revision whose shape it matched
#[derive(Debug, Clone, PartialEq)]
pub enum HpaObject {
    V1(v1::HorizontalPodAutoscaler),
    V2Beta1(v2beta1::HorizontalPodAutoscaler),
    V2Beta2(v2beta2::HorizontalPodAutoscaler),
    V2(v2::HorizontalPodAutoscaler),
}

impl HpaObject {
    pub fn revision(&self) -> SchemaRevision {
        match self {
            HpaObject::V1(_) => SchemaRevision::V1,
            HpaObject::V2Beta1(_) => SchemaRevision::V2Beta1,
            HpaObject::V2Beta2(_) => SchemaRevision::V2Beta2,
            HpaObject::V2(_) => SchemaRevision::V2,
        }
    }

    /// Convert into the canonical record using the revision's own rules
    pub fn normalize(&self) -> Hpa {
        match self {
            HpaObject::V1(hpa) => v1::normalize(hpa),
            HpaObject::V2Beta1(hpa) => v2beta1::normalize(hpa),
            HpaObject::V2Beta2(hpa) => v2beta2::normalize(hpa),
            HpaObject::V2(hpa) => v2::normalize(hpa),
        }
    }
}

/// Function that decodes a parsed document into one revision's typed object
pub type ShapeDecoder = fn(serde_yaml::Value) -> Result<HpaObject, serde_yaml::Error>;

/// Shape descriptor: the revision and the decoder for its typed object
#[derive(Clone, Copy)]
pub struct Shape {
    pub revision: SchemaRevision,
    decoder: ShapeDecoder,
}

fn decode_as<T, F>(value: serde_yaml::Value, wrap: F) -> Result<HpaObject, serde_yaml::Error>
where
    T: DeserializeOwned,
    F: FnOnce(T) -> HpaObject,
{
    serde_yaml::from_value::<T>(value).map(wrap)
}

fn decode_v1(value: serde_yaml::Value) -> Result<HpaObject, serde_yaml::Error> {
    decode_as(value, HpaObject::V1)
}

fn decode_v2beta1(value: serde_yaml::Value) -> Result<HpaObject, serde_yaml::Error> {
    decode_as(value, HpaObject::V2Beta1)
}

fn decode_v2beta2(value: serde_yaml::Value) -> Result<HpaObject, serde_yaml::Error> {
    decode_as(value, HpaObject::V2Beta2)
}

fn decode_v2(value: serde_yaml::Value) -> Result<HpaObject, serde_yaml::Error> {
    decode_as(value, HpaObject::V2)
}

impl Shape {
    pub fn new(revision: SchemaRevision, decoder: ShapeDecoder) -> Self {
        Self { revision, decoder }
    }

    /// Built-in shape for a revision
    pub fn of(revision: SchemaRevision) -> Self {
        let decoder: ShapeDecoder = match revision {
            SchemaRevision::V1 => decode_v1,
            SchemaRevision::V2Beta1 => decode_v2beta1,
            SchemaRevision::V2Beta2 => decode_v2beta2,
            SchemaRevision::V2 => decode_v2,
        };
        Self::new(revision, decoder)
    }

    /// Fully decode a parsed document against this shape
    pub fn decode(&self, value: serde_yaml::Value) -> Result<HpaObject, serde_yaml::Error> {
        (self.decoder)(value)
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

/// Registry of decodable shapes keyed by group/version/kind
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    shapes: BTreeMap<GroupVersionKind, Shape>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the four built-in autoscaling revisions
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for revision in SchemaRevision::ALL {
            registry.register(revision.gvk(), Shape::of(revision));
        }
        registry
    }

    /// Register a shape.
    ///
    /// # Panics
    ///
    /// Registering the same group/version/kind twice is a programming error.
    pub fn register(&mut self, gvk: GroupVersionKind, shape: Shape) {
        if self.shapes.contains_key(&gvk) {
            panic!("schema already registered for {}", gvk);
        }
        self.shapes.insert(gvk, shape);
    }

    pub fn lookup(&self, gvk: &GroupVersionKind) -> Option<&Shape> {
        self.shapes.get(gvk)
    }

    /// Registered shapes ordered by group/version/kind
    pub fn iter(&self) -> impl Iterator<Item = (&GroupVersionKind, &Shape)> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

static BUILTIN_REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();

/// Process-wide registry of the built-in revisions, initialized on first use
pub fn builtin_registry() -> &'static SchemaRegistry {
    BUILTIN_REGISTRY.get_or_init(SchemaRegistry::with_builtin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_has_four_revisions() {
        let registry = builtin_registry();
        assert_eq!(registry.len(), 4);
        for revision in SchemaRevision::ALL {
            let shape = registry.lookup(&revision.gvk()).unwrap();
            assert_eq!(shape.revision, revision);
        }
    }

    #[test]
    fn test_lookup_unknown_gvk() {
        let registry = SchemaRegistry::with_builtin();
        let gvk = GroupVersionKind::new("autoscaling", "v3", HPA_KIND);
        assert!(registry.lookup(&gvk).is_none());
        assert!(registry.lookup(&SchemaRevision::V1.list_gvk()).is_none());
    }

    #[test]
    #[should_panic(expected = "schema already registered")]
    fn test_duplicate_registration_panics() {
        let mut registry = SchemaRegistry::with_builtin();
        registry.register(SchemaRevision::V2.gvk(), Shape::of(SchemaRevision::V2));
    }

    #[test]
    fn test_revision_from_str() {
        assert_eq!("v1".parse::<SchemaRevision>(), Ok(SchemaRevision::V1));
        assert_eq!("autoscaling/v2beta2".parse::<SchemaRevision>(), Ok(SchemaRevision::V2Beta2));
        assert_eq!("V2BETA1".parse::<SchemaRevision>(), Ok(SchemaRevision::V2Beta1));
        assert!("v3".parse::<SchemaRevision>().is_err());
    }

    #[test]
    fn test_revision_display() {
        assert_eq!(SchemaRevision::V2.to_string(), "autoscaling/v2");
        assert_eq!(SchemaRevision::V1.list_gvk().kind, HPA_LIST_KIND);
    }

    #[test]
    fn test_shape_decode_tags_revision() {
        let value: serde_yaml::Value = serde_yaml::from_str(
            "spec:\n  scaleTargetRef: {kind: Deployment, name: web}\n  maxReplicas: 2\n",
        )
        .unwrap();
        let object = Shape::of(SchemaRevision::V2Beta2).decode(value).unwrap();
        assert_eq!(object.revision(), SchemaRevision::V2Beta2);
        assert_eq!(object.normalize().max_replicas, 2);
    }
}
