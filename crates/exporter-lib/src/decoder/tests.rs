//! Decoder tests against hand-written payloads of every revision

use super::*;
use crate::schema::{Shape, HPA_KIND};

const MINIMAL_BODY: &str = r#"
metadata:
  name: web
spec:
  scaleTargetRef:
    apiVersion: apps/v1
    kind: Deployment
    name: web
  maxReplicas: 5
"#;

fn minimal(revision: SchemaRevision) -> String {
    format!(
        "apiVersion: {}\nkind: HorizontalPodAutoscaler{}",
        revision, MINIMAL_BODY
    )
}

fn with_zero_min_replicas(revision: SchemaRevision) -> String {
    format!(
        r#"apiVersion: {}
kind: HorizontalPodAutoscaler
metadata:
  name: paused
  namespace: team-a
spec:
  scaleTargetRef:
    apiVersion: apps/v1
    kind: Deployment
    name: paused
  minReplicas: 0
  maxReplicas: 3
"#,
        revision
    )
}

const V2BETA1_DUPLICATE_CPU: &str = r#"
apiVersion: autoscaling/v2beta1
kind: HorizontalPodAutoscaler
metadata:
  name: api
spec:
  scaleTargetRef: {apiVersion: apps/v1, kind: Deployment, name: api}
  maxReplicas: 10
  metrics:
  - type: Resource
    resource: {name: cpu, targetAverageUtilization: 50}
  - type: Resource
    resource: {name: cpu, targetAverageUtilization: 75}
"#;

fn nested_target_duplicate_cpu(revision: SchemaRevision) -> String {
    format!(
        r#"apiVersion: {}
kind: HorizontalPodAutoscaler
metadata:
  name: api
spec:
  scaleTargetRef: {{apiVersion: apps/v1, kind: Deployment, name: api}}
  maxReplicas: 10
  metrics:
  - type: Resource
    resource:
      name: cpu
      target: {{type: Utilization, averageUtilization: 50}}
  - type: Resource
    resource:
      name: memory
      target: {{type: Utilization, averageUtilization: 60}}
  - type: Resource
    resource:
      name: cpu
      target: {{type: Utilization, averageUtilization: 75}}
"#,
        revision
    )
}

#[test]
fn test_minimal_payload_defaults_for_every_revision() {
    let decoder = Decoder::default();
    for revision in SchemaRevision::ALL {
        let (object, gvk) = decoder.decode(minimal(revision).as_bytes()).unwrap();
        assert_eq!(object.revision(), revision);
        assert_eq!(gvk, revision.gvk());

        let hpa = object.normalize();
        assert_eq!(hpa.target_cpu_percentage, 0, "{}", revision);
        assert_eq!(hpa.target_memory_percentage, 0, "{}", revision);
        assert_eq!(hpa.min_replicas, 1, "{}", revision);
        assert_eq!(hpa.max_replicas, 5, "{}", revision);
        assert_eq!(hpa.namespace, "default", "{}", revision);
    }
}

#[test]
fn test_explicit_zero_min_replicas_for_every_revision() {
    for revision in SchemaRevision::ALL {
        let hpa = decode_hpa(with_zero_min_replicas(revision).as_bytes()).unwrap();
        assert_eq!(hpa.min_replicas, 0, "{}", revision);
        assert_eq!(hpa.namespace, "team-a", "{}", revision);
    }
}

#[test]
fn test_duplicate_cpu_entries_last_wins() {
    let hpa = decode_hpa(V2BETA1_DUPLICATE_CPU.as_bytes()).unwrap();
    assert_eq!(hpa.target_cpu_percentage, 75);

    for revision in [SchemaRevision::V2Beta2, SchemaRevision::V2] {
        let hpa = decode_hpa(nested_target_duplicate_cpu(revision).as_bytes()).unwrap();
        assert_eq!(hpa.target_cpu_percentage, 75, "{}", revision);
        assert_eq!(hpa.target_memory_percentage, 60, "{}", revision);
    }
}

#[test]
fn test_marker_drives_shape_selection() {
    let body = r#"
kind: HorizontalPodAutoscaler
metadata:
  name: legacy
spec:
  scaleTargetRef: {apiVersion: apps/v1, kind: Deployment, name: legacy}
  maxReplicas: 4
  targetCPUUtilizationPercentage: 65
"#;
    let as_v1 = format!("apiVersion: autoscaling/v1{}", body);
    let as_v2 = format!("apiVersion: autoscaling/v2{}", body);

    assert_eq!(decode_hpa(as_v1.as_bytes()).unwrap().target_cpu_percentage, 65);
    // a v2 shape has no scalar CPU field, so the same body yields no target
    assert_eq!(decode_hpa(as_v2.as_bytes()).unwrap().target_cpu_percentage, 0);
}

#[test]
fn test_json_payload() {
    let json = r#"{
  "apiVersion": "autoscaling/v2",
  "kind": "HorizontalPodAutoscaler",
  "metadata": {"name": "json-hpa", "namespace": "prod"},
  "spec": {
    "scaleTargetRef": {"apiVersion": "apps/v1", "kind": "Deployment", "name": "svc"},
    "minReplicas": 2,
    "maxReplicas": 9,
    "metrics": [
      {"type": "Resource", "resource": {"name": "memory", "target": {"type": "Utilization", "averageUtilization": 80}}}
    ]
  }
}"#;
    let hpa = decode_hpa(json.as_bytes()).unwrap();
    assert_eq!(hpa.namespace, "prod");
    assert_eq!(hpa.target_ref.name, "svc");
    assert_eq!(hpa.min_replicas, 2);
    assert_eq!(hpa.target_memory_percentage, 80);
}

#[test]
fn test_unsupported_version() {
    let payload = minimal(SchemaRevision::V1).replace("autoscaling/v1", "autoscaling/v3");
    match Decoder::default().decode(payload.as_bytes()) {
        Err(DecodeError::UnsupportedVersion { gvk }) => {
            assert_eq!(gvk.version, "v3");
            assert_eq!(gvk.kind, HPA_KIND);
        }
        other => panic!("expected UnsupportedVersion, got {:?}", other),
    }
}

#[test]
fn test_missing_type_meta() {
    let result = Decoder::default().decode(MINIMAL_BODY.as_bytes());
    assert!(matches!(result, Err(DecodeError::MissingTypeMeta)));
}

#[test]
fn test_malformed_payload() {
    let result = Decoder::default().decode(b"apiVersion: [autoscaling/v1");
    assert!(matches!(result, Err(DecodeError::Malformed { .. })));

    let missing_max = "apiVersion: autoscaling/v1\nkind: HorizontalPodAutoscaler\nspec:\n  scaleTargetRef: {kind: Deployment, name: web}\n";
    let result = Decoder::default().decode(missing_max.as_bytes());
    assert!(matches!(result, Err(DecodeError::Malformed { .. })));
}

#[test]
fn test_custom_registry_limits_revisions() {
    let mut registry = SchemaRegistry::new();
    registry.register(SchemaRevision::V2.gvk(), Shape::of(SchemaRevision::V2));
    let decoder = Decoder::new(&registry);

    assert!(decoder.decode(minimal(SchemaRevision::V2).as_bytes()).is_ok());
    assert!(matches!(
        decoder.decode(minimal(SchemaRevision::V1).as_bytes()),
        Err(DecodeError::UnsupportedVersion { .. })
    ));
}

mod list_tests {
    use super::*;

    const V1_LIST_WITH_BROKEN_MEMBER: &str = r#"
apiVersion: autoscaling/v1
kind: HorizontalPodAutoscalerList
items:
- metadata: {name: first, namespace: shop}
  spec:
    scaleTargetRef: {apiVersion: apps/v1, kind: Deployment, name: cart}
    maxReplicas: 5
    targetCPUUtilizationPercentage: 60
- metadata: {name: second, namespace: shop}
  spec:
    scaleTargetRef: {apiVersion: apps/v1, kind: Deployment, name: checkout}
    maxReplicas: lots
- metadata: {name: third}
  spec:
    scaleTargetRef: {apiVersion: apps/v1, kind: Deployment, name: search}
    minReplicas: 2
    maxReplicas: 8
    targetCPUUtilizationPercentage: 70
"#;

    #[test]
    fn test_malformed_member_is_skipped() {
        let outcome = decode_hpa_list(V1_LIST_WITH_BROKEN_MEMBER.as_bytes(), SchemaRevision::V1);

        assert_eq!(outcome.items.len(), 2);
        assert_eq!(outcome.items[0].name, "first");
        assert_eq!(outcome.items[1].name, "third");
        assert_eq!(outcome.items[1].namespace, "default");
        assert_eq!(outcome.items[1].min_replicas, 2);

        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.skipped(), 1);
        match &outcome.diagnostics[0] {
            Diagnostic::MemberSkipped {
                index, gvk, name, ..
            } => {
                assert_eq!(*index, 1);
                assert_eq!(*gvk, SchemaRevision::V1.gvk());
                assert_eq!(name.as_deref(), Some("second"));
            }
            other => panic!("unexpected diagnostic {:?}", other),
        }
    }

    #[test]
    fn test_empty_list() {
        let payload = "apiVersion: autoscaling/v2\nkind: HorizontalPodAutoscalerList\nitems: []\n";
        let outcome = decode_hpa_list(payload.as_bytes(), SchemaRevision::V2);
        assert!(outcome.items.is_empty());
        assert!(outcome.diagnostics.is_empty());

        let no_items = "apiVersion: autoscaling/v2\nkind: HorizontalPodAutoscalerList\n";
        let outcome = decode_hpa_list(no_items.as_bytes(), SchemaRevision::V2);
        assert!(outcome.items.is_empty());
        assert!(!outcome.is_rejected());
    }

    #[test]
    fn test_list_of_other_revision_is_rejected() {
        let payload = "apiVersion: autoscaling/v2\nkind: HorizontalPodAutoscalerList\nitems: []\n";
        let outcome = decode_hpa_list(payload.as_bytes(), SchemaRevision::V1);
        assert!(outcome.items.is_empty());
        assert!(outcome.is_rejected());
    }

    #[test]
    fn test_unparseable_list_is_rejected() {
        let outcome = decode_hpa_list(b"{not yaml", SchemaRevision::V2Beta2);
        assert!(outcome.is_rejected());
        assert_eq!(outcome.revision, SchemaRevision::V2Beta2);
    }

    #[test]
    fn test_member_with_foreign_marker_is_skipped() {
        let payload = r#"
apiVersion: autoscaling/v2
kind: HorizontalPodAutoscalerList
items:
- apiVersion: autoscaling/v1
  kind: HorizontalPodAutoscaler
  metadata: {name: stray}
  spec:
    scaleTargetRef: {kind: Deployment, name: stray}
    maxReplicas: 2
- apiVersion: autoscaling/v2
  kind: HorizontalPodAutoscaler
  metadata: {name: ok}
  spec:
    scaleTargetRef: {kind: Deployment, name: ok}
    maxReplicas: 2
"#;
        let outcome = decode_hpa_list(payload.as_bytes(), SchemaRevision::V2);
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].name, "ok");
        match &outcome.diagnostics[0] {
            Diagnostic::MemberSkipped { gvk, .. } => assert_eq!(*gvk, SchemaRevision::V1.gvk()),
            other => panic!("unexpected diagnostic {:?}", other),
        }
    }

    #[test]
    fn test_list_preserves_member_order() {
        let payload = r#"
apiVersion: autoscaling/v2beta2
kind: HorizontalPodAutoscalerList
items:
- metadata: {name: c}
  spec: {scaleTargetRef: {kind: Deployment, name: c}, maxReplicas: 1}
- metadata: {name: a}
  spec: {scaleTargetRef: {kind: Deployment, name: a}, maxReplicas: 1}
- metadata: {name: b}
  spec: {scaleTargetRef: {kind: Deployment, name: b}, maxReplicas: 1}
"#;
        let outcome = decode_hpa_list(payload.as_bytes(), SchemaRevision::V2Beta2);
        let names: Vec<&str> = outcome.items.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}
