//! CLI integration tests

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const V2_HPA: &str = r#"
apiVersion: autoscaling/v2
kind: HorizontalPodAutoscaler
metadata:
  name: web-hpa
  namespace: prod
spec:
  scaleTargetRef:
    apiVersion: apps/v1
    kind: Deployment
    name: web
  maxReplicas: 6
  metrics:
    - type: Resource
      resource:
        name: memory
        target:
          type: Utilization
          averageUtilization: 80
"#;

const V2BETA1_LIST: &str = r#"
apiVersion: autoscaling/v2beta1
kind: HorizontalPodAutoscalerList
items:
  - metadata:
      name: first
    spec:
      scaleTargetRef: {apiVersion: apps/v1, kind: Deployment, name: api}
      maxReplicas: 3
      metrics:
        - type: Resource
          resource: {name: cpu, targetAverageUtilization: 50}
  - metadata:
      name: broken
    spec:
      scaleTargetRef: {apiVersion: apps/v1, kind: Deployment, name: api}
      maxReplicas: lots
  - metadata:
      name: second
    spec:
      scaleTargetRef: {apiVersion: apps/v1, kind: Deployment, name: api}
      maxReplicas: 4
      metrics:
        - type: Resource
          resource: {name: cpu, targetAverageUtilization: 95}
"#;

fn hpactl(args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "-q", "-p", "hpactl", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn write_payload(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path_str(&path)
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = hpactl(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("HorizontalPodAutoscaler"), "Should describe the tool");
    assert!(stdout.contains("decode"), "Should show decode command");
    assert!(stdout.contains("list"), "Should show list command");
    assert!(stdout.contains("derive"), "Should show derive command");
    assert!(stdout.contains("revisions"), "Should show revisions command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = hpactl(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("hpactl"), "Should show binary name");
}

/// Test derive subcommand help
#[test]
fn test_derive_help() {
    let output = hpactl(&["derive", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("--revision"));
    assert!(stdout.contains("--now"));
    assert!(stdout.contains("--project-id"));
    assert!(stdout.contains("--cluster-name"));
}

#[test]
fn test_revisions_json() {
    let output = hpactl(&["--format", "json", "revisions"]);
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let versions: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["api_version"].as_str().unwrap())
        .collect();
    assert_eq!(versions.len(), 4);
    assert!(versions.contains(&"autoscaling/v1"));
    assert!(versions.contains(&"autoscaling/v2beta1"));
    assert!(versions.contains(&"autoscaling/v2beta2"));
    assert!(versions.contains(&"autoscaling/v2"));
}

#[test]
fn test_decode_detects_revision() {
    let dir = TempDir::new().unwrap();
    let file = write_payload(&dir, "hpa.yaml", V2_HPA);

    let output = hpactl(&["decode", &file, "--format", "json"]);
    assert!(output.status.success());

    let decoded: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(decoded["gvk"]["version"], "v2");
    assert_eq!(decoded["hpa"]["namespace"], "prod");
    assert_eq!(decoded["hpa"]["minReplicas"], 1);
    assert_eq!(decoded["hpa"]["targetCPUPercentage"], 0);
    assert_eq!(decoded["hpa"]["targetMemoryPercentage"], 80);
}

#[test]
fn test_decode_unsupported_version_fails() {
    let dir = TempDir::new().unwrap();
    let file = write_payload(
        &dir,
        "hpa.yaml",
        "apiVersion: autoscaling/v3\nkind: HorizontalPodAutoscaler\n",
    );

    let output = hpactl(&["decode", &file]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("not implemented"));
}

#[test]
fn test_list_skips_malformed_member() {
    let dir = TempDir::new().unwrap();
    let file = write_payload(&dir, "list.yaml", V2BETA1_LIST);

    let output = hpactl(&["list", &file, "--revision", "v2beta1", "--format", "json"]);
    assert!(output.status.success());

    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = listed["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["first", "second"]);
    assert_eq!(listed["diagnostics"][0]["event"], "member_skipped");
    assert_eq!(listed["diagnostics"][0]["index"], 1);
}

#[test]
fn test_derive_first_seen_wins() {
    let dir = TempDir::new().unwrap();
    let file = write_payload(&dir, "list.yaml", V2BETA1_LIST);

    let output = hpactl(&[
        "derive",
        &file,
        "--revision",
        "v2beta1",
        "--now",
        "2024-05-01T10:00:00Z",
        "--project-id",
        "my-project",
        "--format",
        "json",
    ]);
    assert!(output.status.success());

    let derived: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let series = derived["series"].as_array().unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0]["points"][0]["value"]["int64Value"], 50);
    assert_eq!(series[0]["points"][0]["interval"]["endTime"], "2024-05-01T10:00:00Z");
    assert_eq!(series[0]["metric"]["labels"]["object_name"], "first");
    assert_eq!(series[0]["resource"]["labels"]["project_id"], "my-project");

    let events: Vec<&str> = derived["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["event"].as_str().unwrap())
        .collect();
    assert_eq!(events, vec!["member_skipped", "duplicate_target"]);
}
