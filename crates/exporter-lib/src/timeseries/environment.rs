//! Cluster environment labels
//!
//! Project, location and cluster name come from outside the exporter (the
//! metadata server, configuration, flags). Lookups never fail; a missing
//! value is an empty string.

use serde::{Deserialize, Serialize};

/// Source of the environment labels attached to every series
pub trait EnvironmentProvider: Send + Sync {
    fn project_id(&self) -> String;

    fn cluster_location(&self) -> String;

    fn cluster_name(&self) -> String;
}

/// Environment labels fixed at construction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticEnvironment {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub cluster_location: String,
    #[serde(default)]
    pub cluster_name: String,
}

impl StaticEnvironment {
    pub fn new(
        project_id: impl Into<String>,
        cluster_location: impl Into<String>,
        cluster_name: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            cluster_location: cluster_location.into(),
            cluster_name: cluster_name.into(),
        }
    }
}

impl EnvironmentProvider for StaticEnvironment {
    fn project_id(&self) -> String {
        self.project_id.clone()
    }

    fn cluster_location(&self) -> String {
        self.cluster_location.clone()
    }

    fn cluster_name(&self) -> String {
        self.cluster_name.clone()
    }
}

/// Snapshot of the environment labels, resolved once per derivation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentLabels {
    pub project_id: String,
    pub location: String,
    pub cluster_name: String,
}

impl EnvironmentLabels {
    /// Resolve all labels, trimming the trailing whitespace metadata values carry
    pub fn resolve(provider: &dyn EnvironmentProvider) -> Self {
        Self {
            project_id: provider.project_id().trim().to_string(),
            location: provider.cluster_location().trim().to_string(),
            cluster_name: provider.cluster_name().trim().to_string(),
        }
    }
}
