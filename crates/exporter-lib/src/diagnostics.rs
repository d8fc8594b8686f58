//! Structured diagnostics for skipped objects
//!
//! Nothing in the decode or derive path writes to the console. Every skip is
//! returned to the caller as a [`Diagnostic`], which the caller may log
//! (see [`crate::observability::StructuredLogger`]), count, or assert on.

use crate::models::{GroupVersionKind, Hpa, TargetRef};
use crate::schema::SchemaRevision;
use crate::timeseries::TargetKey;
use serde::Serialize;
use std::fmt;

/// Identity of a canonical record, enough to correlate a diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectRef {
    pub namespace: String,
    pub name: String,
}

impl From<&Hpa> for ObjectRef {
    fn from(hpa: &Hpa) -> Self {
        Self {
            namespace: hpa.namespace.clone(),
            name: hpa.name.clone(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The list envelope itself could not be decoded; no member was read
    ListRejected {
        revision: SchemaRevision,
        cause: String,
    },
    /// One list member failed to decode and was left out of the result
    MemberSkipped {
        index: usize,
        gvk: GroupVersionKind,
        namespace: Option<String>,
        name: Option<String>,
        cause: String,
    },
    /// Another autoscaler already produced a series for the same target and metric
    DuplicateTarget {
        key: TargetKey,
        skipped: ObjectRef,
        retained: ObjectRef,
    },
    /// Neither a CPU nor a memory target is configured
    NoTargetsConfigured { object: ObjectRef, target: TargetRef },
}

impl Diagnostic {
    /// True for diagnostics raised by a decode failure rather than a policy skip
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            Diagnostic::ListRejected { .. } | Diagnostic::MemberSkipped { .. }
        )
    }

    /// Short machine-readable event name
    pub fn event(&self) -> &'static str {
        match self {
            Diagnostic::ListRejected { .. } => "list_rejected",
            Diagnostic::MemberSkipped { .. } => "member_skipped",
            Diagnostic::DuplicateTarget { .. } => "duplicate_target",
            Diagnostic::NoTargetsConfigured { .. } => "no_targets_configured",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ListRejected { revision, cause } => {
                write!(f, "Unable to decode {} list. Root cause: {}", revision, cause)
            }
            Diagnostic::MemberSkipped {
                index, gvk, cause, ..
            } => write!(
                f,
                "Unable to decode object #{} ({}). Root cause: {}",
                index, gvk, cause
            ),
            Diagnostic::DuplicateTarget {
                key,
                skipped,
                retained,
            } => write!(
                f,
                "Skipping HPA {} '{}' once '{}' was already loaded",
                key.metric, skipped, retained
            ),
            Diagnostic::NoTargetsConfigured { object, .. } => write!(
                f,
                "Skipping HPA '{}' once it doesn't configure either Target CPU or Target Memory",
                object
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeseries::MetricKind;

    #[test]
    fn test_duplicate_message_names_both_objects() {
        let diagnostic = Diagnostic::DuplicateTarget {
            key: TargetKey {
                kind: "Deployment".to_string(),
                namespace: "shop".to_string(),
                name: "cart".to_string(),
                metric: MetricKind::Cpu,
            },
            skipped: ObjectRef {
                namespace: "shop".to_string(),
                name: "cart-b".to_string(),
            },
            retained: ObjectRef {
                namespace: "shop".to_string(),
                name: "cart-a".to_string(),
            },
        };

        let message = diagnostic.to_string();
        assert!(message.contains("shop.cart-b"));
        assert!(message.contains("shop.cart-a"));
        assert!(message.contains("cpu"));
        assert!(!diagnostic.is_decode_failure());
        assert_eq!(diagnostic.event(), "duplicate_target");
    }

    #[test]
    fn test_member_skipped_is_decode_failure() {
        let diagnostic = Diagnostic::MemberSkipped {
            index: 1,
            gvk: SchemaRevision::V1.gvk(),
            namespace: None,
            name: Some("broken".to_string()),
            cause: "missing field `maxReplicas`".to_string(),
        };
        assert!(diagnostic.is_decode_failure());
        assert!(diagnostic.to_string().contains("#1"));
    }
}
