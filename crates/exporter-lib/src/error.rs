//! Decode errors

use crate::models::GroupVersionKind;

/// Result type alias using DecodeError
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Failure to turn a raw payload into a typed autoscaler object
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Payload is not well-formed for the shape it was decoded against
    #[error("malformed payload: {source}")]
    Malformed {
        #[from]
        source: serde_yaml::Error,
    },

    /// Payload carries no apiVersion/kind marker
    #[error("payload does not declare apiVersion and kind")]
    MissingTypeMeta,

    /// Marker names a revision absent from the registry
    #[error("APIVersion and Kind not implemented: {gvk}")]
    UnsupportedVersion { gvk: GroupVersionKind },

    /// Marker names a different kind than the entry point expects
    #[error("expected {expected}, found {found}")]
    KindMismatch {
        expected: GroupVersionKind,
        found: GroupVersionKind,
    },
}
