//! Version-polymorphic decoding of HorizontalPodAutoscaler payloads
//!
//! Payloads are YAML or JSON documents. The `apiVersion`/`kind` marker is read
//! first, and the document is then fully decoded against the one shape the
//! registry holds for that marker. A payload is never tried against several
//! shapes until one happens to parse.

#[cfg(test)]
mod tests;

use crate::diagnostics::Diagnostic;
use crate::error::{DecodeError, Result};
use crate::models::{GroupVersionKind, Hpa};
use crate::schema::{builtin_registry, HpaObject, SchemaRegistry, SchemaRevision, TypeMeta};
use serde_yaml::Value;

/// Outcome of decoding a list payload of one revision
#[derive(Debug, Clone, PartialEq)]
pub struct ListDecode {
    pub revision: SchemaRevision,
    /// Canonical records, in the order the members appear in the payload
    pub items: Vec<Hpa>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ListDecode {
    fn empty(revision: SchemaRevision) -> Self {
        Self {
            revision,
            items: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn rejected(revision: SchemaRevision, cause: impl ToString) -> Self {
        Self {
            revision,
            items: Vec::new(),
            diagnostics: vec![Diagnostic::ListRejected {
                revision,
                cause: cause.to_string(),
            }],
        }
    }

    /// True when the envelope could not be read at all
    pub fn is_rejected(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::ListRejected { .. }))
    }

    /// Number of members left out because they failed to decode
    pub fn skipped(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::MemberSkipped { .. }))
            .count()
    }
}

/// Decoder bound to a schema registry
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'r> {
    registry: &'r SchemaRegistry,
}

impl Default for Decoder<'static> {
    fn default() -> Self {
        Self::new(builtin_registry())
    }
}

impl<'r> Decoder<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Decode a single object, detecting its revision from the embedded marker
    pub fn decode(&self, data: &[u8]) -> Result<(HpaObject, GroupVersionKind)> {
        let value: Value = serde_yaml::from_slice(data)?;
        let gvk = TypeMeta::from_value(&value)
            .gvk()
            .ok_or(DecodeError::MissingTypeMeta)?;
        let shape = self
            .registry
            .lookup(&gvk)
            .ok_or_else(|| DecodeError::UnsupportedVersion { gvk: gvk.clone() })?;
        let object = shape.decode(value)?;
        Ok((object, gvk))
    }

    /// Decode a single object straight into its canonical record
    pub fn decode_hpa(&self, data: &[u8]) -> Result<Hpa> {
        self.decode(data).map(|(object, _)| object.normalize())
    }

    /// Decode a `HorizontalPodAutoscalerList` of a known revision.
    ///
    /// Members that fail to decode are left out and reported as
    /// [`Diagnostic::MemberSkipped`]; the remaining members are still
    /// returned. An unreadable envelope yields an empty result carrying a
    /// single [`Diagnostic::ListRejected`].
    pub fn decode_list(&self, data: &[u8], revision: SchemaRevision) -> ListDecode {
        let value: Value = match serde_yaml::from_slice(data) {
            Ok(value) => value,
            Err(e) => return ListDecode::rejected(revision, DecodeError::from(e)),
        };

        let expected = revision.list_gvk();
        match TypeMeta::from_value(&value).gvk() {
            None => return ListDecode::rejected(revision, DecodeError::MissingTypeMeta),
            Some(found) if found != expected => {
                return ListDecode::rejected(revision, DecodeError::KindMismatch { expected, found })
            }
            Some(_) => {}
        }

        let member_gvk = revision.gvk();
        let Some(shape) = self.registry.lookup(&member_gvk) else {
            return ListDecode::rejected(
                revision,
                DecodeError::UnsupportedVersion { gvk: member_gvk },
            );
        };

        let members = match value.get("items") {
            None | Some(Value::Null) => return ListDecode::empty(revision),
            Some(Value::Sequence(items)) => items.clone(),
            Some(_) => return ListDecode::rejected(revision, "items is not a sequence"),
        };

        let mut outcome = ListDecode::empty(revision);
        for (index, member) in members.into_iter().enumerate() {
            // list members normally omit the marker and inherit the list's revision
            let gvk = TypeMeta::from_value(&member)
                .gvk()
                .unwrap_or_else(|| member_gvk.clone());
            let (namespace, name) = peek_identity(&member);

            let decoded = if gvk != member_gvk {
                Err(DecodeError::KindMismatch {
                    expected: member_gvk.clone(),
                    found: gvk.clone(),
                })
            } else {
                shape.decode(member).map_err(DecodeError::from)
            };

            match decoded {
                Ok(object) => outcome.items.push(object.normalize()),
                Err(e) => outcome.diagnostics.push(Diagnostic::MemberSkipped {
                    index,
                    gvk,
                    namespace,
                    name,
                    cause: e.to_string(),
                }),
            }
        }

        outcome
    }
}

/// Namespace and name of an undecoded member, for diagnostics
fn peek_identity(member: &Value) -> (Option<String>, Option<String>) {
    let field = |key: &str| {
        member
            .get("metadata")
            .and_then(|meta| meta.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    (field("namespace"), field("name"))
}

/// Decode a single object with the built-in registry
pub fn decode_hpa(data: &[u8]) -> Result<Hpa> {
    Decoder::default().decode_hpa(data)
}

/// Decode a list payload of one revision with the built-in registry
pub fn decode_hpa_list(data: &[u8], revision: SchemaRevision) -> ListDecode {
    Decoder::default().decode_list(data, revision)
}
