//! Static node declarations: identity, metadata and the input field table.
//!
//! The bounds declared here are what [`InvocationSpec::check_int`] enforces,
//! so a node's published field table and its validation cannot drift apart.

use serde::Serialize;

use crate::error::FieldError;

/// Declaration of a node type.
#[derive(Debug, Serialize)]
pub struct InvocationSpec {
    /// Stable node id, also the `type` tag of invocation records
    pub id: &'static str,
    /// Human-readable title
    pub title: &'static str,
    pub tags: &'static [&'static str],
    pub category: &'static str,
    pub version: &'static str,
    /// Whether the host may reuse a previous output for identical inputs
    pub use_cache: bool,
    /// Input fields in declaration order
    pub fields: &'static [FieldSpec],
}

/// One declared input field.
#[derive(Debug, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
}

/// Field type with its bounds and default.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Reference to an image in the store
    Image,
    /// Integer in `min..=max`
    Int { min: i64, max: i64, default: i64 },
    Bool { default: bool },
    /// One of a fixed set of labels
    Choice {
        options: &'static [&'static str],
        default: &'static str,
    },
}

impl InvocationSpec {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Check `value` against the declared bounds of integer field `field`.
    pub fn check_int(&self, field: &'static str, value: i64) -> Result<(), FieldError> {
        match self.field(field).map(|spec| &spec.kind) {
            Some(&FieldKind::Int { min, max, .. }) => {
                if (min..=max).contains(&value) {
                    Ok(())
                } else {
                    Err(FieldError::OutOfRange {
                        node: self.id,
                        field,
                        value,
                        min,
                        max,
                    })
                }
            }
            _ => Err(FieldError::UnknownField {
                node: self.id,
                field,
            }),
        }
    }
}

/// Field declaration for the image reference every save node takes.
pub(crate) const IMAGE_FIELD: FieldSpec = FieldSpec {
    name: "image",
    description: "The image to save",
    kind: FieldKind::Image,
};
