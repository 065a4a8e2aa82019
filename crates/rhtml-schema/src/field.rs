//! Schema Fields
//!
//! Field kinds of the synchronized data model and the mapping from
//! declaration kinds.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::declaration::{Declaration, DeclarationKind};

/// Primitive kind of a schema field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Any,
    String,
    Bool,
    Int,
    Float,
    List(Box<FieldKind>),
    Dict(Box<FieldKind>, Box<FieldKind>),
    Tuple(Vec<FieldKind>),
}

impl FieldKind {
    /// Check whether a value fits this kind.
    ///
    /// `null` fits every kind, and integers fit `Float`.
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }
        match self {
            Self::Any => true,
            Self::String => value.is_string(),
            Self::Bool => value.is_boolean(),
            Self::Int => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::List(item) => value
                .as_array()
                .is_some_and(|items| items.iter().all(|v| item.accepts(v))),
            Self::Dict(key, val) => value.as_object().is_some_and(|map| {
                map.iter()
                    .all(|(k, v)| key.accepts(&Value::String(k.clone())) && val.accepts(v))
            }),
            Self::Tuple(items) => value.as_array().is_some_and(|values| {
                values.len() == items.len()
                    && items.iter().zip(values).all(|(kind, v)| kind.accepts(v))
            }),
        }
    }
}

impl From<&DeclarationKind> for FieldKind {
    fn from(kind: &DeclarationKind) -> Self {
        match kind {
            DeclarationKind::String => Self::String,
            DeclarationKind::Boolean => Self::Bool,
            DeclarationKind::Integer => Self::Int,
            DeclarationKind::Number => Self::Float,
            DeclarationKind::List => Self::List(Box::new(Self::Any)),
            DeclarationKind::Dict => Self::Dict(Box::new(Self::String), Box::new(Self::Any)),
            DeclarationKind::Tuple { length } => Self::Tuple(vec![Self::Any; *length]),
            DeclarationKind::Other(_) => Self::Any,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::String => f.write_str("String"),
            Self::Bool => f.write_str("Bool"),
            Self::Int => f.write_str("Int"),
            Self::Float => f.write_str("Float"),
            Self::List(item) => write!(f, "List({item})"),
            Self::Dict(key, val) => write!(f, "Dict({key}, {val})"),
            Self::Tuple(items) => {
                f.write_str("Tuple(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// One typed slot in a data model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub kind: FieldKind,
    pub default: Value,
    pub help: Option<String>,
}

impl From<&Declaration> for SchemaField {
    fn from(decl: &Declaration) -> Self {
        let kind = FieldKind::from(&decl.kind);
        if let DeclarationKind::Other(tag) = &decl.kind {
            tracing::debug!("Parameter '{}' of kind '{}' mapped to Any", decl.name, tag);
        }
        Self {
            name: decl.name.clone(),
            kind,
            default: decl.default.clone(),
            help: decl.doc.clone(),
        }
    }
}
