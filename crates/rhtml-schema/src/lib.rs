//! rhtml Schema
//!
//! Derives a typed data model from named parameter declarations.
//!
//! Every declaration kind maps to a field kind; kinds without a dedicated
//! mapping become [`FieldKind::Any`], so building never fails.

mod declaration;
mod field;
mod model;

use serde_json::Value;

pub use declaration::{Declaration, DeclarationKind, ParameterSet, Parameterized};
pub use field::{FieldKind, SchemaField};
pub use model::{DataModel, Schema, SchemaBuilder};

/// Build a data model excluding the `name` parameter
pub fn build<P: Parameterized + ?Sized>(params: &P) -> DataModel {
    SchemaBuilder::new().build(params)
}

/// Schema error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value for field '{field}' ({kind}): {value}")]
    InvalidValue {
        field: String,
        kind: FieldKind,
        value: Value,
    },
}
