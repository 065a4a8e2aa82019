//! Data Model
//!
//! A schema derived from a parameter set and the record instance that
//! mirrors its values.

use std::collections::BTreeSet;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::SchemaError;
use crate::declaration::Parameterized;
use crate::field::SchemaField;

/// Named, ordered set of fields
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Schema {
    pub name: String,
    pub fields: Vec<SchemaField>,
}

impl Schema {
    /// Get a field by name
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Position of a field in declaration order
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// Record instance of a [`Schema`]
///
/// Values are kept in field order. Serializes as a map in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct DataModel {
    schema: Schema,
    values: Vec<Value>,
}

impl DataModel {
    /// Instantiate a schema with its field defaults
    pub fn new(schema: Schema) -> Self {
        let values = schema.fields.iter().map(|f| f.default.clone()).collect();
        Self { schema, values }
    }

    /// Record name (the parameter set's name)
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a field's current value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.index_of(name).map(|i| &self.values[i])
    }

    /// Set a field's value after checking it against the field kind.
    ///
    /// Returns the previous value.
    pub fn set(&mut self, name: &str, value: Value) -> Result<Value, SchemaError> {
        let index = self
            .schema
            .index_of(name)
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))?;
        let field = &self.schema.fields[index];
        if !field.kind.accepts(&value) {
            return Err(SchemaError::InvalidValue {
                field: name.to_string(),
                kind: field.kind.clone(),
                value,
            });
        }
        Ok(std::mem::replace(&mut self.values[index], value))
    }

    /// Fields and values in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&SchemaField, &Value)> {
        self.schema.fields.iter().zip(&self.values)
    }
}

impl Serialize for DataModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(&field.name, value)?;
        }
        map.end()
    }
}

/// Builds data models from parameter sets
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    exclude: BTreeSet<String>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self {
            exclude: BTreeSet::from(["name".to_string()]),
        }
    }
}

impl SchemaBuilder {
    /// Builder excluding only `name`
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the set of excluded parameter names
    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.contains(name)
    }

    /// Derive the schema of a parameter set
    pub fn schema<P: Parameterized + ?Sized>(&self, params: &P) -> Schema {
        let fields = params
            .declarations()
            .iter()
            .filter(|decl| !self.is_excluded(&decl.name))
            .map(SchemaField::from)
            .collect();
        Schema {
            name: params.name().to_string(),
            fields,
        }
    }

    /// Derive the schema and snapshot the current parameter values into it
    pub fn build<P: Parameterized + ?Sized>(&self, params: &P) -> DataModel {
        let schema = self.schema(params);
        let values = schema
            .fields
            .iter()
            .map(|field| params.value(&field.name).unwrap_or_else(|| field.default.clone()))
            .collect();

        tracing::debug!("Built data model '{}' with {} fields", schema.name, schema.fields.len());
        for field in &schema.fields {
            tracing::trace!("  {}: {}", field.name, field.kind);
        }
        DataModel { schema, values }
    }
}
