//! Parameter Declarations
//!
//! Named, typed parameters as exposed by the parameter framework.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared parameter kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclarationKind {
    String,
    Boolean,
    Integer,
    Number,
    List,
    Dict,
    Tuple { length: usize },
    /// Any kind without a dedicated schema type (subclasses, selectors, objects, ...)
    Other(String),
}

impl DeclarationKind {
    /// Parse a kind tag such as `"Integer"` or `"number"`
    pub fn parse(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "string" | "str" => Self::String,
            "boolean" | "bool" => Self::Boolean,
            "integer" | "int" => Self::Integer,
            "number" | "float" => Self::Number,
            "list" => Self::List,
            "dict" => Self::Dict,
            _ => Self::Other(tag.to_string()),
        }
    }

    pub fn tuple(length: usize) -> Self {
        Self::Tuple { length }
    }
}

/// A single parameter declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    pub default: Value,
    pub doc: Option<String>,
}

impl Declaration {
    pub fn new(name: impl Into<String>, kind: DeclarationKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: Value::Null,
            doc: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// Source of parameter declarations and their current values
pub trait Parameterized {
    /// Name of the parameter set, used as the record name
    fn name(&self) -> &str;

    /// Declarations in declaration order
    fn declarations(&self) -> &[Declaration];

    /// Current value of a parameter, if one has been set
    fn value(&self, name: &str) -> Option<Value>;
}

/// In-memory parameter set
///
/// Always declares a `name` string parameter holding the set's own name.
#[derive(Debug, Clone)]
pub struct ParameterSet {
    name: String,
    declarations: Vec<Declaration>,
    values: HashMap<String, Value>,
}

impl ParameterSet {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let name_decl = Declaration::new("name", DeclarationKind::String)
            .with_default(name.clone())
            .with_doc("String identifier for this object.");
        Self {
            name,
            declarations: vec![name_decl],
            values: HashMap::new(),
        }
    }

    /// Add a declaration, replacing one with the same name in place
    pub fn declare(&mut self, declaration: Declaration) -> &mut Self {
        match self.declarations.iter_mut().find(|d| d.name == declaration.name) {
            Some(existing) => *existing = declaration,
            None => self.declarations.push(declaration),
        }
        self
    }

    /// Builder-style [`declare`](Self::declare)
    pub fn with(mut self, declaration: Declaration) -> Self {
        self.declare(declaration);
        self
    }

    /// Set the current value of a declared parameter.
    ///
    /// Setting `name` renames the set and only accepts a string.
    /// Returns `false` if the value was not stored.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> bool {
        let value = value.into();
        if name == "name" {
            let Value::String(new_name) = value else {
                return false;
            };
            self.name = new_name;
            return true;
        }
        if !self.declarations.iter().any(|d| d.name == name) {
            return false;
        }
        self.values.insert(name.to_string(), value);
        true
    }
}

impl Parameterized for ParameterSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    fn value(&self, name: &str) -> Option<Value> {
        if name == "name" {
            return Some(Value::String(self.name.clone()));
        }
        self.values.get(name).cloned()
    }
}
