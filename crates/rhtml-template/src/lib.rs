//! rhtml Template
//!
//! Binding scanner for reactive HTML templates, built on html5ever's tokenizer.
//!
//! An element opts in with `id="<name>-${id}"`. Its attributes whose whole
//! value is `${expr}` become attribute bindings, and a text run that is
//! entirely `${expr}` becomes its child binding. Attributes behave as a
//! mapping: when a name repeats on one tag, the last value wins.

mod placeholder;
mod raw_attrs;
mod scanner;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use placeholder::{
    ID_MARKER, MODEL_PREFIX, binding_expr, is_placeholder, node_name, placeholder_expr,
};
pub use scanner::{ScanOptions, TemplateScanner};

/// Attribute bindings keyed by node name
pub type AttrBindings = BTreeMap<String, Vec<AttrBinding>>;

/// Child slot expressions keyed by node name
pub type ChildBindings = BTreeMap<String, String>;

/// Scan a template and return its attribute bindings
pub fn scan(html: &str) -> Result<AttrBindings, ScanError> {
    Ok(TemplateScanner::new().scan(html)?.attrs)
}

/// An attribute bound to a template expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttrBinding {
    pub attr: String,
    pub expr: String,
}

impl AttrBinding {
    pub fn new(attr: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            attr: attr.into(),
            expr: expr.into(),
        }
    }
}

/// Everything one scan discovered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateScan {
    /// Attribute bindings per node, in attribute order
    pub attrs: AttrBindings,
    /// Child slot per node (last text run wins)
    pub children: ChildBindings,
    /// Managed nodes in document order
    pub nodes: Vec<String>,
}

/// Scan error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("Malformed markup at line {line}: {message}")]
    MalformedMarkup { line: u64, message: String },
}
