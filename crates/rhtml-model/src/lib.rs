//! rhtml Model
//!
//! Reactive HTML components: markup with `${...}` bindings, a typed data
//! model mirroring a parameter set, and the DOM events flowing back.
//!
//! # Example
//! ```rust,ignore
//! use rhtml_model::{ReactiveHtml, schema};
//!
//! let params = schema::ParameterSet::new("Counter")
//!     .with(schema::Declaration::new("count", schema::DeclarationKind::Integer).with_default(0));
//! let model = ReactiveHtml::builder()
//!     .html(r#"<button id="btn-${id}" title="${count}">${label}</button>"#)
//!     .event("btn", "click")
//!     .data(schema::build(&params))
//!     .build()?;
//! ```

mod event;
mod layout;
mod reactive;

pub use event::{DomEvent, EventDispatcher, ModelId};
pub use layout::LayoutModel;
pub use reactive::{Callbacks, Events, Models, ReactiveHtml, ReactiveHtmlBuilder, Scripts};

// Re-export sub-crates
pub use rhtml_schema as schema;
pub use rhtml_template as template;

/// Model error
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Template scan failed: {0}")]
    Scan(#[from] rhtml_template::ScanError),

    #[error("Data model error: {0}")]
    Schema(#[from] rhtml_schema::SchemaError),

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Model has no data model")]
    NoData,
}
