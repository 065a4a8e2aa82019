//! Layout Models
//!
//! Renderable models that can be nested inside a reactive HTML model.

use std::fmt;

use crate::event::ModelId;

/// A renderable model owned by the layout system
pub trait LayoutModel: fmt::Debug + Send + Sync {
    fn id(&self) -> ModelId;

    /// Type name the rendering boundary dispatches on
    fn model_type(&self) -> &str;
}
