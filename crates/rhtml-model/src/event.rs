//! DOM Events
//!
//! Events raised by the rendered DOM and routed back to their model.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Model identifier, unique within the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModelId(pub(crate) u64);

impl ModelId {
    /// Allocate a fresh identifier
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Event raised by an interaction with the rendered DOM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomEvent {
    /// Model that owns the DOM
    pub model: ModelId,
    /// Node the event came from; `None` for model-level events
    pub node: Option<String>,
    /// Payload, interpreted by the receiver
    pub data: Option<Value>,
}

impl DomEvent {
    /// Name the rendering boundary uses for this event
    pub const EVENT_NAME: &'static str = "dom_event";

    pub fn new(model: ModelId, node: Option<String>, data: Option<Value>) -> Self {
        Self { model, node, data }
    }

    /// Create node-scoped event
    pub fn on_node(model: ModelId, node: impl Into<String>, data: Option<Value>) -> Self {
        Self::new(model, Some(node.into()), data)
    }

    /// Create model-level event
    pub fn on_model(model: ModelId, data: Option<Value>) -> Self {
        Self::new(model, None, data)
    }

    pub fn event_name(&self) -> &'static str {
        Self::EVENT_NAME
    }

    /// Check if the event is not scoped to a node
    pub fn is_model_level(&self) -> bool {
        self.node.is_none()
    }
}

/// Event dispatcher trait
pub trait EventDispatcher {
    /// Deliver an event; returns whether it was handled
    fn dispatch_event(&self, event: &DomEvent) -> bool;
}
