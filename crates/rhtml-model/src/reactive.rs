//! Reactive HTML Model
//!
//! The object handed to the rendering boundary: template markup, its
//! bindings, DOM subscriptions, scripts, nested models and the data model.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use rhtml_schema::DataModel;
use rhtml_template::{AttrBindings, ChildBindings, ScanOptions, TemplateScanner};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;

use crate::ModelError;
use crate::event::{DomEvent, EventDispatcher, ModelId};
use crate::layout::LayoutModel;

/// (event, handler expression) pairs keyed by node
pub type Callbacks = BTreeMap<String, Vec<(String, String)>>;

/// DOM event names to subscribe to, keyed by node
pub type Events = BTreeMap<String, Vec<String>>;

/// Nested models keyed by node
pub type Models = BTreeMap<String, Vec<Arc<dyn LayoutModel>>>;

/// (trigger, code) pairs
pub type Scripts = Vec<(String, String)>;

type DomEventHandler = Box<dyn Fn(&DomEvent) + Send + Sync>;

/// Reactive HTML model
pub struct ReactiveHtml {
    id: ModelId,
    attrs: AttrBindings,
    callbacks: Callbacks,
    children: ChildBindings,
    data: Option<DataModel>,
    events: Events,
    html: String,
    models: Models,
    scripts: Scripts,
    scanned_nodes: Vec<String>,
    handlers: Vec<DomEventHandler>,
}

impl ReactiveHtml {
    pub const MODEL_TYPE: &'static str = "ReactiveHTML";

    pub fn builder() -> ReactiveHtmlBuilder {
        ReactiveHtmlBuilder::default()
    }

    /// Create a model from markup alone, deriving its attribute bindings
    pub fn from_html(html: impl Into<String>) -> Result<Self, ModelError> {
        Self::builder().html(html).build()
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    pub fn attrs(&self) -> &AttrBindings {
        &self.attrs
    }

    pub fn callbacks(&self) -> &Callbacks {
        &self.callbacks
    }

    pub fn children(&self) -> &ChildBindings {
        &self.children
    }

    pub fn data(&self) -> Option<&DataModel> {
        self.data.as_ref()
    }

    pub fn events(&self) -> &Events {
        &self.events
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn models(&self) -> &Models {
        &self.models
    }

    pub fn scripts(&self) -> &Scripts {
        &self.scripts
    }

    /// Every node this model knows: scanned nodes and keys of node-keyed properties
    pub fn nodes(&self) -> BTreeSet<&str> {
        self.scanned_nodes
            .iter()
            .map(String::as_str)
            .chain(self.attrs.keys().map(String::as_str))
            .chain(self.callbacks.keys().map(String::as_str))
            .chain(self.children.keys().map(String::as_str))
            .chain(self.events.keys().map(String::as_str))
            .chain(self.models.keys().map(String::as_str))
            .collect()
    }

    /// Check whether the DOM should report `event` on `node`
    pub fn is_subscribed(&self, node: &str, event: &str) -> bool {
        self.events
            .get(node)
            .is_some_and(|names| names.iter().any(|name| name == event))
    }

    /// Apply a data change coming back from the DOM side
    pub fn update_data(&mut self, field: &str, value: Value) -> Result<Value, ModelError> {
        let data = self.data.as_mut().ok_or(ModelError::NoData)?;
        Ok(data.set(field, value)?)
    }

    /// Create an event owned by this model.
    ///
    /// A node, if given, must be one this model knows.
    pub fn dom_event(
        &self,
        node: Option<&str>,
        data: Option<Value>,
    ) -> Result<DomEvent, ModelError> {
        if let Some(node) = node {
            if !self.nodes().contains(node) {
                return Err(ModelError::UnknownNode(node.to_string()));
            }
        }
        Ok(DomEvent::new(self.id, node.map(str::to_string), data))
    }

    /// Register a handler for events owned by this model
    pub fn on_dom_event<F>(&mut self, handler: F)
    where
        F: Fn(&DomEvent) + Send + Sync + 'static,
    {
        self.handlers.push(Box::new(handler));
    }
}

impl EventDispatcher for ReactiveHtml {
    fn dispatch_event(&self, event: &DomEvent) -> bool {
        if event.model != self.id {
            tracing::trace!("Ignoring event for model {:?} on {:?}", event.model, self.id);
            return false;
        }
        tracing::debug!(
            "Dispatching {} on {:?} (node: {:?}) to {} handlers",
            event.event_name(),
            self.id,
            event.node,
            self.handlers.len()
        );
        for handler in &self.handlers {
            handler(event);
        }
        !self.handlers.is_empty()
    }
}

impl LayoutModel for ReactiveHtml {
    fn id(&self) -> ModelId {
        self.id
    }

    fn model_type(&self) -> &str {
        Self::MODEL_TYPE
    }
}

impl fmt::Debug for ReactiveHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveHtml")
            .field("id", &self.id)
            .field("attrs", &self.attrs)
            .field("callbacks", &self.callbacks)
            .field("children", &self.children)
            .field("data", &self.data)
            .field("events", &self.events)
            .field("html", &self.html)
            .field("models", &self.models)
            .field("scripts", &self.scripts)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl Serialize for ReactiveHtml {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Nested models go out as references
        let models: BTreeMap<&str, Vec<ModelId>> = self
            .models
            .iter()
            .map(|(node, models)| (node.as_str(), models.iter().map(|m| m.id()).collect()))
            .collect();

        let mut state = serializer.serialize_struct("ReactiveHtml", 9)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("attrs", &self.attrs)?;
        state.serialize_field("callbacks", &self.callbacks)?;
        state.serialize_field("children", &self.children)?;
        state.serialize_field("data", &self.data)?;
        state.serialize_field("events", &self.events)?;
        state.serialize_field("html", &self.html)?;
        state.serialize_field("models", &models)?;
        state.serialize_field("scripts", &self.scripts)?;
        state.end()
    }
}

/// Property bag for [`ReactiveHtml`]
#[derive(Debug, Default)]
pub struct ReactiveHtmlBuilder {
    html: Option<String>,
    attrs: Option<AttrBindings>,
    callbacks: Callbacks,
    children: ChildBindings,
    data: Option<DataModel>,
    events: Events,
    models: Models,
    scripts: Scripts,
    scan_options: ScanOptions,
}

impl ReactiveHtmlBuilder {
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Explicit attribute bindings; the markup is then not scanned
    pub fn attrs(mut self, attrs: AttrBindings) -> Self {
        self.attrs = Some(attrs);
        self
    }

    pub fn callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn callback(
        mut self,
        node: impl Into<String>,
        event: impl Into<String>,
        handler: impl Into<String>,
    ) -> Self {
        self.callbacks
            .entry(node.into())
            .or_default()
            .push((event.into(), handler.into()));
        self
    }

    pub fn children(mut self, children: ChildBindings) -> Self {
        self.children = children;
        self
    }

    pub fn child(mut self, node: impl Into<String>, expr: impl Into<String>) -> Self {
        self.children.insert(node.into(), expr.into());
        self
    }

    pub fn data(mut self, data: DataModel) -> Self {
        self.data = Some(data);
        self
    }

    pub fn events(mut self, events: Events) -> Self {
        self.events = events;
        self
    }

    pub fn event(mut self, node: impl Into<String>, event: impl Into<String>) -> Self {
        self.events.entry(node.into()).or_default().push(event.into());
        self
    }

    pub fn models(mut self, models: Models) -> Self {
        self.models = models;
        self
    }

    pub fn model(mut self, node: impl Into<String>, model: Arc<dyn LayoutModel>) -> Self {
        self.models.entry(node.into()).or_default().push(model);
        self
    }

    pub fn scripts(mut self, scripts: Scripts) -> Self {
        self.scripts = scripts;
        self
    }

    pub fn script(mut self, trigger: impl Into<String>, code: impl Into<String>) -> Self {
        self.scripts.push((trigger.into(), code.into()));
        self
    }

    /// Options for the scan that derives attribute bindings
    pub fn scan_options(mut self, options: ScanOptions) -> Self {
        self.scan_options = options;
        self
    }

    /// Finalize the model, scanning `html` for attribute bindings if none were given
    pub fn build(self) -> Result<ReactiveHtml, ModelError> {
        let mut scanned_nodes = Vec::new();
        let attrs = match (self.attrs, &self.html) {
            (Some(attrs), _) => attrs,
            (None, Some(html)) => {
                let scan = TemplateScanner::with_options(self.scan_options).scan(html)?;
                scanned_nodes = scan.nodes;
                scan.attrs
            }
            (None, None) => AttrBindings::new(),
        };

        let model = ReactiveHtml {
            id: ModelId::next(),
            attrs,
            callbacks: self.callbacks,
            children: self.children,
            data: self.data,
            events: self.events,
            html: self.html.unwrap_or_default(),
            models: self.models,
            scripts: self.scripts,
            scanned_nodes,
            handlers: Vec::new(),
        };
        tracing::debug!(
            "Created {} {:?} with {} bound nodes",
            ReactiveHtml::MODEL_TYPE,
            model.id,
            model.attrs.len()
        );
        Ok(model)
    }
}
