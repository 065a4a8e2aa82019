//! Integration tests - Markup and parameters to a reactive model
//!
//! Tests the full construction path: HTML → bindings, parameters → data model,
//! DOM events → handlers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rhtml_model::schema::{self, Declaration, DeclarationKind, ParameterSet};
use rhtml_model::template::{self, AttrBinding, AttrBindings, TemplateScanner};
use rhtml_model::{DomEvent, EventDispatcher, LayoutModel, ModelError, ReactiveHtml};
use serde_json::json;

const TEMPLATE: &str = r#"
<div id="container-${id}" class="${css_class}" style="${model.style}">
  <input id="slider-${id}" type="range" value="${value}" max="${max}"/>
  <span id="label-${id}">${label}</span>
  <button id="reset-${id}">Reset</button>
</div>
"#;

fn counter_params() -> ParameterSet {
    ParameterSet::new("Counter")
        .with(Declaration::new("value", DeclarationKind::Integer).with_default(0))
        .with(Declaration::new("max", DeclarationKind::Integer).with_default(10))
        .with(Declaration::new("css_class", DeclarationKind::String).with_default(""))
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

#[test]
fn test_attrs_derived_when_absent() {
    let model = ReactiveHtml::builder().html(TEMPLATE).build().unwrap();
    assert_eq!(model.attrs(), &template::scan(TEMPLATE).unwrap());
    assert_eq!(model.attrs()["container"], vec![AttrBinding::new("class", "css_class")]);
    assert_eq!(
        model.attrs()["slider"],
        vec![AttrBinding::new("value", "value"), AttrBinding::new("max", "max")]
    );
    assert_eq!(model.html(), TEMPLATE);
}

#[test]
fn test_explicit_attrs_not_rescanned() {
    let mut attrs = AttrBindings::new();
    attrs.insert("custom".into(), vec![AttrBinding::new("href", "url")]);

    let model = ReactiveHtml::builder()
        .html(TEMPLATE)
        .attrs(attrs.clone())
        .build()
        .unwrap();
    assert_eq!(model.attrs(), &attrs);
}

#[test]
fn test_children_not_derived() {
    let model = ReactiveHtml::from_html(TEMPLATE).unwrap();
    assert!(model.children().is_empty());

    // The scanner does find them; wiring them is up to the caller
    let scan = TemplateScanner::new().scan(TEMPLATE).unwrap();
    let model = ReactiveHtml::builder()
        .html(TEMPLATE)
        .children(scan.children)
        .build()
        .unwrap();
    assert_eq!(model.children()["label"], "label");
}

#[test]
fn test_without_html() {
    let model = ReactiveHtml::builder().build().unwrap();
    assert!(model.attrs().is_empty());
    assert_eq!(model.html(), "");
    assert!(model.data().is_none());
    assert!(model.nodes().is_empty());
}

#[test]
fn test_malformed_html_fails_construction() {
    let result = ReactiveHtml::from_html(r#"<div id="box-${id}" title="${x}"#);
    assert!(matches!(result, Err(ModelError::Scan(_))));

    let result = ReactiveHtml::from_html("<div>x</div><!-- never closed");
    assert!(matches!(result, Err(ModelError::Scan(_))));
}

#[test]
fn test_duplicate_id_derives_last_value() {
    let html = r#"<div id="plain" id="box-${id}" title="${foo}"></div>"#;
    let model = ReactiveHtml::from_html(html).unwrap();
    assert_eq!(model.attrs()["box"], vec![AttrBinding::new("title", "foo")]);
    assert!(model.nodes().contains("box"));
}

#[test]
fn test_other_properties_pass_through() {
    let model = ReactiveHtml::builder()
        .html(TEMPLATE)
        .event("reset", "click")
        .event("slider", "change")
        .callback("reset", "click", "data.value = 0")
        .script("render", "state.ready = true")
        .script("value", "label.innerText = data.value")
        .child("label", "label")
        .build()
        .unwrap();

    assert_eq!(model.events()["reset"], vec!["click"]);
    assert_eq!(
        model.callbacks()["reset"],
        vec![("click".to_string(), "data.value = 0".to_string())]
    );
    assert_eq!(model.scripts().len(), 2);
    assert_eq!(model.scripts()[0].0, "render");
    assert_eq!(model.children()["label"], "label");
    assert!(model.is_subscribed("slider", "change"));
    assert!(!model.is_subscribed("slider", "click"));
    assert!(!model.is_subscribed("missing", "click"));
}

// ============================================================================
// DATA MODEL
// ============================================================================

#[test]
fn test_data_from_parameters() {
    let mut params = counter_params();
    params.set("value", 4);

    let model = ReactiveHtml::builder()
        .html(TEMPLATE)
        .data(schema::build(&params))
        .build()
        .unwrap();

    let data = model.data().unwrap();
    assert_eq!(data.name(), "Counter");
    assert_eq!(data.get("value"), Some(&json!(4)));
    assert_eq!(data.get("max"), Some(&json!(10)));
    assert!(data.get("name").is_none());
}

#[test]
fn test_update_data_from_dom() {
    let mut model = ReactiveHtml::builder()
        .data(schema::build(&counter_params()))
        .build()
        .unwrap();

    assert_eq!(model.update_data("value", json!(3)).unwrap(), json!(0));
    assert!(matches!(
        model.update_data("value", json!("three")),
        Err(ModelError::Schema(_))
    ));

    let mut empty = ReactiveHtml::builder().build().unwrap();
    assert!(matches!(empty.update_data("value", json!(1)), Err(ModelError::NoData)));
}

// ============================================================================
// NESTED MODELS
// ============================================================================

#[test]
fn test_nested_models() {
    let inner: Arc<dyn LayoutModel> =
        Arc::new(ReactiveHtml::from_html(r#"<p id="text-${id}">${text}</p>"#).unwrap());
    let inner_id = inner.id();

    let outer = ReactiveHtml::builder()
        .html(r#"<div id="body-${id}">${content}</div>"#)
        .model("body", inner)
        .build()
        .unwrap();

    assert_eq!(outer.models()["body"].len(), 1);
    assert_eq!(outer.models()["body"][0].model_type(), "ReactiveHTML");
    assert_ne!(outer.id(), inner_id);

    let json = serde_json::to_value(&outer).unwrap();
    assert_eq!(json["models"]["body"], json!([inner_id]));
    assert_eq!(json["attrs"], json!({}));
}

// ============================================================================
// DOM EVENTS
// ============================================================================

#[test]
fn test_dom_event_node_checked() {
    let model = ReactiveHtml::from_html(TEMPLATE).unwrap();

    let event = model.dom_event(Some("reset"), Some(json!({"type": "click"}))).unwrap();
    assert_eq!(event.model, model.id());
    assert_eq!(event.node.as_deref(), Some("reset"));

    let global = model.dom_event(None, None).unwrap();
    assert!(global.is_model_level());

    assert!(matches!(
        model.dom_event(Some("nowhere"), None),
        Err(ModelError::UnknownNode(node)) if node == "nowhere"
    ));
}

#[test]
fn test_dispatch_to_handlers() {
    let mut model = ReactiveHtml::from_html(TEMPLATE).unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let count = Arc::new(AtomicUsize::new(0));

    let sink = Arc::clone(&seen);
    model.on_dom_event(move |event| sink.lock().unwrap().push(event.node.clone()));
    let counter = Arc::clone(&count);
    model.on_dom_event(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let click = model.dom_event(Some("reset"), Some(json!({"type": "click"}))).unwrap();
    assert!(model.dispatch_event(&click));
    assert!(model.dispatch_event(&model.dom_event(None, None).unwrap()));

    assert_eq!(*seen.lock().unwrap(), vec![Some("reset".to_string()), None]);
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn test_dispatch_ignores_foreign_events() {
    let mut model = ReactiveHtml::from_html(TEMPLATE).unwrap();
    let other = ReactiveHtml::from_html(TEMPLATE).unwrap();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    model.on_dom_event(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let foreign = DomEvent::on_model(other.id(), None);
    assert!(!model.dispatch_event(&foreign));
    assert_eq!(count.load(Ordering::SeqCst), 0);

    // No handlers registered: delivered but unhandled
    assert!(!other.dispatch_event(&foreign));
}

#[test]
fn test_serialized_model() {
    let model = ReactiveHtml::builder()
        .html(r#"<div id="box-${id}" title="${foo}">${bar}</div>"#)
        .data(schema::build(&counter_params()))
        .event("box", "click")
        .build()
        .unwrap();

    let json = serde_json::to_value(&model).unwrap();
    assert_eq!(json["attrs"]["box"], json!([{"attr": "title", "expr": "foo"}]));
    assert_eq!(json["events"]["box"], json!(["click"]));
    assert_eq!(json["data"], json!({"value": 0, "max": 10, "css_class": ""}));
    assert_eq!(json["children"], json!({}));
    assert_eq!(json["scripts"], json!([]));
}
