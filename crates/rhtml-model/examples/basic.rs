//! Example: Build a reactive model from a template and a parameter set

use rhtml_model::schema::{self, Declaration, DeclarationKind, ParameterSet};
use rhtml_model::template::TemplateScanner;
use rhtml_model::{EventDispatcher, ReactiveHtml};

const TEMPLATE: &str = r#"
<div id="slider-${id}" class="${css_class}">
  <input id="input-${id}" type="range" value="${value}" step="${step}"/>
  <label id="label-${id}">${name_label}</label>
</div>
"#;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut params = ParameterSet::new("Slider")
        .with(Declaration::new("value", DeclarationKind::Number).with_default(0.0))
        .with(Declaration::new("step", DeclarationKind::Number).with_default(0.1))
        .with(Declaration::new("css_class", DeclarationKind::String).with_default("slider"));
    params.set("value", 0.4);

    let scan = TemplateScanner::new().scan(TEMPLATE)?;
    let mut model = ReactiveHtml::builder()
        .html(TEMPLATE)
        .children(scan.children)
        .event("input", "change")
        .data(schema::build(&params))
        .build()?;

    model.on_dom_event(|event| println!("DOM event from {:?}: {:?}", event.node, event.data));

    println!("{}", serde_json::to_string_pretty(&model)?);

    let event = model.dom_event(Some("input"), Some(serde_json::json!({"value": 0.7})))?;
    model.dispatch_event(&event);
    model.update_data("value", serde_json::json!(0.7))?;

    Ok(())
}
