//! Placeholder Syntax
//!
//! `${expr}` placeholders and the `-${id}` marker that opts an element in.

use once_cell::sync::Lazy;
use regex::Regex;

/// Suffix an element `id` must end with to be managed
pub const ID_MARKER: &str = "-${id}";

/// Expressions referring to the model itself, resolved outside the template
pub const MODEL_PREFIX: &str = "model.";

/// `${` at the start and `}` closing the value; a `$` anchor also admits one trailing newline
static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A\$\{.+\}\n?\z").unwrap());

/// Check whether a value is, in its entirety, a single placeholder
pub fn is_placeholder(value: &str) -> bool {
    PLACEHOLDER_RE.is_match(value)
}

/// Inner expression of a placeholder value.
///
/// Strips the two-byte opener and the final byte, so `${a}\n` yields `a}`.
/// Consumers of the bindings rely on these fixed offsets.
pub fn placeholder_expr(value: &str) -> Option<&str> {
    if !is_placeholder(value) {
        return None;
    }
    Some(&value[2..value.len() - 1])
}

/// Expression an attribute value binds to, if it is a bindable placeholder
pub fn binding_expr(value: &str) -> Option<&str> {
    placeholder_expr(value).filter(|expr| !expr.starts_with(MODEL_PREFIX))
}

/// Node name for a managed element id: every dash-separated segment but the last
pub fn node_name(dom_id: &str) -> Option<&str> {
    if !dom_id.ends_with(ID_MARKER) {
        return None;
    }
    dom_id.rsplit_once('-').map(|(name, _)| name)
}
