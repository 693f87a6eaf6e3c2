//! Coercion of arbitrary JSON payloads into conversation text.

use serde_json::Value;

/// Turn any JSON value into the text handed to a session.
///
/// `null` becomes the empty string and strings pass through untouched.
/// Everything else is rendered as compact JSON (`123` → `"123"`, `[]` → `"[]"`).
pub fn coerce_input(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
