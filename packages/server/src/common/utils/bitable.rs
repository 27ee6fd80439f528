//! Flattening of bitable cell values.
//!
//! Lark returns cells in several shapes depending on the column type:
//! plain strings (single select, phone), rich-text segment arrays
//! (`[{"type":"text","text":".."}]`), url objects (`{"link","text"}`),
//! person arrays (`[{"name","email"}]`, rendered as their email), and
//! formula/lookup wrappers (`{"type":1,"value":[..]}`).

use serde_json::{Map, Value};

/// Render a cell as plain text. Empty and whitespace-only cells are `None`.
pub fn field_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(segment) => object_text(segment),
                other => field_text(other),
            })
            .collect::<String>(),
        Value::Object(map) => object_text(map)?,
    };

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Like [`field_text`], but prefers the target of a hyperlink cell or segment.
pub fn field_link(value: &Value) -> Option<String> {
    let link = match value {
        Value::Object(map) => map
            .get("value")
            .and_then(field_link)
            .or_else(|| non_empty_str(map.get("link"))),
        Value::Array(items) => items.iter().find_map(|item| match item {
            Value::Object(segment) => non_empty_str(segment.get("link")),
            _ => None,
        }),
        _ => None,
    };
    link.map(|l| l.trim().to_string())
        .or_else(|| field_text(value))
}

/// Look up a column by name and render it as text.
pub fn record_text(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields.get(name).and_then(field_text)
}

/// Look up a column by name, preferring link targets.
pub fn record_link(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields.get(name).and_then(field_link)
}

fn object_text(map: &Map<String, Value>) -> Option<String> {
    if let Some(inner) = map.get("value") {
        return field_text(inner);
    }
    ["text", "email", "name", "link"]
        .iter()
        .find_map(|key| non_empty_str(map.get(*key)))
}

// Segment text keeps its surrounding spaces; only the joined cell is trimmed.
fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
