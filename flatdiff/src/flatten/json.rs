//! JSON value flattening.

use indexmap::IndexMap;
use serde_json::Value;

/// A flattened JSON document: path to textual leaf value, in document order.
pub type FlatScalars = IndexMap<String, String>;

/// Flattens a JSON value into a path-keyed map of scalar leaves.
///
/// Object members extend the path with `.key` (`key` at the top level),
/// array elements with `[index]`. Every scalar is stored as text, so values
/// compare as strings: `1` and `1.0` are different. Empty objects and arrays
/// contribute no entries.
pub fn flatten_json(value: &Value) -> FlatScalars {
    let mut items = FlatScalars::new();
    visit(value, String::new(), &mut items);
    items
}

fn visit(value: &Value, path: String, items: &mut FlatScalars) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                visit(child, child_path, items);
            }
        }
        Value::Array(values) => {
            for (index, child) in values.iter().enumerate() {
                visit(child, format!("{}[{}]", path, index), items);
            }
        }
        scalar => {
            items.insert(path, scalar_text(scalar));
        }
    }
}

/// Textual form of a scalar: strings unquoted, everything else as JSON.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
