// Response shape discovery: enumerate the addressable fields of a JSON
// value without any schema.

use serde_json::{Map, Value};

use crate::model::field::{FieldDescriptor, ValueKind};

const PREVIEW_MAX_CHARS: usize = 40;

/// Walk `value` and list every addressable field, descending at most
/// `max_depth` object levels.
///
/// Arrays are assumed homogeneous: the key's own descriptor announces the
/// array (`Array(N)` preview) and only the first element is descended
/// into. A root-level array is explored through its first element with
/// element-relative paths, matching how selections are resolved against
/// each element later.
pub fn explore(value: &Value, max_depth: usize) -> Vec<FieldDescriptor> {
    let mut found = Vec::new();
    match value {
        Value::Object(map) => walk_object(map, "", 0, max_depth, &mut found),
        Value::Array(items) => {
            if let Some(Value::Object(first)) = items.first() {
                walk_object(first, "", 0, max_depth, &mut found);
            }
        }
        _ => {}
    }
    found
}

fn walk_object(
    map: &Map<String, Value>,
    prefix: &str,
    depth: usize,
    max_depth: usize,
    found: &mut Vec<FieldDescriptor>,
) {
    for (key, child) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        found.push(descriptor(&path, key, child));
        descend(child, &path, depth + 1, max_depth, found);
    }
}

fn descend(
    value: &Value,
    path: &str,
    depth: usize,
    max_depth: usize,
    found: &mut Vec<FieldDescriptor>,
) {
    if depth >= max_depth {
        return;
    }
    match value {
        Value::Object(map) => walk_object(map, path, depth, max_depth, found),
        Value::Array(items) => {
            let Some(first) = items.first() else { return };
            let sample = format!("{path}[0]");
            if let Value::Object(map) = first {
                walk_object(map, &sample, depth, max_depth, found);
            } else {
                // Scalar or nested-array element: one addressable sample.
                found.push(descriptor(&sample, &sample, first));
            }
        }
        _ => {}
    }
}

fn descriptor(path: &str, label: &str, value: &Value) -> FieldDescriptor {
    FieldDescriptor {
        path: path.to_owned(),
        label: label.to_owned(),
        kind: ValueKind::of(value),
        preview: preview_of(value),
    }
}

/// Short rendering of a value for the field picker.
fn preview_of(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => truncate(s),
        Value::Array(items) => format!("Array({})", items.len()),
        Value::Object(map) => format!("Object({})", map.len()),
    }
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= PREVIEW_MAX_CHARS {
        s.to_owned()
    } else {
        let head: String = s.chars().take(PREVIEW_MAX_CHARS).collect();
        format!("{head}...")
    }
}
