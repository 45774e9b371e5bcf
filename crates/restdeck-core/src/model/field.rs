// ── Field types: discovered descriptors and persisted selections ──

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// JSON type of a value, as shown while picking fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Classify a JSON value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

/// One addressable field discovered inside a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Dot/bracket path from the response root (element-relative for
    /// array responses).
    pub path: String,
    /// Display label: the last path segment.
    pub label: String,
    pub kind: ValueKind,
    /// Short rendering of the value found at this path.
    pub preview: String,
}

/// A field the user chose to display on a widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelection {
    pub path: String,
    /// Column header / chart series name.
    pub label: String,
    /// Kind recorded at selection time, as a presentation hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValueKind>,
}

impl FieldSelection {
    /// Selection with the label defaulted from the path's leaf segment.
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let label = leaf_label(&path);
        Self {
            path,
            label,
            kind: None,
        }
    }

    /// Selection with an explicit label.
    pub fn labeled(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            kind: None,
        }
    }
}

/// The last dot segment of a path, used as a default label.
///
/// An empty path (the whole-response selection) labels as `value`.
pub fn leaf_label(path: &str) -> String {
    let leaf = path.rsplit('.').next().unwrap_or(path);
    if leaf.is_empty() {
        "value".to_owned()
    } else {
        leaf.to_owned()
    }
}
