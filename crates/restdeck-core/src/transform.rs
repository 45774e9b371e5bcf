// Row shaping: map a raw response plus the selected fields onto flat
// display rows.

use serde_json::{Map, Value};

use crate::model::field::FieldSelection;
use crate::model::widget::WidgetKind;
use crate::path;

/// One display row: label -> cell, in selection order.
pub type Row = Map<String, Value>;

/// Shape `data` into rows for a widget.
///
/// Branches, in priority order:
/// 1. no selected fields -> no rows;
/// 2. an array response -> one row per element, fields resolved against
///    each element, absent paths filling in as null;
/// 3. a single object on a chart with more than one field -> pivoted into
///    `{name, value}` pairs with numeric coercion;
/// 4. anything else -> exactly one row.
pub fn rows(data: &Value, fields: &[FieldSelection], kind: WidgetKind) -> Vec<Row> {
    if fields.is_empty() {
        return Vec::new();
    }

    match data {
        Value::Array(items) => items.iter().map(|item| row_of(item, fields)).collect(),
        Value::Object(_) if kind == WidgetKind::Chart && fields.len() > 1 => {
            fields.iter().map(|field| pivot_row(data, field)).collect()
        }
        _ => vec![row_of(data, fields)],
    }
}

fn row_of(item: &Value, fields: &[FieldSelection]) -> Row {
    let mut row = Row::new();
    for field in fields {
        let cell = path::resolve(item, &field.path)
            .cloned()
            .unwrap_or(Value::Null);
        row.insert(field.label.clone(), cell);
    }
    row
}

/// One `{name, value}` pair for the single-object chart pivot.
fn pivot_row(data: &Value, field: &FieldSelection) -> Row {
    let mut row = Row::new();
    row.insert("name".to_owned(), Value::String(field.label.clone()));
    row.insert(
        "value".to_owned(),
        numeric_cell(path::resolve(data, &field.path)),
    );
    row
}

/// Coerce a chart cell to a number: numbers pass through unchanged,
/// numeric strings parse as f64, everything else (including non-finite
/// parses) becomes 0.
fn numeric_cell(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Number(n)) => Value::Number(n.clone()),
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => serde_json::Number::from_f64(n)
                .map_or_else(|| Value::Number(0.into()), Value::Number),
            _ => Value::Number(0.into()),
        },
        _ => Value::Number(0.into()),
    }
}
