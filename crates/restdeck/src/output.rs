//! Output formatting utilities.
//!
//! Renders command results in the format selected by `--output`. Tables
//! use `tabled`; widget rows get their columns from the data itself, so
//! those tables are built dynamically. Structured formats go through
//! serde, and `plain` emits tab-separated values for piping.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use restdeck_core::{FieldDescriptor, Row};

use crate::cli::{ColorMode, OutputFormat};

// ── Color handling ───────────────────────────────────────────────────

/// Determine whether output should be colorized.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Per-widget section header for streamed updates.
pub fn section_header(name: &str, timestamp: &str, color: bool) -> String {
    if color {
        format!("{} {}", format!("── {name} ──").bold(), timestamp.dimmed())
    } else {
        format!("── {name} ── {timestamp}")
    }
}

/// Failure line for streamed updates.
pub fn error_line(message: &str, color: bool) -> String {
    if color {
        message.red().to_string()
    } else {
        message.to_owned()
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render shaped widget rows in the chosen format.
pub fn render_rows(format: OutputFormat, rows: &[Row]) -> String {
    match format {
        OutputFormat::Table => rows_table(rows),
        OutputFormat::Json => render_json_pretty(rows),
        OutputFormat::JsonCompact => render_json_compact(rows),
        OutputFormat::Yaml => render_yaml(rows),
        OutputFormat::Plain => rows
            .iter()
            .map(|row| row.values().map(cell_text).collect::<Vec<_>>().join("\t"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Render the field list discovered by a probe.
pub fn render_fields(format: OutputFormat, fields: &[FieldDescriptor]) -> String {
    match format {
        OutputFormat::Table => {
            let rows: Vec<FieldRow> = fields.iter().map(FieldRow::from).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json_pretty(fields),
        OutputFormat::JsonCompact => render_json_compact(fields),
        OutputFormat::Yaml => render_yaml(fields),
        OutputFormat::Plain => fields
            .iter()
            .map(|field| field.path.clone())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Render a raw JSON value (`probe --show-data`).
pub fn render_value(format: OutputFormat, value: &Value) -> String {
    match format {
        OutputFormat::Table | OutputFormat::Json => render_json_pretty(value),
        OutputFormat::JsonCompact => render_json_compact(value),
        OutputFormat::Yaml => render_yaml(value),
        OutputFormat::Plain => cell_text(value),
    }
}

/// Print rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Table building ───────────────────────────────────────────────────

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Preview")]
    preview: String,
}

impl From<&FieldDescriptor> for FieldRow {
    fn from(field: &FieldDescriptor) -> Self {
        Self {
            path: field.path.clone(),
            kind: field.kind.to_string(),
            preview: field.preview.clone(),
        }
    }
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Build a table whose columns are the union of row keys, in the order
/// keys first appear.
fn rows_table(rows: &[Row]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut builder = Builder::default();
    builder.push_record(columns.iter().copied());
    for row in rows {
        builder.push_record(
            columns
                .iter()
                .map(|column| row.get(*column).map_or_else(String::new, cell_text)),
        );
    }
    builder.build().with(Style::rounded()).to_string()
}

/// A cell's text: strings bare, null empty, everything else as JSON.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

pub fn render_json_compact<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).expect("serialization should not fail")
}

pub fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}
