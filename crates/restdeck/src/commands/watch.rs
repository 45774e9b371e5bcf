//! `watch` command: run the whole dashboard and stream updates.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use restdeck_config::DashboardFile;
use restdeck_core::{Fetcher, RefreshScheduler, Row, UpdatePayload, WidgetUpdate};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::util;

/// One update, shaped for the structured output formats.
#[derive(Serialize)]
struct UpdateLine<'a> {
    widget: &'a str,
    name: &'a str,
    at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<&'a [Row]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl<'a> UpdateLine<'a> {
    fn of(update: &'a WidgetUpdate, name: &'a str) -> Self {
        let (rows, error) = match &update.payload {
            UpdatePayload::Rows { rows, .. } => (Some(rows.as_slice()), None),
            UpdatePayload::Error { message } => (None, Some(message.as_str())),
        };
        Self { widget: &update.widget_id, name, at: update.fetched_at, rows, error }
    }
}

pub async fn handle(
    fetcher: Arc<Fetcher>,
    file: &DashboardFile,
    args: &WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let widgets = file.widgets()?;
    if widgets.is_empty() {
        return Err(CliError::EmptyDashboard {
            path: util::dashboard_path(global).display().to_string(),
        });
    }

    let names: HashMap<String, String> =
        widgets.iter().map(|w| (w.id.clone(), w.name.clone())).collect();

    let (scheduler, mut updates) = RefreshScheduler::new(fetcher);
    for widget in widgets {
        tracing::debug!(id = %widget.id, url = %widget.url, "scheduling widget");
        scheduler.schedule(widget).await?;
    }

    let color = output::should_color(global.color);
    let mut seen: u64 = 0;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            update = updates.recv() => {
                let Some(update) = update else { break };
                print_update(&update, &names, global, color);
                seen += 1;
                if args.limit.is_some_and(|limit| seen >= limit) {
                    break;
                }
            }
        }
    }

    scheduler.shutdown().await;
    Ok(())
}

fn print_update(
    update: &WidgetUpdate,
    names: &HashMap<String, String>,
    global: &GlobalOpts,
    color: bool,
) {
    let name = names.get(&update.widget_id).map_or(update.widget_id.as_str(), String::as_str);

    let rendered = match global.output {
        OutputFormat::Table => render_section(update, name, color),
        OutputFormat::Plain => render_plain(update),
        OutputFormat::Json | OutputFormat::JsonCompact => {
            output::render_json_compact(&UpdateLine::of(update, name))
        }
        OutputFormat::Yaml => output::render_yaml(&UpdateLine::of(update, name)),
    };
    output::print_output(&rendered, global.quiet);
}

fn render_section(update: &WidgetUpdate, name: &str, color: bool) -> String {
    let timestamp = update.fetched_at.format("%H:%M:%S").to_string();
    let body = match &update.payload {
        UpdatePayload::Rows { rows, .. } => output::render_rows(OutputFormat::Table, rows),
        UpdatePayload::Error { message } => output::error_line(message, color),
    };
    format!("{}\n{body}", output::section_header(name, &timestamp, color))
}

/// Plain mode: every line prefixed with the widget id, for grepping.
fn render_plain(update: &WidgetUpdate) -> String {
    let body = match &update.payload {
        UpdatePayload::Rows { rows, .. } => output::render_rows(OutputFormat::Plain, rows),
        UpdatePayload::Error { message } => message.clone(),
    };
    body.lines()
        .map(|line| format!("{}\t{line}", update.widget_id))
        .collect::<Vec<_>>()
        .join("\n")
}
