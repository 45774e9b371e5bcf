//! Dashboard configuration for restdeck.
//!
//! One TOML file describes a dashboard: engine settings under
//! `[dashboard]` plus the widget definitions as `[[widgets]]` tables.
//! Loading layers the file with `RESTDECK_`-prefixed environment
//! variables; [`DashboardFile::widgets`] then validates the entries and
//! translates them into `restdeck_core` types.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use restdeck_core::{ChartOptions, FieldSelection, RequestOptions, WidgetConfig, WidgetKind};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize dashboard: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("dashboard loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML dashboard structs ──────────────────────────────────────────

/// Top-level TOML dashboard file.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DashboardFile {
    /// Engine settings.
    #[serde(default)]
    pub dashboard: DashboardSettings,

    /// Widget definitions, in display order.
    #[serde(default)]
    pub widgets: Vec<WidgetEntry>,
}

/// The `[dashboard]` table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardSettings {
    #[serde(default = "default_title")]
    pub title: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Skip TLS certificate verification.
    #[serde(default)]
    pub insecure: bool,

    /// CORS-relay prefix prepended to a URL when a request fails before
    /// any HTTP status was received.
    pub proxy_prefix: Option<String>,

    /// Gap between two cache sweeps, in seconds.
    #[serde(default = "default_sweep")]
    pub sweep_interval_secs: u64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            timeout_secs: default_timeout(),
            insecure: false,
            proxy_prefix: None,
            sweep_interval_secs: default_sweep(),
        }
    }
}

fn default_title() -> String {
    "restdeck".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_sweep() -> u64 {
    60
}

/// One `[[widgets]]` table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WidgetEntry {
    /// Stable id; generated when omitted.
    pub id: Option<String>,

    /// Display name.
    pub name: String,

    /// Presentation: "table", "chart", or "card".
    pub kind: WidgetKind,

    /// Endpoint URL.
    pub url: String,

    /// Refresh cadence in seconds.
    #[serde(default = "default_refresh")]
    pub refresh_secs: u64,

    /// Fields to display; a widget with none renders no rows.
    #[serde(default)]
    pub fields: Vec<FieldEntry>,

    /// Request overrides (method, headers, body).
    #[serde(default)]
    pub request: RequestOptions,

    /// Chart presentation hints.
    #[serde(default)]
    pub chart: ChartOptions,
}

fn default_refresh() -> u64 {
    60
}

/// One `[[widgets.fields]]` entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldEntry {
    pub path: String,

    /// Column header / series name; the last path segment when omitted.
    pub label: Option<String>,
}

impl FieldEntry {
    pub fn to_selection(&self) -> FieldSelection {
        match &self.label {
            Some(label) => FieldSelection::labeled(self.path.clone(), label.clone()),
            None => FieldSelection::from_path(self.path.clone()),
        }
    }
}

// ── Dashboard file path ─────────────────────────────────────────────

/// Resolve the dashboard file path via XDG / platform conventions.
pub fn default_path() -> PathBuf {
    ProjectDirs::from("com", "restdeck", "restdeck").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("dashboard.toml");
            p
        },
        |dirs| dirs.config_dir().join("dashboard.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("restdeck");
    p
}

// ── Loading and saving ──────────────────────────────────────────────

/// Load the dashboard from `path` (or the default location) plus the
/// environment.
///
/// The default file may be absent, yielding an empty dashboard; an
/// explicitly requested `path` must exist.
pub fn load_dashboard(path: Option<&Path>) -> Result<DashboardFile, ConfigError> {
    let mut figment = Figment::new().merge(Serialized::defaults(DashboardFile::default()));
    figment = match path {
        Some(path) => figment.merge(Toml::file_exact(path)),
        None => figment.merge(Toml::file(default_path())),
    };

    let file: DashboardFile = figment
        .merge(Env::prefixed("RESTDECK_").split("__"))
        .extract()?;
    Ok(file)
}

/// Serialize the dashboard to TOML and write it to `path`.
pub fn save_dashboard(file: &DashboardFile, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(file)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// A starter dashboard with one widget of each kind.
pub fn sample_dashboard() -> DashboardFile {
    DashboardFile {
        dashboard: DashboardSettings {
            title: "My dashboard".to_owned(),
            ..DashboardSettings::default()
        },
        widgets: vec![
            WidgetEntry {
                id: Some("todos".to_owned()),
                name: "Open todos".to_owned(),
                kind: WidgetKind::Table,
                url: "https://jsonplaceholder.typicode.com/todos?_limit=5".to_owned(),
                refresh_secs: 60,
                fields: vec![
                    FieldEntry {
                        path: "title".to_owned(),
                        label: None,
                    },
                    FieldEntry {
                        path: "completed".to_owned(),
                        label: Some("Done".to_owned()),
                    },
                ],
                request: RequestOptions::get(),
                chart: ChartOptions::default(),
            },
            WidgetEntry {
                id: Some("prices".to_owned()),
                name: "Crypto prices (USD)".to_owned(),
                kind: WidgetKind::Chart,
                url: "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin,ethereum&vs_currencies=usd".to_owned(),
                refresh_secs: 120,
                fields: vec![
                    FieldEntry {
                        path: "bitcoin.usd".to_owned(),
                        label: Some("BTC".to_owned()),
                    },
                    FieldEntry {
                        path: "ethereum.usd".to_owned(),
                        label: Some("ETH".to_owned()),
                    },
                ],
                request: RequestOptions::get(),
                chart: ChartOptions::default(),
            },
            WidgetEntry {
                id: Some("stars".to_owned()),
                name: "rust-lang/rust stars".to_owned(),
                kind: WidgetKind::Card,
                url: "https://api.github.com/repos/rust-lang/rust".to_owned(),
                refresh_secs: 300,
                fields: vec![FieldEntry {
                    path: "stargazers_count".to_owned(),
                    label: Some("Stars".to_owned()),
                }],
                request: RequestOptions::get(),
                chart: ChartOptions::default(),
            },
        ],
    }
}

// ── Translation to engine types ─────────────────────────────────────

impl DashboardFile {
    /// Engine-level fetch settings.
    pub fn fetch_config(&self) -> restdeck_core::FetchConfig {
        restdeck_core::FetchConfig {
            timeout: Duration::from_secs(self.dashboard.timeout_secs),
            accept_invalid_certs: self.dashboard.insecure,
            proxy_prefix: self.dashboard.proxy_prefix.clone(),
            sweep_interval: Duration::from_secs(self.dashboard.sweep_interval_secs),
        }
    }

    /// Validate every widget entry and translate it to a [`WidgetConfig`].
    ///
    /// Entries without an id get a generated one; ids must be unique
    /// across the file.
    pub fn widgets(&self) -> Result<Vec<WidgetConfig>, ConfigError> {
        let mut seen = HashSet::new();
        let mut widgets = Vec::with_capacity(self.widgets.len());

        for (index, entry) in self.widgets.iter().enumerate() {
            let id = entry
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string());

            if !seen.insert(id.clone()) {
                return Err(ConfigError::Validation {
                    field: format!("widgets[{index}].id"),
                    reason: format!("duplicate widget id '{id}'"),
                });
            }
            if entry.name.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("widgets[{index}].name"),
                    reason: "must not be empty".into(),
                });
            }
            if entry.url.parse::<url::Url>().is_err() {
                return Err(ConfigError::Validation {
                    field: format!("widgets[{index}].url"),
                    reason: format!("invalid URL: {}", entry.url),
                });
            }
            if entry.refresh_secs == 0 {
                return Err(ConfigError::Validation {
                    field: format!("widgets[{index}].refresh_secs"),
                    reason: "must be at least 1 second".into(),
                });
            }

            widgets.push(WidgetConfig {
                id,
                name: entry.name.clone(),
                kind: entry.kind,
                url: entry.url.clone(),
                refresh_interval: Duration::from_secs(entry.refresh_secs),
                fields: entry.fields.iter().map(FieldEntry::to_selection).collect(),
                request: entry.request.clone(),
                chart: entry.chart.clone(),
            });
        }

        Ok(widgets)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(toml_str: &str) -> DashboardFile {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn parses_a_full_dashboard_file() {
        let file = parse(
            r#"
            [dashboard]
            title = "Ops"
            timeout_secs = 10
            proxy_prefix = "https://relay.example/fetch/"

            [[widgets]]
            id = "cpu"
            name = "CPU load"
            kind = "chart"
            url = "https://metrics.example/cpu"
            refresh_secs = 20

            [[widgets.fields]]
            path = "load.avg1"
            label = "1m"

            [widgets.chart]
            style = "line"
            color = "cyan"

            [[widgets]]
            name = "Raw feed"
            kind = "table"
            url = "https://metrics.example/feed"
            "#,
        );

        assert_eq!(file.dashboard.title, "Ops");
        let fetch = file.fetch_config();
        assert_eq!(fetch.timeout, Duration::from_secs(10));
        assert_eq!(
            fetch.proxy_prefix.as_deref(),
            Some("https://relay.example/fetch/")
        );

        let widgets = file.widgets().unwrap();
        assert_eq!(widgets.len(), 2);

        assert_eq!(widgets[0].id, "cpu");
        assert_eq!(widgets[0].kind, WidgetKind::Chart);
        assert_eq!(widgets[0].refresh_interval, Duration::from_secs(20));
        assert_eq!(widgets[0].fields[0].label, "1m");
        assert_eq!(widgets[0].chart.color.as_deref(), Some("cyan"));

        // The second entry gets a generated id and the default cadence.
        assert!(!widgets[1].id.is_empty());
        assert_ne!(widgets[1].id, widgets[0].id);
        assert_eq!(widgets[1].refresh_interval, Duration::from_secs(60));
    }

    #[test]
    fn field_labels_default_to_the_leaf_segment() {
        let entry = FieldEntry {
            path: "price.usd".to_owned(),
            label: None,
        };
        assert_eq!(entry.to_selection().label, "usd");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let file = parse(
            r#"
            [[widgets]]
            id = "a"
            name = "One"
            kind = "card"
            url = "https://example.com/one"

            [[widgets]]
            id = "a"
            name = "Two"
            kind = "card"
            url = "https://example.com/two"
            "#,
        );

        let err = file.widgets().unwrap_err();
        assert!(err.to_string().contains("duplicate widget id 'a'"));
    }

    #[test]
    fn zero_refresh_is_rejected() {
        let file = parse(
            r#"
            [[widgets]]
            name = "One"
            kind = "card"
            url = "https://example.com/one"
            refresh_secs = 0
            "#,
        );

        assert!(file.widgets().is_err());
    }

    #[test]
    fn bad_urls_are_rejected() {
        let file = parse(
            r#"
            [[widgets]]
            name = "One"
            kind = "card"
            url = "not a url"
            "#,
        );

        let err = file.widgets().unwrap_err();
        assert!(err.to_string().contains("invalid URL"));
    }

    #[test]
    fn sample_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dashboard.toml");

        save_dashboard(&sample_dashboard(), &path).unwrap();
        let loaded = load_dashboard(Some(&path)).unwrap();

        assert_eq!(loaded.dashboard.title, "My dashboard");
        let widgets = loaded.widgets().unwrap();
        assert_eq!(widgets.len(), 3);
        assert_eq!(widgets[1].kind, WidgetKind::Chart);
        assert_eq!(widgets[1].fields[0].label, "BTC");
    }

    #[test]
    fn an_explicitly_requested_file_must_exist() {
        assert!(load_dashboard(Some(Path::new("/nonexistent/dashboard.toml"))).is_err());
    }
}
