// ── Widget descriptors: the units a dashboard is assembled from ──

use std::time::Duration;

use restdeck_api::RequestOptions;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::field::FieldSelection;

/// How a widget presents its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WidgetKind {
    Table,
    Chart,
    Card,
}

/// Chart rendering style.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChartStyle {
    #[default]
    Bar,
    Line,
}

/// Chart presentation hints, carried through to the renderer untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub style: ChartStyle,
    pub color: Option<String>,
}

/// A fully resolved widget definition.
///
/// The engine only reads it; an edit re-enters through the scheduler as a
/// replace under the same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub id: String,
    pub name: String,
    pub kind: WidgetKind,
    /// Endpoint URL, used verbatim as the cache key.
    pub url: String,
    /// Gap between two refresh cycles.
    pub refresh_interval: Duration,
    #[serde(default)]
    pub fields: Vec<FieldSelection>,
    #[serde(default)]
    pub request: RequestOptions,
    #[serde(default)]
    pub chart: ChartOptions,
}
