// ── Domain model: widgets and the fields they display ──

pub mod field;
pub mod widget;

pub use field::{FieldDescriptor, FieldSelection, ValueKind};
pub use widget::{ChartOptions, ChartStyle, WidgetConfig, WidgetKind};
