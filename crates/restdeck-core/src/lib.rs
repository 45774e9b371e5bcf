// restdeck-core: widget engine between restdeck-api and consumers (CLI).

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod path;
pub mod scheduler;
pub mod transform;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{CacheStats, Clock, ResponseCache, SystemClock};
pub use config::FetchConfig;
pub use error::CoreError;
pub use fetcher::{CacheUse, FetchResult, Fetcher, ProbeResult, adaptive_ttl};
pub use scheduler::{RefreshScheduler, UpdatePayload, WidgetUpdate};
pub use transform::Row;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ChartOptions, ChartStyle, FieldDescriptor, FieldSelection, ValueKind, WidgetConfig, WidgetKind,
};

// `RequestOptions` appears in `WidgetConfig`, so consumers get it here too.
pub use restdeck_api::RequestOptions;
