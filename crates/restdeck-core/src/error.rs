// ── Core error types ──
//
// Errors surfaced by the engine itself: construction and scheduling
// misuse. Per-fetch failures never appear here -- the orchestrator
// recovers those into `FetchResult::Failure` so a widget keeps running
// through bad cycles.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The shared HTTP client could not be built.
    #[error("Failed to initialize HTTP client: {0}")]
    ClientBuild(#[from] restdeck_api::Error),

    /// A widget definition failed validation.
    #[error("Invalid widget `{id}`: {reason}")]
    InvalidWidget { id: String, reason: String },

    /// No scheduled widget under this id.
    #[error("Unknown widget `{id}`")]
    UnknownWidget { id: String },
}
