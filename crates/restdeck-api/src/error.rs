use thiserror::Error;

/// Top-level error type for the `restdeck-api` crate.
///
/// Covers every failure mode on the request path: client construction,
/// request assembly, transport, HTTP status, and body decoding.
/// `restdeck-core` recovers these into per-widget fetch failures.
#[derive(Debug, Error)]
pub enum Error {
    // ── Construction ────────────────────────────────────────────────
    /// The HTTP client could not be built from the transport config.
    #[error("HTTP client error: {0}")]
    ClientBuild(String),

    /// Request options could not be applied (unknown method, malformed
    /// header name or value).
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, TLS,
    /// timeout -- anything before a status line existed).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── HTTP ────────────────────────────────────────────────────────
    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status} {reason}")]
    Http { status: u16, reason: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Invalid JSON response: {message}")]
    Json { message: String, body: String },
}

impl Error {
    /// Returns `true` if the failure happened before any HTTP status
    /// existed (connect, DNS, TLS, timeout). These are the failures a
    /// proxy retry can plausibly resolve.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if the endpoint answered with a non-2xx status.
    pub fn is_http(&self) -> bool {
        matches!(self, Self::Http { .. })
    }

    /// The HTTP status code, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
