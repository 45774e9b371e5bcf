//! CLI error types with miette diagnostics and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use restdeck_config::ConfigError;
use restdeck_core::CoreError;

/// Process exit codes, for scripting against the CLI.
#[allow(dead_code)]
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const FETCH: i32 = 3;
    pub const CONFIG: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Fetching ─────────────────────────────────────────────────────
    #[error("Could not fetch {url}")]
    #[diagnostic(
        code(restdeck::fetch_failed),
        help(
            "{reason}\n\
             Retry with -v for transport detail, or route the request through\n\
             a CORS-style relay: --proxy <URL_PREFIX>"
        )
    )]
    FetchFailed { url: String, reason: String },

    // ── Dashboard file ───────────────────────────────────────────────
    #[error("Invalid dashboard entry: {field}: {reason}")]
    #[diagnostic(
        code(restdeck::dashboard),
        help("Edit the dashboard file; `restdeck config path` prints its location.")
    )]
    Dashboard { field: String, reason: String },

    #[error("No widgets configured in {path}")]
    #[diagnostic(
        code(restdeck::empty_dashboard),
        help(
            "Add [[widgets]] tables to the dashboard file, or start from a\n\
             sample: restdeck config init"
        )
    )]
    EmptyDashboard { path: String },

    #[error("Dashboard file already exists at {path}")]
    #[diagnostic(code(restdeck::config_exists), help("Pass --force to overwrite it."))]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(restdeck::config))]
    Config(Box<figment::Error>),

    // ── Usage ────────────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(restdeck::validation))]
    Validation { field: String, reason: String },

    // ── Engine ───────────────────────────────────────────────────────
    #[error("Could not initialize the HTTP client: {reason}")]
    #[diagnostic(code(restdeck::client))]
    ClientBuild { reason: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map the error to its process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FetchFailed { .. } => exit_code::FETCH,
            Self::Validation { .. } | Self::ConfigExists { .. } => exit_code::USAGE,
            Self::Dashboard { .. } | Self::EmptyDashboard { .. } | Self::Config(_) => {
                exit_code::CONFIG
            }
            Self::ClientBuild { .. } | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Dashboard { field, reason },
            ConfigError::Figment(inner) => Self::Config(inner),
            ConfigError::Serialization(inner) => Self::Validation {
                field: "dashboard".to_owned(),
                reason: inner.to_string(),
            },
            ConfigError::Io(inner) => Self::Io(inner),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ClientBuild(inner) => Self::ClientBuild { reason: inner.to_string() },
            CoreError::InvalidWidget { id, reason } => Self::Dashboard {
                field: format!("widget \"{id}\""),
                reason,
            },
            CoreError::UnknownWidget { id } => Self::Validation {
                field: "widget".to_owned(),
                reason: format!("no widget with id \"{id}\""),
            },
        }
    }
}
