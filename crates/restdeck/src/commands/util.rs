//! Helpers shared across command handlers.

use std::path::PathBuf;

use restdeck_core::{FieldSelection, RequestOptions};

use crate::cli::{GlobalOpts, RequestArgs};
use crate::error::CliError;

/// Build engine request options from the `-X` / `-H` / `--body` flags.
pub fn request_options(args: &RequestArgs) -> Result<RequestOptions, CliError> {
    let mut options = RequestOptions {
        method: args.method.clone(),
        ..RequestOptions::default()
    };

    for header in &args.header {
        let Some((name, value)) = header.split_once(':') else {
            return Err(CliError::Validation {
                field: "--header".to_owned(),
                reason: format!("expected \"Name: value\", got \"{header}\""),
            });
        };
        options.headers.insert(name.trim().to_owned(), value.trim().to_owned());
    }

    options.body = args.body.clone();
    Ok(options)
}

/// Parse a `--field` flag: "path" or "path=Label".
pub fn parse_field(spec: &str) -> FieldSelection {
    match spec.split_once('=') {
        Some((path, label)) if !label.is_empty() => FieldSelection::labeled(path, label),
        Some((path, _)) => FieldSelection::from_path(path),
        None => FieldSelection::from_path(spec),
    }
}

/// The dashboard file path in effect: `--config` if given, else the
/// platform default.
pub fn dashboard_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(restdeck_config::default_path)
}
