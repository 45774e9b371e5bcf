//! Command handlers: bridge CLI arguments to engine calls and output.

pub mod config_cmd;
pub mod get;
pub mod probe;
pub mod util;
pub mod watch;

use std::sync::Arc;

use restdeck_config::DashboardFile;
use restdeck_core::Fetcher;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an engine-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    fetcher: Arc<Fetcher>,
    file: &DashboardFile,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Probe(args) => probe::handle(&fetcher, args, global).await,
        Command::Get(args) => get::handle(&fetcher, args, global).await,
        Command::Watch(args) => watch::handle(fetcher, file, &args, global).await,
        // Handled in main before the engine is built.
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
