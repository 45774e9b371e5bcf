//! restdeck: terminal dashboard for REST endpoints.

mod cli;
mod commands;
mod error;
mod output;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use restdeck_core::{FetchConfig, Fetcher};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.quiet);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Dashboard-file maintenance needs no engine.
        Command::Config(args) => commands::config_cmd::handle(&args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "restdeck", &mut std::io::stdout());
            Ok(())
        }

        // Everything else fetches.
        cmd => {
            let file = restdeck_config::load_dashboard(cli.global.config.as_deref())?;
            let fetcher = Arc::new(Fetcher::new(&fetch_config(&file, &cli.global))?);

            commands::dispatch(cmd, fetcher, &file, &cli.global).await
        }
    }
}

/// Engine settings: the dashboard file, layered under CLI overrides.
fn fetch_config(file: &restdeck_config::DashboardFile, global: &GlobalOpts) -> FetchConfig {
    let mut fetch = file.fetch_config();
    if let Some(timeout) = global.timeout {
        fetch.timeout = Duration::from_secs(timeout);
    }
    if let Some(proxy) = &global.proxy {
        fetch.proxy_prefix = Some(proxy.clone());
    }
    if global.insecure {
        fetch.accept_invalid_certs = true;
    }
    fetch
}
