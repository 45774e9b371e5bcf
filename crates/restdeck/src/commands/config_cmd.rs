//! `config` command: manage the dashboard file.

use restdeck_config::DashboardFile;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init { force } => init(force, global),
        ConfigCommand::Path => {
            println!("{}", util::dashboard_path(global).display());
            Ok(())
        }
        ConfigCommand::Show => show(global),
    }
}

fn init(force: bool, global: &GlobalOpts) -> Result<(), CliError> {
    let path = util::dashboard_path(global);
    if path.exists() && !force {
        return Err(CliError::ConfigExists { path: path.display().to_string() });
    }

    restdeck_config::save_dashboard(&restdeck_config::sample_dashboard(), &path)?;

    if !global.quiet {
        eprintln!("Dashboard written to {}", path.display());
        eprintln!("Try it: restdeck watch --limit 3");
    }
    Ok(())
}

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let file = restdeck_config::load_dashboard(global.config.as_deref())?;
    let rendered = match global.output {
        OutputFormat::Table | OutputFormat::Plain => summary(&file),
        OutputFormat::Json => output::render_json_pretty(&file),
        OutputFormat::JsonCompact => output::render_json_compact(&file),
        OutputFormat::Yaml => output::render_yaml(&file),
    };
    output::print_output(&rendered, global.quiet);
    Ok(())
}

/// Human-readable dashboard summary for the table and plain formats.
fn summary(file: &DashboardFile) -> String {
    let mut lines = vec![format!("Dashboard: {}", file.dashboard.title)];
    if file.widgets.is_empty() {
        lines.push("  (no widgets)".to_owned());
    } else {
        for entry in &file.widgets {
            lines.push(format!(
                "  {:<5} {:<24} every {:>4}s  {}",
                entry.kind.to_string(),
                entry.name,
                entry.refresh_secs,
                entry.url
            ));
        }
    }
    lines.join("\n")
}
