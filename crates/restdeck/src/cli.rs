//! Command-line interface definitions.
//!
//! This module is self-contained on purpose: `build.rs` includes it via
//! `#[path]` to generate man pages, so it may only depend on `clap`,
//! `clap_complete`, and the standard library.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top level
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Terminal dashboard for REST endpoints.
#[derive(Debug, Parser)]
#[command(
    name = "restdeck",
    version,
    about = "Attach REST endpoints to dashboard widgets",
    long_about = "Probe JSON APIs for displayable fields, shape responses into table,\n\
                  chart, and card widgets, and watch a whole dashboard refresh on its\n\
                  own cadence with response caching tuned to each widget.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

/// Options available on every subcommand.
#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Dashboard file (defaults to the platform config directory)
    #[arg(
        long,
        short = 'c',
        env = "RESTDECK_CONFIG",
        global = true,
        value_name = "PATH"
    )]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "RESTDECK_OUTPUT",
        global = true,
        default_value = "table",
        value_name = "FORMAT"
    )]
    pub output: OutputFormat,

    /// When to use colored output
    #[arg(long, global = true, default_value = "auto", value_name = "WHEN")]
    pub color: ColorMode,

    /// Request timeout in seconds (overrides the dashboard file)
    #[arg(long, env = "RESTDECK_TIMEOUT", global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Proxy prefix prepended to URLs when a direct request fails
    #[arg(long, env = "RESTDECK_PROXY", global = true, value_name = "URL_PREFIX")]
    pub proxy: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "RESTDECK_INSECURE", global = true)]
    pub insecure: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Rounded unicode tables
    Table,
    /// Pretty-printed JSON
    Json,
    /// Single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Tab-separated values, one record per line
    Plain,
}

/// When to colorize output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal and NO_COLOR is unset
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Probe an endpoint for displayable fields
    #[command(alias = "p")]
    Probe(ProbeArgs),

    /// Fetch an endpoint once and shape it into widget rows
    #[command(alias = "g")]
    Get(GetArgs),

    /// Run every widget in the dashboard and stream updates
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Manage the dashboard file
    Config(ConfigArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Probe
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Endpoint URL to probe
    #[arg(value_name = "URL")]
    pub url: String,

    /// How many object levels to descend
    #[arg(
        long,
        short = 'd',
        default_value = "3",
        value_name = "LEVELS",
        value_parser = clap::value_parser!(u8).range(1..=16)
    )]
    pub depth: u8,

    /// Print the fetched body instead of the field list
    #[arg(long)]
    pub show_data: bool,

    #[command(flatten)]
    pub request: RequestArgs,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Get
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Endpoint URL to fetch
    #[arg(value_name = "URL")]
    pub url: String,

    /// Field to display, as "path" or "path=Label" (repeatable)
    #[arg(long, short = 'f', required = true, value_name = "FIELD")]
    pub field: Vec<String>,

    /// Widget shape applied to the response
    #[arg(long, default_value = "table", value_name = "KIND")]
    pub kind: KindArg,

    #[command(flatten)]
    pub request: RequestArgs,
}

/// Widget kind, as selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// One row per array element
    Table,
    /// Numeric series; a single object pivots into name/value pairs
    Chart,
    /// Single-value spotlight
    Card,
}

/// Request shaping flags shared by `probe` and `get`.
#[derive(Debug, Args)]
pub struct RequestArgs {
    /// HTTP method
    #[arg(long, short = 'X', default_value = "GET", value_name = "METHOD")]
    pub method: String,

    /// Extra request header, as "Name: value" (repeatable)
    #[arg(long, short = 'H', value_name = "HEADER")]
    pub header: Vec<String>,

    /// Request body
    #[arg(long, value_name = "BODY")]
    pub body: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Watch
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Stop after this many updates (default: run until Ctrl-C)
    #[arg(long, short = 'n', value_name = "COUNT")]
    pub limit: Option<u64>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a starter dashboard file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the dashboard file path
    Path,

    /// Display the dashboard as currently resolved
    Show,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Completions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum, value_name = "SHELL")]
    pub shell: Shell,
}
