//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Gleaner CLI - Extract structured data from documents, images and audio.
#[derive(Debug, Parser)]
#[command(name = "gleaner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Model name (overrides config)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// CRM webhook URL (overrides config)
    #[arg(long, global = true)]
    pub webhook_url: Option<String>,

    /// API key for the generative model service
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Legacy environment variable holding the API key
pub const LEGACY_API_KEY_VAR: &str = "API_KEY";

impl Cli {
    /// API key from `--api-key`/`GEMINI_API_KEY`, falling back to `API_KEY`
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(LEGACY_API_KEY_VAR).ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// Default log filter for the chosen verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (one line per item)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract fields from files
    Extract(ExtractArgs),

    /// List CRM accounts
    Accounts,

    /// Send a saved extraction result to a CRM account
    Send(SendArgs),

    /// List schema templates
    Templates,

    /// Show configuration
    Config(ConfigArgs),

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Schema file (TOML or JSON) with a `fields` list
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Schema template to append (repeatable)
    #[arg(short, long = "template")]
    pub templates: Vec<String>,

    /// File to extract from (repeatable)
    #[arg(long = "file")]
    pub files: Vec<PathBuf>,

    /// Inline file as `<name>=<data-uri>` (repeatable)
    #[arg(long = "data-uri")]
    pub data_uris: Vec<String>,
}

/// Arguments for the send command.
#[derive(Debug, Parser)]
pub struct SendArgs {
    /// Target account id
    #[arg(short, long)]
    pub account: String,

    /// Schema file the result was extracted with
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Result file written by `gleaner --format json extract`
    #[arg(short, long)]
    pub result: PathBuf,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
