//! Gleaner CLI - extract structured data from documents, images and audio.

use anyhow::Context;
use clap::Parser;
use gleaner_cli::commands;
use gleaner_cli::repl;
use gleaner_cli::{Cli, Command, Config, Formatter, Session};
use gleaner_crm::CrmClient;
use gleaner_extractor::Extractor;
use gleaner_llm::GeminiProvider;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing (log to stderr, stdout carries results)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .init();

    // Load or create config
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::path()?,
    };
    let config = if config_path.exists() {
        Config::load_from(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?
    } else {
        let cfg = Config::default();
        cfg.save_to(&config_path).ok();
        cfg
    };

    // Determine output format and color
    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let webhook_url = cli
        .webhook_url
        .clone()
        .or_else(|| config.webhook_url().map(str::to_string));
    let crm = webhook_url.map(CrmClient::new);

    let api_key = cli.resolved_api_key();
    let model = cli.model.clone().unwrap_or_else(|| config.model.name.clone());

    let command = match cli.command {
        Some(Command::Templates) => {
            return Ok(commands::execute_templates(&config.all_templates(), &formatter)?);
        }
        Some(Command::Config(args)) => {
            return Ok(commands::execute_config(args, &config, &config_path)?);
        }
        Some(Command::Send(args)) => {
            let crm = crm.context("CRM webhook URL is not configured (set [crm] webhook_url or pass --webhook-url)")?;
            return Ok(commands::execute_send(args, &crm, &formatter).await?);
        }
        Some(Command::Accounts) => {
            return Ok(commands::execute_accounts(crm.as_ref(), &formatter).await?);
        }
        other => other,
    };

    // Commands below talk to the model
    if api_key.is_none() {
        warn!("No API key set (GEMINI_API_KEY or API_KEY); extraction requests will fail");
    }
    let provider = GeminiProvider::new(api_key, model)
        .with_endpoint(config.model.endpoint.clone())
        .with_timeout(Duration::from_secs(config.model.timeout_secs));
    let extractor = Extractor::new(provider, config.extractor_config());
    let mut session = Session::new(extractor, crm, config.all_templates());

    match command {
        None | Some(Command::Repl) => {
            repl::run_repl(&mut session, &formatter, config.settings.history_size).await?;
        }
        Some(Command::Extract(args)) => {
            commands::execute_extract(args, &mut session, &formatter).await?;
        }
        Some(Command::Templates | Command::Config(_) | Command::Send(_) | Command::Accounts) => {}
    }

    Ok(())
}
