//! Checkmate CLI - fact-check claims from the terminal.

use anyhow::Context;
use checkmate_cli::commands;
use checkmate_cli::input::Editor;
use checkmate_cli::repl;
use checkmate_cli::{open_store, App, Cli, Command, Config, Formatter};
use checkmate_domain::Credentials;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr so they never mix with command output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Config::load().context("Failed to load configuration")?,
    };
    if let Some(database) = cli.database {
        config.database_path = database;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let store = open_store(&config)
        .with_context(|| format!("Failed to open {}", config.database_path.display()))?;

    match cli.command {
        Some(Command::Show(args)) => commands::execute_show(args, &store, &formatter)?,
        Some(Command::List(args)) => commands::execute_list(args, &store, &formatter)?,
        command => {
            // Everything else talks to the model, so keys must be present first.
            dotenvy::dotenv().ok();
            let credentials = Credentials::from_env().context("API keys are not configured")?;
            let app = App::connect(&config, &credentials, store)?;

            match command {
                Some(Command::Check(args)) => {
                    commands::execute_check(&args.claim_text(), app.checker(), &formatter).await?;
                }
                Some(Command::Chat) => {
                    let mut editor = Editor::new(config.settings.history_size)?;
                    commands::run_chat(app.model(), &mut editor, &formatter).await?;
                }
                _ => {
                    let mut editor = Editor::new(config.settings.history_size)?;
                    repl::run_menu(&app, &mut editor, &formatter).await?;
                }
            }
        }
    }

    Ok(())
}
