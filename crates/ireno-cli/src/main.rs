//! `ireno` - terminal client for the IRENO smart assistant.
//!
//! # Configuration
//!
//! Settings are read from `~/.config/ireno/config.toml` (or `--config`),
//! then overridden by environment variables, then by command-line flags.
//!
//! - `IRENO_BACKEND_URL`: base URL of the assistant backend
//! - `IRENO_STATE_DIR`: directory of the persisted state
//! - `IRENO_LOG`: file log level (`RUST_LOG` takes precedence)

mod bootstrap;
mod commands;
mod logging;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ireno_infrastructure::ConfigService;
use ireno_infrastructure::paths::IrenoPaths;

use crate::bootstrap::{App, StoreLocation};

#[derive(Parser, Debug)]
#[command(name = "ireno")]
#[command(version, about = "IRENO Smart Assistant - chat with your collector network", long_about = None)]
struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config and IRENO_BACKEND_URL)
    #[arg(long, global = true, value_name = "URL")]
    backend_url: Option<String>,

    /// Directory of the persisted state (overrides config and IRENO_STATE_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Keep state in memory only
    #[arg(long, global = true, conflicts_with = "state_dir")]
    in_memory: bool,

    /// Also log info-level events to the terminal
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive chat session (default)
    Chat,
    /// List saved conversations
    List,
    /// Export every conversation to a dated JSON file
    Export {
        /// Target directory (defaults to the download directory)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
    /// Search the SOP documents
    Search {
        query: String,
        /// Scored results with surrounding context
        #[arg(long)]
        advanced: bool,
        #[arg(long, default_value_t = 15)]
        max_results: usize,
    },
    /// Show backend health and system status
    Status,
    /// Delete every saved conversation and reset the backend memory
    Reset,
    /// Write a config file with the default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    if let Some(Commands::Init { force }) = &cli.command {
        return commands::config::run(&config_service, *force);
    }

    let mut config = config_service
        .load()
        .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
    if let Some(url) = cli.backend_url {
        config.backend.base_url = url;
    }
    if let Some(dir) = &cli.state_dir {
        config.storage.directory = Some(dir.display().to_string());
    }

    let log_dir = match &config.logging.directory {
        Some(dir) => PathBuf::from(dir),
        None => IrenoPaths::log_dir()?,
    };
    let _log_guard = logging::init(&config.logging, &log_dir, cli.verbose)?;

    let location = if cli.in_memory {
        StoreLocation::InMemory
    } else {
        StoreLocation::from_config(&config)?
    };
    let app = App::build(config, &location)?;

    let outcome = run_command(&app, cli.command.unwrap_or(Commands::Chat)).await;
    app.shutdown().await;
    outcome
}

async fn run_command(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Chat => commands::chat::run(app).await?,
        Commands::List => commands::conversations::list(app).await,
        Commands::Export { dir } => commands::export::run(app, dir).await?,
        Commands::Search {
            query,
            advanced,
            max_results,
        } => commands::search::run(app, &query, advanced, max_results).await?,
        Commands::Status => commands::status::run(app).await?,
        Commands::Reset => commands::conversations::reset(app).await,
        Commands::Init { .. } => {}
    }
    Ok(())
}
