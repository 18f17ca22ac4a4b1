//! Solvebot CLI
//!
//! Local execution entry point. An external scheduler (cron, systemd
//! timer, HTTP shim) runs `solvebot cron` for each poll cycle.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use solvebot::{
    config::Config,
    error::Result,
    handler,
    pipeline::SyncEngine,
    services::{CtfdClient, ModerateContentClient, ModerationApi, SlackClient},
    storage::{LocalStore, SolveStore},
};

/// Solvebot - CTF solve announcer and message moderator
#[derive(Parser, Debug)]
#[command(name = "solvebot", version, about = "CTF solve announcer for Slack")]
struct Cli {
    /// Path to storage directory containing config and state files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one poll cycle: fetch solves, announce, extend the seen-log
    Cron,

    /// Check one piece of text against the moderation API
    Check {
        /// Text to evaluate
        text: String,
    },

    /// Validate the configuration
    Validate,

    /// Show seen-log info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.storage_dir.join("config.toml");
    let config = Config::load(&config_path)?;
    let store = LocalStore::new(&cli.storage_dir);

    match cli.command {
        Command::Cron => {
            config.validate()?;

            let scoreboard = CtfdClient::new(&config.ctfd)?;
            let notifier = SlackClient::new(&config.slack)?;
            let engine = SyncEngine::new(&config, &scoreboard, &store, &notifier);

            let response = handler::cron(&engine).await?;
            println!("{}", serde_json::to_string(&response)?);
        }

        Command::Check { text } => {
            config.validate()?;

            let api = ModerateContentClient::new(&config.moderation)?;
            let verdict = api.check(&text).await?;

            if verdict.bad_words {
                log::warn!("Text flagged; cleaned: {}", verdict.clean);
            } else {
                log::info!("Text is clean");
            }
        }

        Command::Validate => {
            config.validate()?;
            log::info!("Configuration is valid");
        }

        Command::Info => {
            let count = store.solve_count().await?;
            log::info!("Seen-log: {} processed submissions", count);
        }
    }

    Ok(())
}
