use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feedherald_core::BotConfig;

mod commands;

#[derive(Parser)]
#[command(name = "feedherald")]
#[command(version, about = "Posts new videos and news articles to a chat channel")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start both watchers and run until interrupted
    Run,
    /// Run a single polling tick per watcher and print the outcome
    Check {
        /// Actually post to the chat channel instead of printing messages
        #[arg(long)]
        post: bool,
    },
    /// List the configured sources and intervals
    Sources,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = BotConfig::from_env()?;

    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config).await,
        Some(Commands::Check { post }) => commands::check::run(config, post).await,
        Some(Commands::Sources) => commands::sources::run(&config),
    }
}
