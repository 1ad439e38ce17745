//! chatset CLI: the main entry point.
//!
//! Commands:
//! - `init`     Write the default config file
//! - `chat`     Interactive chat or single-message mode
//! - `settings` Show the starting settings snapshot

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "chatset", about = "Change app settings by chatting with an assistant", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Chat with the settings assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show the settings snapshot a chat starts from
    Settings,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init { force } => commands::init::run(force)?,
        Commands::Chat { message } => commands::chat::run(message).await?,
        Commands::Settings => commands::settings::run().await?,
    }

    Ok(())
}
