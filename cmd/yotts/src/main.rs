//! yotts - voice cloning and TTS management for DashScope.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{ConfigCommand, MenuCommand};

/// yotts - clone a voice from a recording and speak with it.
///
/// Without a subcommand an interactive menu is started. Credentials come
/// from the selected context, or are prompted for.
///
/// Configuration is stored in ~/.yotts/yotts/ and supports multiple contexts,
/// similar to kubectl's context management.
#[derive(Parser)]
#[command(name = "yotts")]
#[command(about = "DashScope voice cloning and TTS tool")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.yotts/yotts/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Context name to use
    #[arg(short = 'c', long, global = true)]
    pub context: Option<String>,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive voice management menu (default)
    Menu(MenuCommand),
    /// Manage CLI configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .init();
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    match &cli.command {
        None => MenuCommand::default().run(&cli).await,
        Some(Commands::Menu(cmd)) => cmd.run(&cli).await,
        Some(Commands::Config(cmd)) => cmd.run(&cli).await,
    }
}
