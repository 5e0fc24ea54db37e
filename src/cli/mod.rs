use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

/// Token transfer graph analyser
#[derive(Parser)]
#[command(name = "token-flow-graph")]
#[command(about = "Token transfer graph: communities, layout, PNG and JSON export")]
#[command(version)]
pub struct Cli {
    /// Debug-level logging (RUST_LOG still takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch transfers, detect communities, write the network image and JSON
    Network(commands::network::NetworkCommand),
    /// Fetch transfers and save them as CSV for offline runs
    Fetch(commands::fetch::FetchCommand),
    /// Print graph statistics and the largest communities
    Stats(commands::stats::StatsCommand),
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

pub async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // Uses RUST_LOG environment variable (defaults to "info", "debug" with --verbose)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter(cli.verbose))),
        )
        .try_init();

    match cli.command {
        Commands::Network(command) => command.run().await,
        Commands::Fetch(command) => command.run().await,
        Commands::Stats(command) => command.run().await,
    }
}
