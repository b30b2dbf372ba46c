use clap::{Parser, Subcommand};
use eyre::Result;

mod commands;
mod config;

use commands::*;
use config::Config;

#[derive(Parser)]
#[command(name = "deeploy-cli")]
#[command(about = "Deeploy deployment pipeline CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<String>,

    /// Environment file path
    #[arg(long, global = true, default_value = ".env")]
    env_file: String,

    /// Network environment (mainnet, testnet, devnet)
    #[arg(long, global = true)]
    environment: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reference-table operations
    Tiers {
        #[command(subcommand)]
        command: TiersCommands,
    },
    /// Job cost estimation
    Cost {
        #[command(subcommand)]
        command: CostCommands,
    },
    /// Deployment payload building
    Payload {
        #[command(subcommand)]
        command: PayloadCommands,
    },
    /// Signable-message and signing operations
    Sign {
        #[command(subcommand)]
        command: SignCommands,
    },
    /// Draft project/job management
    Draft {
        #[command(subcommand)]
        command: DraftCommands,
    },
    /// Epoch clock for the configured environment
    Epoch {
        #[command(subcommand)]
        command: EpochCommands,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config, &cli.env_file)?;
    if let Some(environment) = cli.environment {
        config.environment = Some(environment);
    }

    match cli.command {
        Commands::Tiers { command } => handle_tiers_command(command, &config),
        Commands::Cost { command } => handle_cost_command(command, &config),
        Commands::Payload { command } => handle_payload_command(command, &config),
        Commands::Sign { command } => handle_sign_command(command, &config).await,
        Commands::Draft { command } => handle_draft_command(command, &config),
        Commands::Epoch { command } => handle_epoch_command(command, &config),
    }
}
