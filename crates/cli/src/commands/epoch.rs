use clap::Subcommand;
use eyre::Result;
use shared::epoch::{current_epoch, epoch_duration_secs, genesis_timestamp, EPOCHS_PER_MONTH};

use crate::config::Config;

#[derive(Subcommand)]
pub enum EpochCommands {
    /// Show the epoch clock for the configured environment
    Status,
}

pub fn handle_command(command: EpochCommands, config: &Config) -> Result<()> {
    match command {
        EpochCommands::Status => status(config),
    }
}

fn status(config: &Config) -> Result<()> {
    let env = config.environment()?;

    println!("Environment: {}", env);
    println!("Genesis timestamp: {}", genesis_timestamp(env));
    println!("Epoch duration: {}s", epoch_duration_secs(env));
    println!("Current epoch: {}", current_epoch(env));
    println!("Epochs per settlement month: {}", EPOCHS_PER_MONTH);
    Ok(())
}
