use crate::config::Config;
use eyre::Result;

pub mod common;
pub mod cost;
pub mod draft;
pub mod epoch;
pub mod payload;
pub mod sign;
pub mod tiers;

pub use cost::CostCommands;
pub use draft::DraftCommands;
pub use epoch::EpochCommands;
pub use payload::PayloadCommands;
pub use sign::SignCommands;
pub use tiers::TiersCommands;

pub fn handle_tiers_command(command: TiersCommands, config: &Config) -> Result<()> {
    tiers::handle_command(command, config)
}

pub fn handle_cost_command(command: CostCommands, config: &Config) -> Result<()> {
    cost::handle_command(command, config)
}

pub fn handle_epoch_command(command: EpochCommands, config: &Config) -> Result<()> {
    epoch::handle_command(command, config)
}

pub fn handle_payload_command(command: PayloadCommands, config: &Config) -> Result<()> {
    payload::handle_command(command, config)
}

pub async fn handle_sign_command(command: SignCommands, config: &Config) -> Result<()> {
    sign::handle_command(command, config).await
}

pub fn handle_draft_command(command: DraftCommands, config: &Config) -> Result<()> {
    draft::handle_command(command, config)
}
