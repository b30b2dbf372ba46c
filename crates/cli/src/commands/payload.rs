use clap::Subcommand;
use eyre::Result;
use shared::payload::build_job_payload;
use shared::tiers::ReferenceTables;

use crate::commands::common::load_job;
use crate::config::Config;

#[derive(Subcommand)]
pub enum PayloadCommands {
    /// Build the deployment payload for a job request
    Build {
        /// Path to a job request JSON file
        #[arg(short = 'f', long)]
        file: String,
    },
}

pub fn handle_command(command: PayloadCommands, _config: &Config) -> Result<()> {
    match command {
        PayloadCommands::Build { file } => build(&file),
    }
}

fn build(file: &str) -> Result<()> {
    let tables = ReferenceTables::builtin();
    let job = load_job(file)?;
    let payload = build_job_payload(&tables, &job).map_err(|e| eyre::eyre!("{}", e))?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
