use clap::Subcommand;
use eyre::Result;
use shared::payload::build_job_payload;
use shared::signature::{build_signable_message, sign_payload};
use shared::tiers::ReferenceTables;
use shared::web3::Wallet;

use crate::commands::common::load_job;
use crate::config::Config;

const DEFAULT_PREFIX: &str = "Please sign this message for Deeploy: ";

#[derive(Subcommand)]
pub enum SignCommands {
    /// Print the canonical signable message for a job request
    Message {
        /// Path to a job request JSON file
        #[arg(short = 'f', long)]
        file: String,

        /// Human-readable message prefix
        #[arg(short = 'p', long, default_value = DEFAULT_PREFIX)]
        prefix: String,
    },
    /// Build, sign, and print a submission-ready payload
    Submit {
        /// Path to a job request JSON file
        #[arg(short = 'f', long)]
        file: String,

        /// Human-readable message prefix
        #[arg(short = 'p', long, default_value = DEFAULT_PREFIX)]
        prefix: String,

        /// Signing key (overrides config)
        #[arg(short = 'k', long)]
        private_key: Option<String>,
    },
}

pub async fn handle_command(command: SignCommands, config: &Config) -> Result<()> {
    match command {
        SignCommands::Message { file, prefix } => message(&file, &prefix),
        SignCommands::Submit {
            file,
            prefix,
            private_key,
        } => submit(&file, &prefix, private_key, config).await,
    }
}

fn message(file: &str, prefix: &str) -> Result<()> {
    let tables = ReferenceTables::builtin();
    let job = load_job(file)?;
    let payload = build_job_payload(&tables, &job).map_err(|e| eyre::eyre!("{}", e))?;
    let message = build_signable_message(&payload, prefix).map_err(|e| eyre::eyre!("{}", e))?;
    println!("{}", message);
    Ok(())
}

async fn submit(
    file: &str,
    prefix: &str,
    private_key: Option<String>,
    config: &Config,
) -> Result<()> {
    let key = private_key
        .or_else(|| config.private_key.clone())
        .ok_or_else(|| eyre::eyre!("No private key configured; pass --private-key or set PRIVATE_KEY"))?;
    let wallet = Wallet::new(&key).map_err(|e| eyre::eyre!("{}", e))?;

    let tables = ReferenceTables::builtin();
    let job = load_job(file)?;
    let payload = build_job_payload(&tables, &job).map_err(|e| eyre::eyre!("{}", e))?;
    let signed = sign_payload(&wallet, &payload, prefix)
        .await
        .map_err(|e| eyre::eyre!("{}", e))?;

    println!("{}", serde_json::to_string_pretty(&signed)?);
    Ok(())
}
