use clap::Subcommand;
use eyre::Result;
use shared::models::job::JobType;
use shared::tiers::ReferenceTables;

use crate::commands::common::format_micro;
use crate::config::Config;

#[derive(Subcommand)]
pub enum TiersCommands {
    /// List compute tiers for a job type
    List {
        /// Job type (generic, native, service)
        #[arg(short = 't', long, default_value = "generic")]
        job_type: String,
    },
    /// List GPU tiers
    Gpus,
}

pub fn handle_command(command: TiersCommands, _config: &Config) -> Result<()> {
    let tables = ReferenceTables::builtin();
    match command {
        TiersCommands::List { job_type } => {
            let job_type: JobType = job_type.parse().map_err(|e| eyre::eyre!("{}", e))?;
            list_tiers(&tables, job_type)
        }
        TiersCommands::Gpus => list_gpus(&tables),
    }
}

fn list_tiers(tables: &ReferenceTables, job_type: JobType) -> Result<()> {
    println!("Compute tiers for {} jobs:", job_type);
    for tier in tables.tiers_for(job_type) {
        let gpus = tables.gpu_tiers_for(job_type, tier);
        let gpu_names: Vec<&str> = gpus.iter().map(|g| g.name.as_str()).collect();
        println!(
            "  [{}] {:<8} {:>3} cores / {:>4} GB  {:>12}/epoch  min nodes: {}  GPUs: {}",
            tier.id,
            tier.name,
            tier.cores,
            tier.ram_gb,
            format_micro(tier.price_per_epoch),
            tier.minimal_balancing_nodes,
            if gpu_names.is_empty() {
                "-".to_string()
            } else {
                gpu_names.join(", ")
            }
        );
    }
    Ok(())
}

fn list_gpus(tables: &ReferenceTables) -> Result<()> {
    println!("GPU tiers:");
    for gpu in &tables.gpu_tiers {
        println!(
            "  [{}] {:<8} {:>12}/epoch  models: {}",
            gpu.id,
            gpu.name,
            format_micro(gpu.price_per_epoch),
            gpu.gpu_models.join(", ")
        );
    }
    Ok(())
}
