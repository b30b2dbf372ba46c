use clap::Subcommand;
use eyre::Result;
use shared::cost::{
    job_cost_per_epoch, monthly_job_cost, resolve_job, resolve_specs, total_job_cost,
};
use shared::models::job::{JobSpecifications, JobType};
use shared::tiers::ReferenceTables;

use crate::commands::common::{format_micro, load_job};
use crate::config::Config;

#[derive(Subcommand)]
pub enum CostCommands {
    /// Cost a job request from a JSON file
    File {
        /// Path to a job request JSON file
        #[arg(short = 'f', long)]
        file: String,
    },
    /// Cost a job from inline parameters
    Estimate {
        /// Job type (generic, native, service)
        #[arg(short = 't', long, default_value = "generic")]
        job_type: String,

        /// Compute tier name
        #[arg(long)]
        tier: String,

        /// GPU tier name
        #[arg(long)]
        gpu: Option<String>,

        /// Target node count
        #[arg(short = 'n', long, default_value = "1")]
        nodes: u32,

        /// Months paid up front
        #[arg(short = 'm', long, default_value = "1")]
        months: u32,
    },
}

pub fn handle_command(command: CostCommands, _config: &Config) -> Result<()> {
    let tables = ReferenceTables::builtin();
    match command {
        CostCommands::File { file } => cost_file(&tables, &file),
        CostCommands::Estimate {
            job_type,
            tier,
            gpu,
            nodes,
            months,
        } => {
            let job_type: JobType = job_type.parse().map_err(|e| eyre::eyre!("{}", e))?;
            estimate(&tables, job_type, tier, gpu, nodes, months)
        }
    }
}

fn cost_file(tables: &ReferenceTables, file: &str) -> Result<()> {
    let job = load_job(file)?;
    let (tier, gpu) = resolve_job(tables, &job).map_err(|e| eyre::eyre!("{}", e))?;
    let nodes = job.specifications.target_nodes_count;

    if job.specifications.below_minimal_balancing(tier) {
        println!(
            "Warning: {} nodes is below the {} minimum of {} balancing nodes",
            nodes, tier.name, tier.minimal_balancing_nodes
        );
    }

    print_costs(tier, gpu, nodes, job.cost_and_duration.payment_months_count)
}

fn estimate(
    tables: &ReferenceTables,
    job_type: JobType,
    tier_name: String,
    gpu_name: Option<String>,
    nodes: u32,
    months: u32,
) -> Result<()> {
    let specs = JobSpecifications {
        alias: String::new(),
        job_type,
        target_nodes_count: nodes,
        compute_tier_name: tier_name,
        gpu_tier_name: gpu_name,
        job_tags: vec![],
        node_countries: vec![],
    };
    let (tier, gpu) = resolve_specs(tables, job_type, &specs).map_err(|e| eyre::eyre!("{}", e))?;
    print_costs(tier, gpu, nodes, months)
}

fn print_costs(
    tier: &shared::models::tier::ComputeTier,
    gpu: Option<&shared::models::tier::GpuTier>,
    nodes: u32,
    months: u32,
) -> Result<()> {
    let per_epoch = job_cost_per_epoch(tier, gpu, nodes).map_err(|e| eyre::eyre!("{}", e))?;
    let monthly = monthly_job_cost(tier, gpu, nodes).map_err(|e| eyre::eyre!("{}", e))?;
    let total = total_job_cost(tier, gpu, nodes, months).map_err(|e| eyre::eyre!("{}", e))?;

    println!("Tier: {}", tier);
    if let Some(gpu) = gpu {
        println!("GPU:  {}", gpu);
    }
    println!("Nodes: {}", nodes);
    println!("Cost per epoch: {}", format_micro(per_epoch));
    println!("Cost per month: {}", format_micro(monthly));
    println!("Total for {} month(s): {}", months, format_micro(total));
    Ok(())
}
