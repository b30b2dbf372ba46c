use std::sync::Arc;

use clap::Subcommand;
use eyre::Result;
use shared::cost::total_cost_across_jobs;
use shared::drafts::{DraftStore, RedisStore};
use shared::models::project::Project;
use shared::tiers::ReferenceTables;

use crate::commands::common::{format_micro, load_job};
use crate::config::Config;

#[derive(Subcommand)]
pub enum DraftCommands {
    /// Create a draft project
    CreateProject {
        #[arg(short = 'n', long)]
        name: String,

        /// Display color for the console
        #[arg(short = 'c', long, default_value = "#7f5af0")]
        color: String,
    },
    /// List draft projects
    ListProjects,
    /// Delete a draft project and all its jobs
    DeleteProject {
        #[arg(long)]
        project_hash: String,
    },
    /// Add a job request to a draft project
    AddJob {
        /// Path to a job request JSON file
        #[arg(short = 'f', long)]
        file: String,
    },
    /// List jobs in a draft project with their aggregate cost
    ListJobs {
        #[arg(long)]
        project_hash: String,
    },
    /// Delete a draft job
    DeleteJob {
        #[arg(long)]
        id: u64,
    },
    /// Mark a draft job as paid
    MarkPaid {
        #[arg(long)]
        id: u64,
    },
}

pub fn handle_command(command: DraftCommands, config: &Config) -> Result<()> {
    let store = DraftStore::new(Arc::new(
        RedisStore::new(config.redis_url()).map_err(|e| eyre::eyre!("{}", e))?,
    ));

    match command {
        DraftCommands::CreateProject { name, color } => {
            let project = Project::new(name, color);
            store
                .save_project(&project)
                .map_err(|e| eyre::eyre!("{}", e))?;
            println!("Created project {} ({})", project.name, project.project_hash);
            Ok(())
        }
        DraftCommands::ListProjects => {
            for project in store.list_projects().map_err(|e| eyre::eyre!("{}", e))? {
                println!("{}  {}", project.project_hash, project.name);
            }
            Ok(())
        }
        DraftCommands::DeleteProject { project_hash } => {
            store
                .delete_project(&project_hash)
                .map_err(|e| eyre::eyre!("{}", e))?;
            println!("Deleted project {}", project_hash);
            Ok(())
        }
        DraftCommands::AddJob { file } => {
            let job = load_job(&file)?;
            if store
                .get_project(&job.project_hash)
                .map_err(|e| eyre::eyre!("{}", e))?
                .is_none()
            {
                return Err(eyre::eyre!("No draft project {}", job.project_hash));
            }
            let job = store.save_job(&job).map_err(|e| eyre::eyre!("{}", e))?;
            println!("Saved draft job {} in project {}", job.id, job.project_hash);
            Ok(())
        }
        DraftCommands::ListJobs { project_hash } => {
            let jobs = store
                .jobs_for_project(&project_hash)
                .map_err(|e| eyre::eyre!("{}", e))?;
            for job in &jobs {
                println!(
                    "[{}] {:<20} {} x{} {}",
                    job.id,
                    job.specifications.alias,
                    job.specifications.compute_tier_name,
                    job.specifications.target_nodes_count,
                    if job.paid { "paid" } else { "draft" }
                );
            }
            let tables = ReferenceTables::builtin();
            let total =
                total_cost_across_jobs(&tables, &jobs).map_err(|e| eyre::eyre!("{}", e))?;
            println!("Total: {}", format_micro(total));
            Ok(())
        }
        DraftCommands::DeleteJob { id } => {
            store.delete_job(id).map_err(|e| eyre::eyre!("{}", e))?;
            println!("Deleted draft job {}", id);
            Ok(())
        }
        DraftCommands::MarkPaid { id } => match store.mark_paid(id).map_err(|e| eyre::eyre!("{}", e))? {
            Some(job) => {
                println!("Marked job {} as paid", job.id);
                Ok(())
            }
            None => Err(eyre::eyre!("No draft job {}", id)),
        },
    }
}
