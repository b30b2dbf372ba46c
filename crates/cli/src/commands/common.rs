use alloy::primitives::U256;
use eyre::{Context, Result};
use shared::models::job::{Job, JobRequest};

const MICRO_UNITS: u64 = 1_000_000;

/// Render a micro-unit amount as a decimal token amount.
pub fn format_micro(amount: U256) -> String {
    let units = U256::from(MICRO_UNITS);
    let whole = amount / units;
    let fraction = amount % units;
    format!("{}.{:06}", whole, fraction.to::<u64>())
}

/// Load a job request from a JSON file and validate it into a draft job.
pub fn load_job(path: &str) -> Result<Job> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read job file: {}", path))?;
    let request: JobRequest = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse job file: {}", path))?;
    Job::try_from(request).map_err(|e| eyre::eyre!("Invalid job: {}", e))
}
