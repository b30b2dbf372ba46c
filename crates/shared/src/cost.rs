//! Job cost calculator.
//!
//! All monetary values are fixed-point integers (micro-units of the
//! settlement token) carried as `U256`, matching the escrow contract's
//! arithmetic. Floats are never used here.

use alloy::primitives::U256;

use crate::epoch::EPOCHS_PER_MONTH;
use crate::error::DeeployError;
use crate::models::job::{Job, JobSpecifications, JobType};
use crate::models::tier::{ComputeTier, GpuTier};
use crate::tiers::ReferenceTables;

pub fn cost_per_epoch(tier: &ComputeTier, gpu: Option<&GpuTier>) -> U256 {
    tier.price_per_epoch + gpu.map(|g| g.price_per_epoch).unwrap_or(U256::ZERO)
}

pub fn job_cost_per_epoch(
    tier: &ComputeTier,
    gpu: Option<&GpuTier>,
    target_nodes_count: u32,
) -> Result<U256, DeeployError> {
    if target_nodes_count == 0 {
        return Err(DeeployError::InvalidNodeCount(target_nodes_count));
    }
    Ok(cost_per_epoch(tier, gpu) * U256::from(target_nodes_count))
}

pub fn epochs_for_months(months: u32) -> Result<u64, DeeployError> {
    if months == 0 {
        return Err(DeeployError::InvalidDuration(
            "month count must be positive".to_string(),
        ));
    }
    Ok(EPOCHS_PER_MONTH * u64::from(months))
}

pub fn monthly_job_cost(
    tier: &ComputeTier,
    gpu: Option<&GpuTier>,
    target_nodes_count: u32,
) -> Result<U256, DeeployError> {
    Ok(job_cost_per_epoch(tier, gpu, target_nodes_count)? * U256::from(EPOCHS_PER_MONTH))
}

/// Total cost over the paid term: per-epoch cost for all nodes times the
/// fixed 31-epoch month convention.
pub fn total_job_cost(
    tier: &ComputeTier,
    gpu: Option<&GpuTier>,
    target_nodes_count: u32,
    payment_months_count: u32,
) -> Result<U256, DeeployError> {
    let per_epoch = job_cost_per_epoch(tier, gpu, target_nodes_count)?;
    Ok(per_epoch * U256::from(epochs_for_months(payment_months_count)?))
}

/// Resolve tier and GPU names against the reference tables. Unknown names
/// and unsupported GPU pairings are hard errors, never defaults.
pub fn resolve_specs<'a>(
    tables: &'a ReferenceTables,
    job_type: JobType,
    specs: &JobSpecifications,
) -> Result<(&'a ComputeTier, Option<&'a GpuTier>), DeeployError> {
    let tier = tables
        .tier_for(job_type, &specs.compute_tier_name)
        .ok_or_else(|| DeeployError::UnknownTier(specs.compute_tier_name.clone()))?;

    let gpu = match &specs.gpu_tier_name {
        Some(name) => {
            let gpu = tables
                .gpu_tier(name)
                .ok_or_else(|| DeeployError::UnknownGpuTier(name.clone()))?;
            if !gpu.supports(job_type, tier) {
                return Err(DeeployError::GpuNotSupported {
                    gpu: gpu.name.clone(),
                    tier: tier.name.clone(),
                });
            }
            Some(gpu)
        }
        None => None,
    };

    Ok((tier, gpu))
}

pub fn resolve_job<'a>(
    tables: &'a ReferenceTables,
    job: &Job,
) -> Result<(&'a ComputeTier, Option<&'a GpuTier>), DeeployError> {
    resolve_specs(tables, job.job_type, &job.specifications)
}

pub fn job_cost(tables: &ReferenceTables, job: &Job) -> Result<U256, DeeployError> {
    let (tier, gpu) = resolve_job(tables, job)?;
    total_job_cost(
        tier,
        gpu,
        job.specifications.target_nodes_count,
        job.cost_and_duration.payment_months_count,
    )
}

/// Sum over a heterogeneous job list. Empty lists cost nothing.
pub fn total_cost_across_jobs(
    tables: &ReferenceTables,
    jobs: &[Job],
) -> Result<U256, DeeployError> {
    let mut total = U256::ZERO;
    for job in jobs {
        total += job_cost(tables, job)?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::deployment::{
        ContainerRegistry, DeploymentConfig, GenericDeployment, ServiceDeployment, ServiceType,
    };
    use crate::models::job::{CostAndDuration, JobSpecifications, JobType};
    use crate::models::tier::TierRange;
    use std::collections::HashMap;

    fn test_tier(price_micro: u64) -> ComputeTier {
        ComputeTier {
            id: 4,
            name: "MED1".to_string(),
            description: String::new(),
            cores: 8,
            ram_gb: 16,
            price_per_epoch: U256::from(price_micro),
            minimal_balancing_nodes: 2,
            gpu_support_range: Some(TierRange::new(1, 2)),
        }
    }

    fn test_gpu(price_micro: u64) -> GpuTier {
        GpuTier {
            id: 2,
            name: "A100".to_string(),
            gpu_models: vec!["NVIDIA A100 80GB PCIe".to_string()],
            price_per_epoch: U256::from(price_micro),
            minimal_balancing_nodes: 1,
            support_range_by_job_type: HashMap::from([(JobType::Generic, TierRange::new(4, 7))]),
        }
    }

    fn generic_job(tier_name: &str, gpu_tier_name: Option<&str>, nodes: u32, months: u32) -> Job {
        Job {
            id: 1,
            project_hash: "0xabc".to_string(),
            job_type: JobType::Generic,
            specifications: JobSpecifications {
                alias: "web".to_string(),
                job_type: JobType::Generic,
                target_nodes_count: nodes,
                compute_tier_name: tier_name.to_string(),
                gpu_tier_name: gpu_tier_name.map(str::to_string),
                job_tags: vec![],
                node_countries: vec![],
            },
            cost_and_duration: CostAndDuration {
                duration_months: months,
                payment_months_count: months,
            },
            deployment: DeploymentConfig::Generic(GenericDeployment {
                image: "nginx:latest".to_string(),
                registry: ContainerRegistry {
                    server: "docker.io".to_string(),
                    credentials: None,
                },
                ports: vec![],
                env_vars: vec![],
                dynamic_env_vars: vec![],
                file_volumes: vec![],
                restart_policy: Default::default(),
                image_pull_policy: Default::default(),
            }),
            paid: false,
        }
    }

    #[test]
    fn test_gpu_price_adds_to_tier_price() {
        let tier = test_tier(4_000_000);
        let gpu = test_gpu(12_000_000);
        assert_eq!(cost_per_epoch(&tier, None), U256::from(4_000_000u64));
        assert_eq!(
            cost_per_epoch(&tier, Some(&gpu)),
            U256::from(16_000_000u64)
        );
    }

    #[test]
    fn test_zero_nodes_is_an_error_not_zero_cost() {
        let tier = test_tier(4_000_000);
        assert!(matches!(
            job_cost_per_epoch(&tier, None, 0),
            Err(DeeployError::InvalidNodeCount(0))
        ));
    }

    #[test]
    fn test_zero_months_is_an_error() {
        assert!(matches!(
            epochs_for_months(0),
            Err(DeeployError::InvalidDuration(_))
        ));

        let tier = test_tier(4_000_000);
        assert!(matches!(
            total_job_cost(&tier, None, 2, 0),
            Err(DeeployError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_below_minimum_nodes_warns_but_still_costs() {
        let tier = test_tier(4_000_000);
        let job = generic_job("MED1", None, 1, 1);
        assert!(job.specifications.below_minimal_balancing(&tier));

        // Under-balanced jobs are a warning, never a costing error
        let cost = job_cost_per_epoch(&tier, None, 1).unwrap();
        assert_eq!(cost, U256::from(4_000_000u64));

        let balanced = generic_job("MED1", None, 2, 1);
        assert!(!balanced.specifications.below_minimal_balancing(&tier));
    }

    // One month at price P across 2 nodes is P * 2 * 31 in the fixed
    // 31-epoch month convention.
    #[test]
    fn test_total_cost_worked_example() {
        let price = 4_000_000u64;
        let tier = test_tier(price);
        let total = total_job_cost(&tier, None, 2, 1).unwrap();
        assert_eq!(total, U256::from(price) * U256::from(2u64) * U256::from(31u64));
    }

    #[test]
    fn test_cost_is_strictly_monotonic_in_node_count() {
        let tier = test_tier(4_000_000);
        let gpu = test_gpu(12_000_000);
        let mut previous = U256::ZERO;
        for nodes in 1..=10u32 {
            let cost = job_cost_per_epoch(&tier, Some(&gpu), nodes).unwrap();
            assert!(cost > previous);
            previous = cost;
        }
    }

    #[test]
    fn test_aggregate_cost_over_heterogeneous_jobs() {
        let tables = ReferenceTables::builtin();
        assert_eq!(total_cost_across_jobs(&tables, &[]).unwrap(), U256::ZERO);

        let container = generic_job("ENTRY", None, 1, 1);
        let mut service = generic_job("PGSQL-S", None, 1, 1);
        service.job_type = JobType::Service;
        service.specifications.job_type = JobType::Service;
        service.deployment = DeploymentConfig::Service(ServiceDeployment {
            service_type: ServiceType::Postgres,
            service_replica: None,
            env_vars: vec![],
        });

        let total = total_cost_across_jobs(&tables, &[container, service]).unwrap();
        // ENTRY 500_000 + PGSQL-S 1_250_000, one node, 31 epochs
        assert_eq!(total, U256::from(1_750_000u64) * U256::from(31u64));
    }

    #[test]
    fn test_unknown_tier_is_a_hard_error() {
        let tables = ReferenceTables::builtin();
        let job = generic_job("NO-SUCH-TIER", None, 1, 1);
        assert!(matches!(
            job_cost(&tables, &job),
            Err(DeeployError::UnknownTier(_))
        ));
    }

    #[test]
    fn test_unsupported_gpu_pairing_is_rejected() {
        let tables = ReferenceTables::builtin();
        // ENTRY (ordinal 1) is below every GPU tier's generic range
        let job = generic_job("ENTRY", Some("A100"), 1, 1);
        assert!(matches!(
            job_cost(&tables, &job),
            Err(DeeployError::GpuNotSupported { .. })
        ));

        let job = generic_job("MED1", Some("NO-SUCH-GPU"), 1, 1);
        assert!(matches!(
            job_cost(&tables, &job),
            Err(DeeployError::UnknownGpuTier(_))
        ));
    }
}
