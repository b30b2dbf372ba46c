//! Built-in reference tables for compute and GPU tiers.
//!
//! Prices are per epoch, in micro-units (6 decimals) of the settlement
//! token. Tables are built once at startup and passed explicitly into the
//! calculators and builders so tests can substitute their own.

use std::collections::HashMap;

use alloy::primitives::U256;

use crate::models::job::JobType;
use crate::models::tier::{ComputeTier, GpuTier, TierRange};

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTables {
    /// Generic container tiers.
    pub container_tiers: Vec<ComputeTier>,
    /// Native pipeline worker tiers.
    pub worker_tiers: Vec<ComputeTier>,
    /// Managed-service container tiers.
    pub service_tiers: Vec<ComputeTier>,
    pub gpu_tiers: Vec<GpuTier>,
}

fn tier(
    id: u32,
    name: &str,
    description: &str,
    cores: u32,
    ram_gb: u32,
    price_micro: u64,
    minimal_balancing_nodes: u32,
    gpu_support_range: Option<TierRange>,
) -> ComputeTier {
    ComputeTier {
        id,
        name: name.to_string(),
        description: description.to_string(),
        cores,
        ram_gb,
        price_per_epoch: U256::from(price_micro),
        minimal_balancing_nodes,
        gpu_support_range,
    }
}

fn container_tiers() -> Vec<ComputeTier> {
    vec![
        tier(1, "ENTRY", "Smallest general-purpose container", 1, 2, 500_000, 1, None),
        tier(2, "LOW1", "Light workloads", 2, 4, 1_000_000, 1, None),
        tier(3, "LOW2", "Light workloads, more headroom", 4, 8, 2_000_000, 2, Some(TierRange::new(1, 1))),
        tier(4, "MED1", "Medium workloads", 8, 16, 4_000_000, 2, Some(TierRange::new(1, 2))),
        tier(5, "MED2", "Medium workloads, more headroom", 16, 32, 8_000_000, 2, Some(TierRange::new(1, 3))),
        tier(6, "HIGH", "Heavy workloads", 32, 64, 16_000_000, 3, Some(TierRange::new(1, 3))),
        tier(7, "ULTRA", "Heaviest workloads", 64, 128, 32_000_000, 3, Some(TierRange::new(2, 3))),
    ]
}

fn worker_tiers() -> Vec<ComputeTier> {
    vec![
        tier(1, "N-ENTRY", "Smallest native pipeline worker", 2, 4, 750_000, 1, None),
        tier(2, "N-LOW", "Light native pipelines", 4, 8, 1_500_000, 1, Some(TierRange::new(1, 1))),
        tier(3, "N-MED", "Medium native pipelines", 8, 16, 3_000_000, 2, Some(TierRange::new(1, 2))),
        tier(4, "N-HIGH", "Heavy native pipelines", 16, 32, 6_000_000, 2, Some(TierRange::new(1, 3))),
        tier(5, "N-ULTRA", "Heaviest native pipelines", 32, 64, 12_000_000, 3, Some(TierRange::new(2, 3))),
    ]
}

fn service_tiers() -> Vec<ComputeTier> {
    vec![
        tier(1, "PGSQL-S", "Small managed database", 2, 4, 1_250_000, 1, None),
        tier(2, "PGSQL-M", "Medium managed database", 4, 8, 2_500_000, 2, None),
        tier(3, "PGSQL-L", "Large managed database", 8, 16, 5_000_000, 2, None),
    ]
}

fn gpu_tiers() -> Vec<GpuTier> {
    vec![
        GpuTier {
            id: 1,
            name: "RTX4090".to_string(),
            gpu_models: vec![
                "NVIDIA GeForce RTX 4090".to_string(),
                "NVIDIA GeForce RTX 3090".to_string(),
            ],
            price_per_epoch: U256::from(4_000_000u64),
            minimal_balancing_nodes: 1,
            support_range_by_job_type: HashMap::from([
                (JobType::Generic, TierRange::new(3, 6)),
                (JobType::Native, TierRange::new(2, 4)),
            ]),
        },
        GpuTier {
            id: 2,
            name: "A100".to_string(),
            gpu_models: vec![
                "NVIDIA A100 80GB PCIe".to_string(),
                "NVIDIA A100-SXM4-80GB".to_string(),
            ],
            price_per_epoch: U256::from(12_000_000u64),
            minimal_balancing_nodes: 1,
            support_range_by_job_type: HashMap::from([
                (JobType::Generic, TierRange::new(4, 7)),
                (JobType::Native, TierRange::new(3, 5)),
            ]),
        },
        GpuTier {
            id: 3,
            name: "H100".to_string(),
            gpu_models: vec![
                "NVIDIA H100 80GB HBM3".to_string(),
                "NVIDIA H100 PCIe".to_string(),
            ],
            price_per_epoch: U256::from(24_000_000u64),
            minimal_balancing_nodes: 1,
            support_range_by_job_type: HashMap::from([
                (JobType::Generic, TierRange::new(5, 7)),
                (JobType::Native, TierRange::new(4, 5)),
            ]),
        },
    ]
}

impl ReferenceTables {
    pub fn builtin() -> Self {
        Self {
            container_tiers: container_tiers(),
            worker_tiers: worker_tiers(),
            service_tiers: service_tiers(),
            gpu_tiers: gpu_tiers(),
        }
    }

    pub fn tiers_for(&self, job_type: JobType) -> &[ComputeTier] {
        match job_type {
            JobType::Generic => &self.container_tiers,
            JobType::Native => &self.worker_tiers,
            JobType::Service => &self.service_tiers,
        }
    }

    /// Name lookup within the table for a job type. `None` is a
    /// configuration error for callers, never a silent default.
    pub fn tier_for(&self, job_type: JobType, name: &str) -> Option<&ComputeTier> {
        find_tier_by_name(self.tiers_for(job_type), name)
    }

    pub fn gpu_tier(&self, name: &str) -> Option<&GpuTier> {
        self.gpu_tiers
            .iter()
            .find(|gpu| gpu.name.eq_ignore_ascii_case(name))
    }

    /// GPU tiers a compute tier can attach for a job type.
    pub fn gpu_tiers_for(&self, job_type: JobType, tier: &ComputeTier) -> Vec<&GpuTier> {
        self.gpu_tiers
            .iter()
            .filter(|gpu| gpu.supports(job_type, tier))
            .collect()
    }
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self::builtin()
    }
}

pub fn find_tier_by_name<'a>(tiers: &'a [ComputeTier], name: &str) -> Option<&'a ComputeTier> {
    tiers.iter().find(|t| t.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        let tables = ReferenceTables::builtin();
        let tier = tables.tier_for(JobType::Generic, "MED1").unwrap();
        assert_eq!(tier.id, 4);
        assert_eq!(tier.cores, 8);

        // Lookups are case-insensitive but never fall back to a default
        assert!(tables.tier_for(JobType::Generic, "med1").is_some());
        assert!(tables.tier_for(JobType::Generic, "NO-SUCH-TIER").is_none());
        assert!(tables.tier_for(JobType::Service, "MED1").is_none());
    }

    #[test]
    fn test_ordinals_are_unique_per_table() {
        let tables = ReferenceTables::builtin();
        for tiers in [
            &tables.container_tiers,
            &tables.worker_tiers,
            &tables.service_tiers,
        ] {
            let mut ids: Vec<u32> = tiers.iter().map(|t| t.id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), tiers.len());
        }
    }

    #[test]
    fn test_gpu_ranges_point_at_existing_tiers() {
        let tables = ReferenceTables::builtin();
        for gpu in &tables.gpu_tiers {
            for (job_type, range) in &gpu.support_range_by_job_type {
                let tiers = tables.tiers_for(*job_type);
                assert!(tiers.iter().any(|t| range.contains(t.id)));
            }
        }
    }

    #[test]
    fn test_gpu_tiers_for_respects_job_type_range() {
        let tables = ReferenceTables::builtin();
        let entry = tables.tier_for(JobType::Generic, "ENTRY").unwrap();
        assert!(tables.gpu_tiers_for(JobType::Generic, entry).is_empty());

        let ultra = tables.tier_for(JobType::Generic, "ULTRA").unwrap();
        let names: Vec<&str> = tables
            .gpu_tiers_for(JobType::Generic, ultra)
            .iter()
            .map(|g| g.name.as_str())
            .collect();
        assert_eq!(names, vec!["A100", "H100"]);
    }
}
