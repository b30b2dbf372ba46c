use std::collections::HashMap;
use std::fmt;

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::models::job::JobType;

/// Inclusive range of tier ordinals, used for GPU compatibility joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRange {
    pub min_id: u32,
    pub max_id: u32,
}

impl TierRange {
    pub fn new(min_id: u32, max_id: u32) -> Self {
        Self { min_id, max_id }
    }

    pub fn contains(&self, id: u32) -> bool {
        self.min_id <= id && id <= self.max_id
    }
}

/// A named bundle of CPU/RAM with a fixed price per epoch, in micro-units
/// of the settlement token. The ordinal `id` is the join key for GPU
/// compatibility checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeTier {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub cores: u32,
    pub ram_gb: u32,
    pub price_per_epoch: U256,
    pub minimal_balancing_nodes: u32,
    /// Range of GPU tier ordinals this tier can attach, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu_support_range: Option<TierRange>,
}

impl fmt::Display for ComputeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} cores / {} GB RAM)",
            self.name, self.cores, self.ram_gb
        )
    }
}

/// A GPU option attachable to compute tiers. Per job type it declares the
/// inclusive range of compute-tier ordinals it can be paired with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuTier {
    pub id: u32,
    pub name: String,
    pub gpu_models: Vec<String>,
    pub price_per_epoch: U256,
    pub minimal_balancing_nodes: u32,
    pub support_range_by_job_type: HashMap<JobType, TierRange>,
}

impl GpuTier {
    /// A GPU tier is usable by a compute tier only if the tier ordinal falls
    /// within this GPU tier's declared range for the given job type.
    pub fn supports(&self, job_type: JobType, tier: &ComputeTier) -> bool {
        self.support_range_by_job_type
            .get(&job_type)
            .map(|range| range.contains(tier.id))
            .unwrap_or(false)
    }
}

impl fmt::Display for GpuTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.gpu_models.join(", "))
    }
}
