//! Formatters that turn raw form rows into the flat map shapes the backend
//! expects. Half-filled rows are treated as absent rather than failing the
//! whole batch; the form layer validates anything stricter.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::deployment::{
    DynamicEnvValue, DynamicEnvVarEntry, EnvVarEntry, FileVolumeEntry, PortMapping,
};
use crate::models::job::JobSpecifications;
use crate::models::tier::{ComputeTier, GpuTier};

/// Resource request attached to every plugin descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerResources {
    pub cpu: u32,
    pub memory: String,
    /// Host port (stringified) to container port.
    pub ports: BTreeMap<String, u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileVolume {
    pub mounting_point: String,
    pub content: String,
}

/// Drops rows with an empty key or a missing value. Empty-string values
/// are kept. Later duplicate keys overwrite earlier ones.
pub fn format_env_vars(entries: &[EnvVarEntry]) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    for entry in entries {
        if entry.key.is_empty() {
            continue;
        }
        if let Some(value) = &entry.value {
            env.insert(entry.key.clone(), value.clone());
        }
    }
    env
}

/// Same empty-key drop rule as `format_env_vars`; the ordered list of typed
/// value descriptors per key is preserved as-is.
pub fn format_dynamic_env_vars(
    entries: &[DynamicEnvVarEntry],
) -> BTreeMap<String, Vec<DynamicEnvValue>> {
    let mut env = BTreeMap::new();
    for entry in entries {
        if entry.key.is_empty() {
            continue;
        }
        env.insert(entry.key.clone(), entry.values.clone());
    }
    env
}

pub fn format_file_volumes(entries: &[FileVolumeEntry]) -> BTreeMap<String, FileVolume> {
    let mut volumes = BTreeMap::new();
    for entry in entries {
        if entry.name.is_empty() {
            continue;
        }
        volumes.insert(
            entry.name.clone(),
            FileVolume {
                mounting_point: entry.mounting_point.clone(),
                content: entry.content.clone(),
            },
        );
    }
    volumes
}

pub fn format_container_resources(
    tier: &ComputeTier,
    gpu: Option<&GpuTier>,
    ports: &[PortMapping],
) -> ContainerResources {
    ContainerResources {
        cpu: tier.cores,
        memory: format!("{}g", tier.ram_gb),
        ports: ports
            .iter()
            .map(|p| (p.host_port.to_string(), p.container_port))
            .collect(),
        gpu: gpu.map(|g| g.name.clone()),
    }
}

/// Caller-supplied tags pass through verbatim. A non-empty country filter
/// appends one OR-joined `CT:` tag as the last element.
pub fn format_job_tags(specs: &JobSpecifications) -> Vec<String> {
    let mut tags = specs.job_tags.clone();
    if !specs.node_countries.is_empty() {
        let country_tag = specs
            .node_countries
            .iter()
            .map(|code| format!("CT:{}", code))
            .collect::<Vec<_>>()
            .join("||");
        tags.push(country_tag);
    }
    tags
}
