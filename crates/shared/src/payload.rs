//! Deployment payload builders.
//!
//! Field names here are wire contract with the deployment backend and must
//! match exactly, including the UPPERCASE plugin data keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cost::resolve_specs;
use crate::error::DeeployError;
use crate::format::{
    format_container_resources, format_dynamic_env_vars, format_env_vars, format_file_volumes,
    format_job_tags, ContainerResources, FileVolume,
};
use crate::models::deployment::{
    DeploymentConfig, DynamicEnvValue, GenericDeployment, ImagePullPolicy, NativeDeployment,
    RestartPolicy, ServiceDeployment,
};
use crate::models::job::{Job, JobSpecifications, JobType};
use crate::signature::generate_nonce;
use crate::tiers::ReferenceTables;

pub const CONTAINER_APP_RUNNER_SIGNATURE: &str = "CONTAINER_APP_RUNNER";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrData {
    #[serde(rename = "SERVER")]
    pub server: String,
    #[serde(rename = "USERNAME", default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(rename = "PASSWORD", default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerAppRunner {
    pub plugin_signature: String,
    #[serde(rename = "IMAGE")]
    pub image: String,
    #[serde(rename = "CR_DATA")]
    pub cr_data: CrData,
    #[serde(rename = "CONTAINER_RESOURCES")]
    pub container_resources: ContainerResources,
    #[serde(rename = "ENV")]
    pub env: BTreeMap<String, String>,
    #[serde(rename = "DYNAMIC_ENV")]
    pub dynamic_env: BTreeMap<String, Vec<DynamicEnvValue>>,
    #[serde(rename = "VOLUMES")]
    pub volumes: BTreeMap<String, FileVolume>,
    #[serde(rename = "RESTART_POLICY")]
    pub restart_policy: RestartPolicy,
    #[serde(rename = "IMAGE_PULL_POLICY")]
    pub image_pull_policy: ImagePullPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeWorker {
    pub plugin_signature: String,
    #[serde(rename = "CUSTOM_PARAMS")]
    pub custom_params: BTreeMap<String, serde_json::Value>,
    #[serde(rename = "PIPELINE_INPUT_TYPE")]
    pub pipeline_input_type: String,
    #[serde(
        rename = "PIPELINE_INPUT_URI",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub pipeline_input_uri: Option<String>,
    #[serde(rename = "CONTAINER_RESOURCES")]
    pub container_resources: ContainerResources,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRunner {
    pub plugin_signature: String,
    #[serde(rename = "ENV")]
    pub env: BTreeMap<String, String>,
    #[serde(
        rename = "SERVICE_REPLICA",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub service_replica: Option<String>,
    #[serde(rename = "CONTAINER_RESOURCES")]
    pub container_resources: ContainerResources,
}

/// Plugin descriptor, one shape per job type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Plugin {
    ContainerAppRunner(ContainerAppRunner),
    NativeWorker(NativeWorker),
    ServiceRunner(ServiceRunner),
}

impl Plugin {
    pub fn plugin_signature(&self) -> &str {
        match self {
            Plugin::ContainerAppRunner(p) => &p.plugin_signature,
            Plugin::NativeWorker(p) => &p.plugin_signature,
            Plugin::ServiceRunner(p) => &p.plugin_signature,
        }
    }
}

/// The job-creation request body. The caller signs it and appends the
/// sender/signature fields before submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPayload {
    pub app_alias: String,
    pub target_nodes_count: u32,
    pub job_tags: Vec<String>,
    pub plugins: Vec<Plugin>,
    pub nonce: String,
}

fn payload_with_plugin(specs: &JobSpecifications, plugin: Plugin) -> JobPayload {
    JobPayload {
        app_alias: specs.alias.clone(),
        target_nodes_count: specs.target_nodes_count,
        job_tags: format_job_tags(specs),
        plugins: vec![plugin],
        nonce: generate_nonce(),
    }
}

pub fn build_generic_job_payload(
    tables: &ReferenceTables,
    specs: &JobSpecifications,
    deployment: &GenericDeployment,
) -> Result<JobPayload, DeeployError> {
    let (tier, gpu) = resolve_specs(tables, JobType::Generic, specs)?;

    let credentials = deployment.registry.credentials.as_ref();
    let plugin = Plugin::ContainerAppRunner(ContainerAppRunner {
        plugin_signature: CONTAINER_APP_RUNNER_SIGNATURE.to_string(),
        image: deployment.image.clone(),
        cr_data: CrData {
            server: deployment.registry.server.clone(),
            username: credentials.map(|c| c.username.clone()),
            password: credentials.map(|c| c.password.clone()),
        },
        container_resources: format_container_resources(tier, gpu, &deployment.ports),
        env: format_env_vars(&deployment.env_vars),
        dynamic_env: format_dynamic_env_vars(&deployment.dynamic_env_vars),
        volumes: format_file_volumes(&deployment.file_volumes),
        restart_policy: deployment.restart_policy,
        image_pull_policy: deployment.image_pull_policy,
    });

    Ok(payload_with_plugin(specs, plugin))
}

pub fn build_native_job_payload(
    tables: &ReferenceTables,
    specs: &JobSpecifications,
    deployment: &NativeDeployment,
) -> Result<JobPayload, DeeployError> {
    let (tier, gpu) = resolve_specs(tables, JobType::Native, specs)?;

    let plugin = Plugin::NativeWorker(NativeWorker {
        plugin_signature: deployment.plugin_signature.clone(),
        custom_params: deployment.custom_params.clone(),
        pipeline_input_type: deployment.pipeline_input_type.clone(),
        pipeline_input_uri: deployment.pipeline_input_uri.clone(),
        container_resources: format_container_resources(tier, gpu, &[]),
    });

    Ok(payload_with_plugin(specs, plugin))
}

pub fn build_service_job_payload(
    tables: &ReferenceTables,
    specs: &JobSpecifications,
    deployment: &ServiceDeployment,
) -> Result<JobPayload, DeeployError> {
    let (tier, gpu) = resolve_specs(tables, JobType::Service, specs)?;

    let plugin = Plugin::ServiceRunner(ServiceRunner {
        plugin_signature: deployment.service_type.to_string(),
        env: format_env_vars(&deployment.env_vars),
        service_replica: deployment.service_replica.clone(),
        container_resources: format_container_resources(tier, gpu, &[]),
    });

    Ok(payload_with_plugin(specs, plugin))
}

/// Dispatch on the deployment variant. Exhaustive: a new job type will not
/// compile until it gets a builder.
pub fn build_job_payload(tables: &ReferenceTables, job: &Job) -> Result<JobPayload, DeeployError> {
    match &job.deployment {
        DeploymentConfig::Generic(deployment) => {
            build_generic_job_payload(tables, &job.specifications, deployment)
        }
        DeploymentConfig::Native(deployment) => {
            build_native_job_payload(tables, &job.specifications, deployment)
        }
        DeploymentConfig::Service(deployment) => {
            build_service_job_payload(tables, &job.specifications, deployment)
        }
    }
}
