use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::job::JobType;

/// One key/value row from the environment-variables form. A row may be
/// half-filled while the user is typing; the formatters filter those out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EnvVarEntry {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl EnvVarEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

/// How a dynamic environment value is resolved on the node at deploy time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DynamicEnvKind {
    Static,
    NodeAddress,
    NodeEthAddress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicEnvValue {
    #[serde(rename = "type")]
    pub kind: DynamicEnvKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DynamicEnvVarEntry {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub values: Vec<DynamicEnvValue>,
}

/// One row from the file-volumes form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FileVolumeEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mounting_point: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMapping {
    pub host_port: u16,
    pub container_port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryCredentials {
    pub username: String,
    pub password: String,
}

/// Container registry to pull from. Credentials are present only for
/// private registries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerRegistry {
    pub server: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<RegistryCredentials>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RestartPolicy {
    #[default]
    #[serde(rename = "always")]
    Always,
    #[serde(rename = "on-failure")]
    OnFailure,
    #[serde(rename = "unless-stopped")]
    UnlessStopped,
    #[serde(rename = "no")]
    Never,
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let policy = match self {
            RestartPolicy::Always => "always",
            RestartPolicy::OnFailure => "on-failure",
            RestartPolicy::UnlessStopped => "unless-stopped",
            RestartPolicy::Never => "no",
        };
        write!(f, "{}", policy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ImagePullPolicy {
    #[default]
    #[serde(rename = "always")]
    Always,
    #[serde(rename = "if-not-present")]
    IfNotPresent,
    #[serde(rename = "never")]
    Never,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericDeployment {
    pub image: String,
    pub registry: ContainerRegistry,
    #[serde(default)]
    pub ports: Vec<PortMapping>,
    #[serde(default)]
    pub env_vars: Vec<EnvVarEntry>,
    #[serde(default)]
    pub dynamic_env_vars: Vec<DynamicEnvVarEntry>,
    #[serde(default)]
    pub file_volumes: Vec<FileVolumeEntry>,
    #[serde(default)]
    pub restart_policy: RestartPolicy,
    #[serde(default)]
    pub image_pull_policy: ImagePullPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeDeployment {
    /// Signature of the native pipeline plugin to run, e.g. a custom
    /// execution-engine plugin name.
    pub plugin_signature: String,
    #[serde(default)]
    pub custom_params: BTreeMap<String, serde_json::Value>,
    pub pipeline_input_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_input_uri: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    Postgres,
    Mysql,
    Redis,
    Mongo,
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let service = match self {
            ServiceType::Postgres => "POSTGRES",
            ServiceType::Mysql => "MYSQL",
            ServiceType::Redis => "REDIS",
            ServiceType::Mongo => "MONGO",
        };
        write!(f, "{}", service)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDeployment {
    pub service_type: ServiceType,
    /// Address of an existing replica to sync from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_replica: Option<String>,
    #[serde(default)]
    pub env_vars: Vec<EnvVarEntry>,
}

/// Per-job-type deployment parameters. The tag mirrors the job type so a
/// record is self-describing when read back from the draft store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "job_type")]
pub enum DeploymentConfig {
    #[serde(rename = "GENERIC")]
    Generic(GenericDeployment),
    #[serde(rename = "NATIVE")]
    Native(NativeDeployment),
    #[serde(rename = "SERVICE")]
    Service(ServiceDeployment),
}

impl DeploymentConfig {
    pub fn job_type(&self) -> JobType {
        match self {
            DeploymentConfig::Generic(_) => JobType::Generic,
            DeploymentConfig::Native(_) => JobType::Native,
            DeploymentConfig::Service(_) => JobType::Service,
        }
    }
}
