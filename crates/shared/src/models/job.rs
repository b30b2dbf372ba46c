use std::fmt;
use std::str::FromStr;

use redis::{ErrorKind, FromRedisValue, RedisError, RedisResult, RedisWrite, ToRedisArgs, Value};
use serde::{Deserialize, Serialize};

use crate::error::DeeployError;
use crate::models::deployment::DeploymentConfig;
use crate::models::tier::ComputeTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "GENERIC")]
    Generic,
    #[serde(rename = "NATIVE")]
    Native,
    #[serde(rename = "SERVICE")]
    Service,
}

impl FromStr for JobType {
    type Err = DeeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GENERIC" => Ok(JobType::Generic),
            "NATIVE" => Ok(JobType::Native),
            "SERVICE" => Ok(JobType::Service),
            other => Err(DeeployError::Custom(format!(
                "Unknown job type: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let job_type = match self {
            JobType::Generic => "GENERIC",
            JobType::Native => "NATIVE",
            JobType::Service => "SERVICE",
        };
        write!(f, "{}", job_type)
    }
}

/// Sizing and placement choices from the job form. Tier and GPU are carried
/// by name and resolved against the reference tables at cost/build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpecifications {
    pub alias: String,
    pub job_type: JobType,
    pub target_nodes_count: u32,
    pub compute_tier_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_tier_name: Option<String>,
    #[serde(default)]
    pub job_tags: Vec<String>,
    #[serde(default)]
    pub node_countries: Vec<String>,
}

impl JobSpecifications {
    /// True when the requested node count is under the tier's minimal
    /// balancing count. The pipeline still computes costs for such jobs;
    /// callers surface the warning.
    pub fn below_minimal_balancing(&self, tier: &ComputeTier) -> bool {
        self.target_nodes_count < tier.minimal_balancing_nodes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostAndDuration {
    pub duration_months: u32,
    pub payment_months_count: u32,
}

impl CostAndDuration {
    pub fn validate(&self) -> Result<(), DeeployError> {
        if self.duration_months == 0 {
            return Err(DeeployError::InvalidDuration(
                "duration_months must be positive".to_string(),
            ));
        }
        if self.payment_months_count == 0 {
            return Err(DeeployError::InvalidDuration(
                "payment_months_count must be positive".to_string(),
            ));
        }
        if self.payment_months_count > self.duration_months {
            return Err(DeeployError::InvalidDuration(format!(
                "payment_months_count {} exceeds duration_months {}",
                self.payment_months_count, self.duration_months
            )));
        }
        Ok(())
    }
}

/// A completed job form, before the draft store has assigned an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    pub project_hash: String,
    pub specifications: JobSpecifications,
    pub cost_and_duration: CostAndDuration,
    pub deployment: DeploymentConfig,
}

/// A draft or running job. `id` is assigned by the draft store; `paid`
/// flips once the escrow payment confirms on chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub id: u64,
    pub project_hash: String,
    pub job_type: JobType,
    pub specifications: JobSpecifications,
    pub cost_and_duration: CostAndDuration,
    pub deployment: DeploymentConfig,
    #[serde(default)]
    pub paid: bool,
}

impl TryFrom<JobRequest> for Job {
    type Error = DeeployError;

    fn try_from(request: JobRequest) -> Result<Self, Self::Error> {
        request.cost_and_duration.validate()?;

        if request.specifications.target_nodes_count == 0 {
            return Err(DeeployError::InvalidNodeCount(0));
        }

        let job_type = request.deployment.job_type();
        if request.specifications.job_type != job_type {
            return Err(DeeployError::JobTypeMismatch {
                expected: request.specifications.job_type,
                found: job_type,
            });
        }

        Ok(Job {
            id: 0,
            project_hash: request.project_hash,
            job_type,
            specifications: request.specifications,
            cost_and_duration: request.cost_and_duration,
            deployment: request.deployment,
            paid: false,
        })
    }
}

impl FromRedisValue for Job {
    fn from_redis_value(v: &Value) -> RedisResult<Self> {
        match v {
            Value::BulkString(s) => {
                let job: Job = serde_json::from_slice(s).map_err(|_| {
                    RedisError::from((
                        ErrorKind::TypeError,
                        "Failed to deserialize Job from string",
                        format!("Invalid JSON string: {:?}", s),
                    ))
                })?;
                Ok(job)
            }
            _ => Err(RedisError::from((
                ErrorKind::TypeError,
                "Response type not compatible with Job",
                format!("Received: {:?}", v),
            ))),
        }
    }
}

impl ToRedisArgs for Job {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + RedisWrite,
    {
        let job_json = serde_json::to_string(self).expect("Failed to serialize Job to JSON");
        out.write_arg(job_json.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::deployment::{ContainerRegistry, GenericDeployment};

    fn generic_deployment() -> DeploymentConfig {
        DeploymentConfig::Generic(GenericDeployment {
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
        })
    }

    fn request() -> JobRequest {
        JobRequest {
            project_hash: "0xabc".to_string(),
            specifications: JobSpecifications {
                alias: "web".to_string(),
                job_type: JobType::Generic,
                target_nodes_count: 2,
                compute_tier_name: "ENTRY".to_string(),
                gpu_tier_name: None,
                job_tags: vec![],
                node_countries: vec![],
            },
            cost_and_duration: CostAndDuration {
                duration_months: 3,
                payment_months_count: 1,
            },
            deployment: generic_deployment(),
        }
    }

    #[test]
    fn test_job_type_parse_rejects_unknown_names() {
        assert_eq!("generic".parse::<JobType>().unwrap(), JobType::Generic);
        assert_eq!("NATIVE".parse::<JobType>().unwrap(), JobType::Native);
        assert_eq!("Service".parse::<JobType>().unwrap(), JobType::Service);
        assert!(matches!(
            "generc".parse::<JobType>(),
            Err(DeeployError::Custom(_))
        ));
    }

    #[test]
    fn test_request_becomes_unpaid_draft() {
        let job = Job::try_from(request()).unwrap();
        assert_eq!(job.id, 0);
        assert!(!job.paid);
        assert_eq!(job.job_type, JobType::Generic);
    }

    #[test]
    fn test_zero_nodes_rejected() {
        let mut req = request();
        req.specifications.target_nodes_count = 0;
        assert!(matches!(
            Job::try_from(req),
            Err(DeeployError::InvalidNodeCount(0))
        ));
    }

    #[test]
    fn test_payment_longer_than_duration_rejected() {
        let mut req = request();
        req.cost_and_duration.payment_months_count = 4;
        assert!(matches!(
            Job::try_from(req),
            Err(DeeployError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_job_type_must_match_deployment() {
        let mut req = request();
        req.specifications.job_type = JobType::Service;
        assert!(matches!(
            Job::try_from(req),
            Err(DeeployError::JobTypeMismatch { .. })
        ));
    }
}
