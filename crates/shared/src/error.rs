use std::fmt;

use crate::models::job::JobType;

#[derive(Debug)]
pub enum DeeployError {
    UnknownTier(String),
    UnknownGpuTier(String),
    GpuNotSupported { gpu: String, tier: String },
    InvalidNodeCount(u32),
    InvalidDuration(String),
    JobTypeMismatch { expected: JobType, found: JobType },
    Signer(String),
    Redis(redis::RedisError),
    Serialization(serde_json::Error),
    Custom(String),
}

impl fmt::Display for DeeployError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeeployError::UnknownTier(name) => {
                write!(f, "Compute tier not found in reference tables: {}", name)
            }
            DeeployError::UnknownGpuTier(name) => {
                write!(f, "GPU tier not found in reference tables: {}", name)
            }
            DeeployError::GpuNotSupported { gpu, tier } => {
                write!(f, "GPU tier {} is not supported by compute tier {}", gpu, tier)
            }
            DeeployError::InvalidNodeCount(count) => {
                write!(f, "Invalid target node count: {}", count)
            }
            DeeployError::InvalidDuration(msg) => write!(f, "Invalid duration: {}", msg),
            DeeployError::JobTypeMismatch { expected, found } => {
                write!(f, "Job type mismatch: expected {}, found {}", expected, found)
            }
            DeeployError::Signer(msg) => write!(f, "Signer error: {}", msg),
            DeeployError::Redis(e) => write!(f, "Redis error: {}", e),
            DeeployError::Serialization(e) => write!(f, "Serialization error: {}", e),
            DeeployError::Custom(msg) => write!(f, "Deeploy error: {}", msg),
        }
    }
}

impl std::error::Error for DeeployError {}

impl From<redis::RedisError> for DeeployError {
    fn from(err: redis::RedisError) -> Self {
        DeeployError::Redis(err)
    }
}

impl From<serde_json::Error> for DeeployError {
    fn from(err: serde_json::Error) -> Self {
        DeeployError::Serialization(err)
    }
}
