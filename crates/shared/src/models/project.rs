use alloy::primitives::keccak256;
use chrono::Utc;
use redis::{ErrorKind, FromRedisValue, RedisError, RedisResult, RedisWrite, ToRedisArgs, Value};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named grouping of jobs. `project_hash` is derived from a client-side
/// UUID so that re-submitting the same draft joins the same project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_hash: String,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub created_at: i64,
}

impl Project {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            project_hash: Self::hash_of(&Uuid::new_v4()),
            name: name.into(),
            color: color.into(),
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Deterministic content hash of a client-generated UUID; the same UUID
    /// always yields the same hash.
    pub fn hash_of(id: &Uuid) -> String {
        format!("0x{}", hex::encode(keccak256(id.to_string().as_bytes())))
    }
}

impl FromRedisValue for Project {
    fn from_redis_value(v: &Value) -> RedisResult<Self> {
        match v {
            Value::BulkString(s) => {
                let project: Project = serde_json::from_slice(s).map_err(|_| {
                    RedisError::from((
                        ErrorKind::TypeError,
                        "Failed to deserialize Project from string",
                        format!("Invalid JSON string: {:?}", s),
                    ))
                })?;
                Ok(project)
            }
            _ => Err(RedisError::from((
                ErrorKind::TypeError,
                "Response type not compatible with Project",
                format!("Received: {:?}", v),
            ))),
        }
    }
}

impl ToRedisArgs for Project {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + RedisWrite,
    {
        let project_json =
            serde_json::to_string(self).expect("Failed to serialize Project to JSON");
        out.write_arg(project_json.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let id = Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap();
        let first = Project::hash_of(&id);
        let second = Project::hash_of(&id);
        assert_eq!(first, second);
        assert!(first.starts_with("0x"));
        // keccak256 digest is 32 bytes
        assert_eq!(first.len(), 2 + 64);
    }

    #[test]
    fn test_distinct_ids_hash_differently() {
        assert_ne!(
            Project::hash_of(&Uuid::new_v4()),
            Project::hash_of(&Uuid::new_v4())
        );
    }
}
