use std::path::Path;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use shared::epoch::Environment;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub redis_url: Option<String>,
    pub private_key: Option<String>,
    pub environment: Option<String>,
}

impl Config {
    pub fn load(config_path: &Option<String>, env_file: &str) -> Result<Self> {
        dotenv::from_filename(env_file).ok();

        let mut config = if let Some(path) = config_path {
            Self::load_from_file(path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        Ok(config)
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    pub fn load_from_env(&mut self) {
        if let Ok(redis_url) = std::env::var("REDIS_URL") {
            self.redis_url = Some(redis_url);
        }
        if let Ok(private_key) = std::env::var("PRIVATE_KEY") {
            self.private_key = Some(private_key);
        }
        if let Ok(environment) = std::env::var("DEEPLOY_ENV") {
            self.environment = Some(environment);
        }
    }

    pub fn environment(&self) -> Result<Environment> {
        match &self.environment {
            Some(env) => env
                .parse()
                .map_err(|e| eyre::eyre!("Invalid environment: {}", e)),
            None => Ok(Environment::default()),
        }
    }

    pub fn redis_url(&self) -> &str {
        self.redis_url.as_deref().unwrap_or("redis://127.0.0.1/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_override_selects_network() {
        let config = Config {
            environment: Some("testnet".to_string()),
            ..Default::default()
        };
        assert_eq!(config.environment().unwrap(), Environment::Testnet);

        let config = Config {
            environment: Some("devnet".to_string()),
            ..Default::default()
        };
        assert_eq!(config.environment().unwrap(), Environment::Devnet);
    }

    #[test]
    fn test_unset_environment_falls_back_to_default() {
        let config = Config::default();
        assert_eq!(config.environment().unwrap(), Environment::default());
    }

    #[test]
    fn test_invalid_environment_is_rejected() {
        let config = Config {
            environment: Some("stagenet".to_string()),
            ..Default::default()
        };
        assert!(config.environment().is_err());
    }
}
