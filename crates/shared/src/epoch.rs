//! Calendar time to network epoch conversion.
//!
//! Epochs are anchored to a per-environment genesis timestamp. Test
//! networks run accelerated epochs so that multi-epoch flows can be
//! exercised in hours instead of weeks.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::DeeployError;

/// Fixed settlement convention: a "month" is 31 epochs, regardless of the
/// calendar. The on-chain escrow uses the same constant; do not derive this
/// from real month lengths.
pub const EPOCHS_PER_MONTH: u64 = 31;

const EPOCH_SECS_MAINNET: i64 = 86_400;
/// Acceleration factor applied off mainnet.
const EPOCH_ACCELERATION: i64 = 24;

const MAINNET_GENESIS: i64 = 1_704_067_200; // 2024-01-01T00:00:00Z
const TESTNET_GENESIS: i64 = 1_735_689_600; // 2025-01-01T00:00:00Z
const DEVNET_GENESIS: i64 = 1_740_787_200; // 2025-03-01T00:00:00Z

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Mainnet,
    Testnet,
    Devnet,
}

impl Default for Environment {
    fn default() -> Self {
        if cfg!(feature = "testnet") {
            Environment::Testnet
        } else {
            Environment::Mainnet
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env = match self {
            Environment::Mainnet => "mainnet",
            Environment::Testnet => "testnet",
            Environment::Devnet => "devnet",
        };
        write!(f, "{}", env)
    }
}

impl FromStr for Environment {
    type Err = DeeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Environment::Mainnet),
            "testnet" => Ok(Environment::Testnet),
            "devnet" => Ok(Environment::Devnet),
            other => Err(DeeployError::Custom(format!(
                "Unknown environment: {}",
                other
            ))),
        }
    }
}

pub fn genesis_timestamp(env: Environment) -> i64 {
    match env {
        Environment::Mainnet => MAINNET_GENESIS,
        Environment::Testnet => TESTNET_GENESIS,
        Environment::Devnet => DEVNET_GENESIS,
    }
}

pub fn epoch_duration_secs(env: Environment) -> i64 {
    match env {
        Environment::Mainnet => EPOCH_SECS_MAINNET,
        Environment::Testnet | Environment::Devnet => EPOCH_SECS_MAINNET / EPOCH_ACCELERATION,
    }
}

/// Epoch containing `timestamp`. Floors, never rounds: a partial epoch is
/// never counted as complete.
pub fn epoch_of_timestamp(timestamp: i64, genesis: i64, env: Environment) -> i64 {
    (timestamp - genesis).div_euclid(epoch_duration_secs(env))
}

/// Timestamp exactly `epochs` epochs after `base`. Inverse of
/// `epoch_of_timestamp` for integer epoch counts.
pub fn timestamp_of_epoch_offset(base: i64, epochs: i64, env: Environment) -> i64 {
    base + epochs * epoch_duration_secs(env)
}

pub fn current_epoch(env: Environment) -> i64 {
    epoch_of_timestamp(Utc::now().timestamp(), genesis_timestamp(env), env)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_duration_is_accelerated_off_mainnet() {
        assert_eq!(epoch_duration_secs(Environment::Mainnet), 86_400);
        assert_eq!(epoch_duration_secs(Environment::Testnet), 3_600);
        assert_eq!(epoch_duration_secs(Environment::Devnet), 3_600);
    }

    #[test]
    fn test_partial_epochs_floor() {
        let genesis = genesis_timestamp(Environment::Mainnet);
        // One second short of a full epoch is still epoch 0
        assert_eq!(
            epoch_of_timestamp(genesis + 86_399, genesis, Environment::Mainnet),
            0
        );
        assert_eq!(
            epoch_of_timestamp(genesis + 86_400, genesis, Environment::Mainnet),
            1
        );
        // Before genesis floors downward, not toward zero
        assert_eq!(
            epoch_of_timestamp(genesis - 1, genesis, Environment::Mainnet),
            -1
        );
    }

    #[test]
    fn test_current_epoch_tracks_the_environment_clock() {
        for env in [
            Environment::Mainnet,
            Environment::Testnet,
            Environment::Devnet,
        ] {
            let before = epoch_of_timestamp(Utc::now().timestamp(), genesis_timestamp(env), env);
            let epoch = current_epoch(env);
            let after = epoch_of_timestamp(Utc::now().timestamp(), genesis_timestamp(env), env);
            // All genesis timestamps are in the past
            assert!(epoch >= 0);
            assert!(before <= epoch && epoch <= after);
        }
    }

    #[test]
    fn test_epoch_round_trip() {
        for env in [
            Environment::Mainnet,
            Environment::Testnet,
            Environment::Devnet,
        ] {
            let genesis = genesis_timestamp(env);
            for e in [0i64, 1, 7, 31, 365, 10_000] {
                let ts = timestamp_of_epoch_offset(genesis, e, env);
                assert_eq!(epoch_of_timestamp(ts, genesis, env), e);
            }
        }
    }
}
