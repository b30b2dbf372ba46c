//! Canonical signable messages and request nonces.
//!
//! The backend verifies the wallet signature against its own serialization
//! of the request, so the message built here must be byte-identical no
//! matter how the payload object was assembled: keys sorted at every object
//! level, `address`/`signature` keys stripped at any depth.

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::DeeployError;
use crate::web3::wallet::Wallet;

const EXCLUDED_KEYS: [&str; 2] = ["address", "signature"];

/// Deep copy with excluded keys removed and object keys emitted in
/// lexicographic order at every level.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(obj) => {
            let mut keys: Vec<&String> = obj
                .keys()
                .filter(|k| !EXCLUDED_KEYS.contains(&k.as_str()))
                .collect();
            keys.sort();

            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&obj[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Prefix plus canonical JSON of the payload. This is the exact string the
/// wallet signs.
pub fn build_signable_message<T: Serialize>(
    payload: &T,
    prefix: &str,
) -> Result<String, DeeployError> {
    let value = serde_json::to_value(payload)?;
    let canonical = canonicalize(&value);
    Ok(format!("{}{}", prefix, serde_json::to_string(&canonical)?))
}

/// Opaque request nonce, unique within a session: millisecond timestamp
/// followed by random entropy, hex encoded.
pub fn generate_nonce() -> String {
    let millis = Utc::now().timestamp_millis() as u64;
    let entropy: u64 = rand::random();
    format!(
        "0x{}{}",
        hex::encode(millis.to_be_bytes()),
        hex::encode(entropy.to_be_bytes())
    )
}

/// A payload ready for submission: the original fields plus the sender
/// address and signature the backend authenticates with.
#[derive(Debug, Clone, Serialize)]
pub struct SignedPayload {
    #[serde(flatten)]
    pub payload: Value,
    #[serde(rename = "EE_ETH_SIGN")]
    pub eth_sign: String,
    #[serde(rename = "EE_ETH_SENDER")]
    pub eth_sender: String,
}

/// Sign the canonical message for `payload` and append the submission
/// fields the backend expects.
pub async fn sign_payload<T: Serialize>(
    wallet: &Wallet,
    payload: &T,
    prefix: &str,
) -> Result<SignedPayload, DeeployError> {
    let message = build_signable_message(payload, prefix)?;
    let eth_sign = wallet.sign_message(&message).await?;

    Ok(SignedPayload {
        payload: serde_json::to_value(payload)?,
        eth_sign,
        eth_sender: wallet.address().to_string(),
    })
}
