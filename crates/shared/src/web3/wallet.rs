use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;

use crate::error::DeeployError;

/// Local signing key. Submission payloads are signed with it; no RPC
/// provider is attached because the pipeline never talks to the chain.
pub struct Wallet {
    pub signer: PrivateKeySigner,
}

impl Wallet {
    pub fn new(private_key: &str) -> Result<Self, DeeployError> {
        let signer: PrivateKeySigner = private_key
            .trim_start_matches("0x")
            .parse()
            .map_err(|e| DeeployError::Signer(format!("Invalid private key: {}", e)))?;
        Ok(Self { signer })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// EIP-191 personal-message signature, 0x-prefixed hex.
    pub async fn sign_message(&self, message: &str) -> Result<String, DeeployError> {
        let signature = self
            .signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| DeeployError::Signer(format!("Signing failed: {}", e)))?;
        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_parse_with_or_without_prefix() {
        let bare = Wallet::new("0000000000000000000000000000000000000000000000000000000000000001")
            .unwrap();
        let prefixed =
            Wallet::new("0x0000000000000000000000000000000000000000000000000000000000000001")
                .unwrap();
        assert_eq!(bare.address(), prefixed.address());
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        assert!(matches!(
            Wallet::new("not-a-key"),
            Err(DeeployError::Signer(_))
        ));
    }

    #[tokio::test]
    async fn test_signature_encoding() {
        let wallet =
            Wallet::new("0000000000000000000000000000000000000000000000000000000000000001")
                .unwrap();
        let signature = wallet.sign_message("hello").await.unwrap();
        assert!(signature.starts_with("0x"));
        assert_eq!(signature.len(), 132);
    }
}
