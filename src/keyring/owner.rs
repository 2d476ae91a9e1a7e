//! Owner key-pairs
//!
//! SECURITY: the raw private key lives inside alloy's `PrivateKeySigner`.
//! - Debug output is redacted
//! - Hex export is wrapped in a `SecretString` and only exposed by `serialize`
//! - Keys are never logged

use crate::{Error, Result};
use alloy::primitives::{hex, Address, Signature, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use secrecy::SecretString;

/// Raw private key length in bytes
pub const PRIVATE_KEY_LEN: usize = 32;

/// A secp256k1 key-pair authorized to sign for a proxy
pub struct OwnerKey {
    /// The signer
    signer: PrivateKeySigner,
    /// Address derived from the public key
    address: Address,
}

impl OwnerKey {
    /// Generate a fresh key-pair from the OS CSPRNG
    pub fn generate() -> Self {
        Self::from_signer(PrivateKeySigner::random())
    }

    /// Import a hex-encoded private key, with or without `0x` prefix
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let key_hex = key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let bytes = hex::decode(key_hex)
            .map_err(|e| Error::Decode(format!("Invalid private key hex: {}", e)))?;

        Self::from_bytes(&bytes)
    }

    /// Import raw private key bytes (must be exactly 32 bytes)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_LEN {
            return Err(Error::Decode(format!(
                "Private key must be exactly {} bytes, got {}",
                PRIVATE_KEY_LEN,
                bytes.len()
            )));
        }

        let signer = PrivateKeySigner::from_bytes(&B256::from_slice(bytes))
            .map_err(|e| Error::Decode(format!("Invalid private key: {}", e)))?;

        Ok(Self::from_signer(signer))
    }

    fn from_signer(signer: PrivateKeySigner) -> Self {
        let address = signer.address();
        Self { signer, address }
    }

    /// Public address (safe to share)
    pub fn address(&self) -> Address {
        self.address
    }

    /// Private key as 64 lower-case hex characters, no prefix
    pub fn private_key_hex(&self) -> SecretString {
        SecretString::from(hex::encode(self.signer.to_bytes()))
    }

    /// Raw private key, handed to [`SignableTransaction::sign`](super::SignableTransaction::sign)
    pub(crate) fn private_key(&self) -> B256 {
        self.signer.to_bytes()
    }

    /// ECDSA over a 32-byte digest, no prefixing or hashing
    pub fn sign_hash(&self, hash: &B256) -> Result<Signature> {
        self.signer
            .sign_hash_sync(hash)
            .map_err(|e| Error::Signing(e.to_string()))
    }

    /// EIP-191 `personal_sign` over arbitrary bytes
    pub fn sign_personal_message(&self, message: &[u8]) -> Result<Signature> {
        self.signer
            .sign_message_sync(message)
            .map_err(|e| Error::Signing(e.to_string()))
    }
}

// Implement Debug manually to avoid exposing the signer
impl std::fmt::Debug for OwnerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnerKey")
            .field("address", &self.address)
            .field("signer", &"[REDACTED]")
            .finish()
    }
}
