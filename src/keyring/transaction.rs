//! Signable transaction capability
//!
//! The keyring never builds or validates transactions. It only hands the
//! active owner's private key to whatever the host passed in.

use crate::{Error, Result};
use alloy::consensus::{SignableTransaction as _, Signed, TypedTransaction};
use alloy::primitives::{ChainId, Signature, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

/// A transaction value that can sign itself in place with a raw private key
pub trait SignableTransaction {
    fn sign(&mut self, private_key: &B256) -> Result<()>;
}

/// An EIP-2718 typed transaction waiting for its signature
#[derive(Debug, Clone)]
pub struct UnsignedTransaction {
    tx: TypedTransaction,
    signature: Option<Signature>,
}

impl UnsignedTransaction {
    pub fn new(tx: impl Into<TypedTransaction>) -> Self {
        Self {
            tx: tx.into(),
            signature: None,
        }
    }

    /// Pin the EIP-155 chain id before signing
    pub fn with_chain_id(mut self, chain_id: ChainId) -> Self {
        self.tx.set_chain_id(chain_id);
        self
    }

    /// Hash the signer commits to
    pub fn signature_hash(&self) -> B256 {
        self.tx.signature_hash()
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Attach the signature, failing if `sign` was never called
    pub fn into_signed(self) -> Result<Signed<TypedTransaction>> {
        let signature = self
            .signature
            .ok_or_else(|| Error::InvalidArgument("Transaction has not been signed".to_string()))?;
        Ok(self.tx.into_signed(signature))
    }
}

impl SignableTransaction for UnsignedTransaction {
    fn sign(&mut self, private_key: &B256) -> Result<()> {
        let signer = PrivateKeySigner::from_bytes(private_key)
            .map_err(|e| Error::Signing(format!("Invalid private key: {}", e)))?;

        let signature = signer
            .sign_hash_sync(&self.signature_hash())
            .map_err(|e| Error::Signing(e.to_string()))?;

        self.signature = Some(signature);
        Ok(())
    }
}
