//! Contract wallet keyring
//!
//! Maps smart-contract-wallet proxy addresses to the owner key-pairs allowed
//! to sign for them. The first owner of each proxy is the active signer.
//!
//! Hosts drive the keyring through a fixed lifecycle:
//! construct → `deserialize` → {`get_accounts`, `add_accounts`,
//! `sign_transaction`, `sign_message`} → `serialize`.

mod address;
mod owner;
mod transaction;

pub use address::ProxyAddress;
pub use owner::{OwnerKey, PRIVATE_KEY_LEN};
pub use transaction::{SignableTransaction, UnsignedTransaction};

use crate::audit::{AuditLog, AuditRecord};
use crate::{Error, Result};
use alloy::primitives::{hex, B256};
use async_trait::async_trait;
use indexmap::IndexMap;
use secrecy::ExposeSecret;
use tokio::sync::RwLock;

/// Type name the host registry routes account requests by
pub const KEYRING_TYPE: &str = "Universal Login Wallet Keyring";

/// Persisted shape: proxy address → private keys (hex, no prefix), in signing order
pub type SerializedKeyring = IndexMap<String, Vec<String>>;

type ProxyMap = IndexMap<ProxyAddress, Vec<OwnerKey>>;

const DIGEST_LEN: usize = 32;

/// The contract the host wallet controller calls keyrings through
#[async_trait]
pub trait Keyring: Send + Sync {
    fn keyring_type(&self) -> &'static str;

    async fn serialize(&self) -> Result<SerializedKeyring>;

    /// Replace all state. Fails without touching the current state.
    async fn deserialize(&self, input: SerializedKeyring) -> Result<()>;

    /// Generate `n` owners and return every known address
    async fn add_accounts(&self, n: usize) -> Result<Vec<ProxyAddress>>;

    async fn get_accounts(&self) -> Result<Vec<ProxyAddress>>;

    /// Sign with the proxy's first owner and hand the same value back
    async fn sign_transaction<T>(&self, address: &str, transaction: T) -> Result<T>
    where
        T: SignableTransaction + Send + 'static;

    /// Raw ECDSA over a 32-byte hex digest; returns `0x` + r ‖ s ‖ v
    async fn sign_message(&self, address: &str, data: &str) -> Result<String>;

    async fn export_account(&self, address: &str) -> Result<String>;
}

/// Keyring holding owner keys for contract wallet proxies
#[derive(Debug, Default)]
pub struct ContractWalletKeyring {
    proxies: RwLock<ProxyMap>,
    audit: Option<AuditLog>,
}

impl ContractWalletKeyring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct pre-loaded with serialized key material
    pub fn from_serialized(input: SerializedKeyring) -> Result<Self> {
        Ok(Self {
            proxies: RwLock::new(decode_proxies(input)?),
            audit: None,
        })
    }

    /// Record every add/sign/export in `audit`
    pub fn with_audit_log(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    /// EIP-191 `personal_sign` with the proxy's first owner
    pub async fn sign_personal_message(&self, address: &str, message: &[u8]) -> Result<String> {
        let result = self
            .with_active_owner(address, |owner| owner.sign_personal_message(message))
            .await
            .map(|signature| hex::encode_prefixed(signature.as_bytes()));

        self.record_audit("sign_personal_message", address, &result).await;
        result
    }

    /// Run `f` against the first owner of `account`
    async fn with_active_owner<R>(
        &self,
        account: &str,
        f: impl FnOnce(&OwnerKey) -> Result<R>,
    ) -> Result<R> {
        let proxies = self.proxies.read().await;
        let owners = wallets_for_account(&proxies, account)?;
        let owner = owners
            .first()
            .ok_or_else(|| Error::NoKey(account.to_string()))?;
        f(owner)
    }

    async fn record_audit<T>(&self, operation: &str, address: &str, result: &Result<T>) {
        if let Some(audit) = &self.audit {
            let normalized = ProxyAddress::parse(address)
                .map(|a| a.to_string())
                .unwrap_or_else(|_| address.to_string());
            audit
                .record(
                    AuditRecord::new(operation)
                        .address(&normalized)
                        .outcome(result),
                )
                .await;
        }
    }
}

#[async_trait]
impl Keyring for ContractWalletKeyring {
    fn keyring_type(&self) -> &'static str {
        KEYRING_TYPE
    }

    async fn serialize(&self) -> Result<SerializedKeyring> {
        let proxies = self.proxies.read().await;

        Ok(proxies
            .iter()
            .map(|(address, owners)| {
                let keys = owners
                    .iter()
                    .map(|owner| owner.private_key_hex().expose_secret().to_string())
                    .collect();
                (address.to_string(), keys)
            })
            .collect())
    }

    async fn deserialize(&self, input: SerializedKeyring) -> Result<()> {
        let decoded = decode_proxies(input)?;
        tracing::debug!(proxies = decoded.len(), "Deserialized keyring");

        *self.proxies.write().await = decoded;
        Ok(())
    }

    async fn add_accounts(&self, n: usize) -> Result<Vec<ProxyAddress>> {
        if n == 0 {
            return Err(Error::InvalidArgument(
                "add_accounts requires at least one account".to_string(),
            ));
        }

        // Keyed by the owner's own address until linked to a deployed proxy
        let generated: Vec<OwnerKey> = (0..n).map(|_| OwnerKey::generate()).collect();

        let accounts = {
            let mut proxies = self.proxies.write().await;
            for owner in generated {
                let address = ProxyAddress::from(owner.address());
                tracing::info!(address = %address, "Generated owner key");
                proxies.entry(address).or_default().push(owner);
            }
            proxies.keys().copied().collect::<Vec<_>>()
        };

        if let Some(audit) = &self.audit {
            audit.record(AuditRecord::new("add_accounts").count(n)).await;
        }

        Ok(accounts)
    }

    async fn get_accounts(&self) -> Result<Vec<ProxyAddress>> {
        Ok(self.proxies.read().await.keys().copied().collect())
    }

    async fn sign_transaction<T>(&self, address: &str, mut transaction: T) -> Result<T>
    where
        T: SignableTransaction + Send + 'static,
    {
        let result = self
            .with_active_owner(address, |owner| transaction.sign(&owner.private_key()))
            .await;

        self.record_audit("sign_transaction", address, &result).await;
        result.map(|()| transaction)
    }

    async fn sign_message(&self, address: &str, data: &str) -> Result<String> {
        let result = self
            .with_active_owner(address, |owner| owner.sign_hash(&decode_digest(data)?))
            .await
            .map(|signature| hex::encode_prefixed(signature.as_bytes()));

        self.record_audit("sign_message", address, &result).await;
        result
    }

    async fn export_account(&self, address: &str) -> Result<String> {
        let result = Err(Error::Unsupported);
        self.record_audit("export_account", address, &result).await;
        result
    }
}

/// Normalize `account` and return its owners
fn wallets_for_account<'a>(proxies: &'a ProxyMap, account: &str) -> Result<&'a [OwnerKey]> {
    let address = ProxyAddress::parse(account)
        .map_err(|_| Error::NoKey(account.to_string()))?;

    tracing::debug!(address = %address, "Looking up owners");

    proxies
        .get(&address)
        .map(Vec::as_slice)
        .ok_or_else(|| Error::NoKey(address.to_string()))
}

/// Decode a full replacement map; any bad entry fails the whole batch
fn decode_proxies(input: SerializedKeyring) -> Result<ProxyMap> {
    let mut proxies = ProxyMap::with_capacity(input.len());

    for (address, keys) in input {
        let address = ProxyAddress::parse(&address)?;
        if keys.is_empty() {
            tracing::debug!(address = %address, "Skipping proxy without owners");
            continue;
        }

        let owners = keys
            .iter()
            .map(|key| OwnerKey::from_hex(key))
            .collect::<Result<Vec<_>>>()?;

        proxies.entry(address).or_default().extend(owners);
    }

    Ok(proxies)
}

/// Strip the prefix and decode exactly 32 bytes
fn decode_digest(data: &str) -> Result<B256> {
    let trimmed = data.trim();
    let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);

    let bytes =
        hex::decode(trimmed).map_err(|e| Error::Decode(format!("Invalid message hex: {}", e)))?;

    if bytes.len() != DIGEST_LEN {
        return Err(Error::Decode(format!(
            "Message must be exactly 32 bytes, got {}",
            bytes.len()
        )));
    }

    Ok(B256::from_slice(&bytes))
}
