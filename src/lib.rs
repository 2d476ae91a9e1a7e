//! Contract Wallet Keyring
//!
//! A keyring adapter that lets a wallet host delegate account storage and
//! signing for smart-contract-wallet proxies to locally held owner keys:
//! - Stores owner key-pairs keyed by proxy address
//! - Signs transactions and messages with a proxy's first owner
//! - Serializes to a flat address → private keys mapping for the host to persist
//!
//! # Security Model
//!
//! - Private keys live inside alloy's `PrivateKeySigner` and are never logged
//! - Keys leave the keyring only through `serialize`; `export_account` always fails
//! - Optional audit trail records operations, never key material

pub mod audit;
pub mod config;
pub mod keyring;
pub mod storage;

mod error;

// Re-export commonly used types
pub use audit::AuditLog;
pub use config::KeyringConfig;
pub use error::{Error, Result};
pub use keyring::{
    ContractWalletKeyring, Keyring, OwnerKey, ProxyAddress, SerializedKeyring,
    SignableTransaction, UnsignedTransaction, KEYRING_TYPE,
};
