//! Configuration for the keyring host
//!
//! Resolution order:
//! 1. JSON file passed with `--config` (or defaults)
//! 2. Env overrides: `KEYRING_PATH`, `KEYRING_AUDIT_LOG`, `KEYRING_CHAIN_ID`
//!
//! ```bash
//! export KEYRING_PATH="$HOME/.keyring/keyring.json"
//! export KEYRING_AUDIT_LOG=""        # empty disables the audit trail
//! export KEYRING_CHAIN_ID=8453
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable names
pub mod env_vars {
    pub const KEYRING_PATH: &str = "KEYRING_PATH";
    pub const KEYRING_AUDIT_LOG: &str = "KEYRING_AUDIT_LOG";
    pub const KEYRING_CHAIN_ID: &str = "KEYRING_CHAIN_ID";
}

/// Main configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyringConfig {
    /// Where the serialized keyring is persisted
    #[serde(default = "default_keyring_path")]
    pub keyring_path: PathBuf,
    /// Path to audit log file
    #[serde(default = "default_audit_log_path")]
    pub audit_log_path: Option<String>,
    /// EIP-155 chain id pinned into transactions before signing
    #[serde(default)]
    pub chain_id: Option<u64>,
}

fn default_keyring_path() -> PathBuf {
    PathBuf::from("keyring.json")
}

fn default_audit_log_path() -> Option<String> {
    Some("keyring-audit.jsonl".to_string())
}

impl Default for KeyringConfig {
    fn default() -> Self {
        Self {
            keyring_path: default_keyring_path(),
            audit_log_path: default_audit_log_path(),
            chain_id: None,
        }
    }
}

impl KeyringConfig {
    /// Read a JSON config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Optional file, then process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, which maps env var names to values
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        if let Some(path) = lookup(env_vars::KEYRING_PATH) {
            tracing::debug!("Using KEYRING_PATH for keyring file");
            self.keyring_path = PathBuf::from(path);
        }

        if let Some(path) = lookup(env_vars::KEYRING_AUDIT_LOG) {
            self.audit_log_path = if path.trim().is_empty() {
                None
            } else {
                Some(path)
            };
        }

        if let Some(chain_id) = lookup(env_vars::KEYRING_CHAIN_ID) {
            let chain_id = chain_id.trim().parse::<u64>().map_err(|e| {
                Error::Config(format!(
                    "{} must be an integer, got {:?}: {}",
                    env_vars::KEYRING_CHAIN_ID,
                    chain_id,
                    e
                ))
            })?;
            self.chain_id = Some(chain_id);
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn config_deserialize_defaults() {
        let parsed: KeyringConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(parsed, KeyringConfig::default());
        assert_eq!(parsed.keyring_path, PathBuf::from("keyring.json"));
        assert_eq!(parsed.audit_log_path.as_deref(), Some("keyring-audit.jsonl"));
        assert_eq!(parsed.chain_id, None);
    }

    #[test]
    fn config_deserialize_explicit() {
        let value = serde_json::json!({
            "keyring_path": "/var/lib/keyring.json",
            "audit_log_path": null,
            "chain_id": 1
        });
        let parsed: KeyringConfig = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.keyring_path, PathBuf::from("/var/lib/keyring.json"));
        assert_eq!(parsed.audit_log_path, None);
        assert_eq!(parsed.chain_id, Some(1));
    }

    #[test]
    fn env_overrides_file_values() {
        let config = KeyringConfig::default()
            .with_env_overrides(lookup(&[
                (env_vars::KEYRING_PATH, "/tmp/other.json"),
                (env_vars::KEYRING_AUDIT_LOG, ""),
                (env_vars::KEYRING_CHAIN_ID, "8453"),
            ]))
            .unwrap();

        assert_eq!(config.keyring_path, PathBuf::from("/tmp/other.json"));
        assert_eq!(config.audit_log_path, None);
        assert_eq!(config.chain_id, Some(8453));
    }

    #[test]
    fn invalid_chain_id_is_config_error() {
        let err = KeyringConfig::default()
            .with_env_overrides(lookup(&[(env_vars::KEYRING_CHAIN_ID, "mainnet")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn from_file_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "chain_id": 10 }"#).unwrap();

        let config = KeyringConfig::from_file(&path).unwrap();
        assert_eq!(config.chain_id, Some(10));
        assert_eq!(config.keyring_path, PathBuf::from("keyring.json"));
    }

    #[test]
    fn from_file_missing_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = KeyringConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
