//! Error types for the contract wallet keyring

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed hex, wrong-length key or address, or an invalid secp256k1 scalar
    #[error("Decode error: {0}")]
    Decode(String),

    /// Carries the address that missed
    #[error("Contract Wallet Keyring - Unable to find matching address.")]
    NoKey(String),

    #[error("Not supported on this contract wallet")]
    Unsupported,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
