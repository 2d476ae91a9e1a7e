//! Proxy address normalization
//!
//! Hosts hand us addresses in whatever shape their UI produced: checksummed,
//! upper-case, with or without the `0x` prefix. Every lookup goes through
//! [`ProxyAddress::parse`] so all of those resolve to the same map key.

use crate::{Error, Result};
use alloy::primitives::{hex, Address};
use std::fmt;

const ADDRESS_LEN: usize = 20;

/// Canonical form of a smart-contract-wallet proxy address.
///
/// Displays as `0x` followed by 40 lower-case hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProxyAddress(Address);

impl ProxyAddress {
    /// Parse any textual form of a 20-byte address.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let stripped = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let bytes = hex::decode(stripped)
            .map_err(|e| Error::Decode(format!("Invalid address {:?}: {}", input, e)))?;

        if bytes.len() != ADDRESS_LEN {
            return Err(Error::Decode(format!(
                "Invalid address {:?}: expected 20 bytes, got {}",
                input,
                bytes.len()
            )));
        }

        Ok(Self(Address::from_slice(&bytes)))
    }
}

impl From<Address> for ProxyAddress {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl fmt::Display for ProxyAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}
