//! Fixed-width identifiers and byte strings used throughout hashlock.
//!
//! Addresses and 256-bit integers come straight from `alloy-primitives`.
//! The remaining ids are newtypes over its fixed byte arrays so that a swap
//! id can never be passed where a secret is expected: the escrow never
//! interprets these values beyond equality and canonical encoding.

use std::fmt;
use std::str::FromStr;

pub use alloy_primitives::{Address, B256, FixedBytes, U256};
use serde::{Deserialize, Serialize};

use crate::SwapError;

fn parse_error(what: &str, err: impl fmt::Display) -> SwapError {
    SwapError::Serialization(format!("{what}: {err}"))
}

// ---------------------------------------------------------------------------
// SwapId
// ---------------------------------------------------------------------------

/// Opaque 32-byte payment identifier chosen by the initiating caller.
///
/// Unique per payment instance within one registry; re-creating an existing
/// id is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SwapId(pub B256);

impl SwapId {
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(B256::new(bytes))
    }
}

impl fmt::Display for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "swap:{:#}", self.0)
    }
}

impl FromStr for SwapId {
    type Err = SwapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        B256::from_str(s)
            .map(Self)
            .map_err(|e| parse_error("swap id", e))
    }
}

// ---------------------------------------------------------------------------
// Secrets and hashes
// ---------------------------------------------------------------------------

/// A 32-byte swap secret (hash preimage).
///
/// Revealing it on a spend or secret refund publishes it permanently.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Secret(pub B256);

impl Secret {
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(B256::new(bytes))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }
}

// Secrets only show up in logs once they are published, and even then the
// event carries them. Debug output stays redacted.
impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

/// `sha256(secret)`: the 32-byte secret hash used by the v2 Maker/Taker payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecretHash(pub B256);

impl SecretHash {
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(B256::new(bytes))
    }
}

impl fmt::Display for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// `ripemd160(sha256(secret))`: the 20-byte secret hash used by legacy v1 payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LegacySecretHash(pub FixedBytes<20>);

impl LegacySecretHash {
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(FixedBytes::new(bytes))
    }
}

impl fmt::Display for LegacySecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The 20-byte commitment digest stored in place of a payment's parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Fingerprint(pub FixedBytes<20>);

impl Fingerprint {
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(FixedBytes::new(bytes))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Token id of a unique or semi-fungible asset: a full `uint256`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TokenId(pub U256);

impl TokenId {
    pub const ZERO: Self = Self(U256::ZERO);

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<u64> for TokenId {
    fn from(id: u64) -> Self {
        Self(U256::from(id))
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Random identifiers for tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
mod random {
    use super::{Address, Secret, SwapId};

    impl SwapId {
        pub fn random() -> Self {
            Self::new(rand::random())
        }
    }

    impl Secret {
        pub fn random() -> Self {
            Self::new(rand::random())
        }
    }

    /// A random non-zero-with-overwhelming-probability address.
    pub fn random_address() -> Address {
        Address::from(rand::random::<[u8; 20]>())
    }
}

#[cfg(any(test, feature = "test-helpers"))]
pub use random::random_address;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
