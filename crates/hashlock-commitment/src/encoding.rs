//! Canonical packed encoding.
//!
//! Fixed width, fixed order, no length prefixes and no padding between
//! fields: addresses are 20 bytes, integers are 32-byte big-endian words,
//! hashes are written raw. The byte layout is part of the protocol; a
//! counter-chain script recomputing a fingerprint must see the same bytes.

use hashlock_types::constants::WORD_SIZE;
use hashlock_types::{Address, Fingerprint, LegacySecretHash, SecretHash, TokenId, U256};

use crate::digest::ripemd160;

/// Append-only builder for the packed encoding of one commitment tuple.
#[derive(Debug, Default)]
pub struct CanonicalEncoder {
    buf: Vec<u8>,
}

impl CanonicalEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(6 * WORD_SIZE),
        }
    }

    pub fn address(&mut self, address: &Address) -> &mut Self {
        self.buf.extend_from_slice(address.as_slice());
        self
    }

    /// A `uint256` as one 32-byte big-endian word.
    pub fn uint(&mut self, value: U256) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes::<WORD_SIZE>());
        self
    }

    pub fn token_id(&mut self, id: TokenId) -> &mut Self {
        self.uint(id.0)
    }

    pub fn secret_hash(&mut self, hash: &SecretHash) -> &mut Self {
        self.buf.extend_from_slice(hash.0.as_slice());
        self
    }

    pub fn legacy_secret_hash(&mut self, hash: &LegacySecretHash) -> &mut Self {
        self.buf.extend_from_slice(hash.0.as_slice());
        self
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// `RIPEMD160(encoding)`.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::new(ripemd160(&self.buf))
    }
}
