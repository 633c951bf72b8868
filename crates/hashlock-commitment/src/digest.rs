//! Hash primitives and preimage folding.
//!
//! A candidate secret never meets the stored fingerprint directly. It is
//! first folded through the variant's preimage digest and the result takes
//! the secret-hash slot of the commitment tuple:
//!
//! - v2 payments: `sha256(secret)`
//! - legacy v1 payments: `ripemd160(sha256(secret))`

use hashlock_types::{Fingerprint, LegacySecretHash, Result, Secret, SecretHash, SwapError};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

#[must_use]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

#[must_use]
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// `sha256(secret)`.
#[must_use]
pub fn secret_hash(secret: &Secret) -> SecretHash {
    SecretHash::new(sha256(secret.as_slice()))
}

/// `ripemd160(sha256(secret))`.
#[must_use]
pub fn legacy_secret_hash(secret: &Secret) -> LegacySecretHash {
    LegacySecretHash::new(ripemd160(&sha256(secret.as_slice())))
}

/// Compare a recomputed fingerprint with the stored one.
///
/// The comparison touches every byte regardless of where the first
/// difference is.
///
/// # Errors
/// [`SwapError::InvalidCommitment`] on any difference.
pub fn verify_fingerprint(stored: &Fingerprint, computed: &Fingerprint) -> Result<()> {
    let diff = stored
        .as_slice()
        .iter()
        .zip(computed.as_slice())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b));
    if diff == 0 {
        Ok(())
    } else {
        Err(SwapError::InvalidCommitment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(
            hex::encode(sha256(&[0u8; 32])),
            "66687aadf862bd776c8fc18b8e9f8e20089714856ee233b3902a591d0d5f2925"
        );
        assert_eq!(
            hex::encode(ripemd160(b"abc")),
            "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"
        );
    }

    #[test]
    fn legacy_hash_is_hash_of_hash() {
        let secret = Secret::new([5u8; 32]);
        let inner = secret_hash(&secret);
        assert_eq!(legacy_secret_hash(&secret).0.0, ripemd160(inner.0.as_slice()));
    }

    #[test]
    fn verify_fingerprint_detects_any_byte() {
        let stored = Fingerprint::new([7u8; 20]);
        assert!(verify_fingerprint(&stored, &stored).is_ok());
        for i in 0..20 {
            let mut other = stored;
            other.0[i] ^= 1;
            assert_eq!(
                verify_fingerprint(&stored, &other).unwrap_err(),
                SwapError::InvalidCommitment
            );
        }
    }
}
