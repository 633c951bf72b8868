//! Receiver-hook parameter block.
//!
//! Unique and semi-fungible deposits carry the swap parameters in the
//! transfer's data field, ABI-encoded as
//! `(bytes32 id, address taker, address token, bytes32 takerSecretHash,
//! bytes32 makerSecretHash, uint64 lockTime)`: six static words.
//!
//! Anything other than exactly 192 bytes that pass ABI validation is
//! rejected.

use alloy_sol_types::{sol, SolValue};
use hashlock_types::constants::HOOK_PAYLOAD_LEN;
use hashlock_types::{Address, Result, SecretHash, SwapError, SwapId};

sol! {
    /// Wire form of [`HookPayload`].
    struct DepositParams {
        bytes32 id;
        address taker;
        address token;
        bytes32 taker_secret_hash;
        bytes32 maker_secret_hash;
        uint64 lock_time;
    }
}

/// Decoded deposit parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookPayload {
    pub id: SwapId,
    pub taker: Address,
    /// Contract the depositor claims to be sending from.
    pub token: Address,
    pub taker_secret_hash: SecretHash,
    pub maker_secret_hash: SecretHash,
    pub lock_time: u64,
}

impl HookPayload {
    /// Decode a parameter block.
    ///
    /// # Errors
    /// `MalformedPayload` on a wrong length, dirty address padding or a lock
    /// time wider than 64 bits.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() != HOOK_PAYLOAD_LEN {
            return Err(SwapError::MalformedPayload {
                reason: format!("expected {HOOK_PAYLOAD_LEN} bytes, got {}", data.len()),
            });
        }
        let params = DepositParams::abi_decode_validate(data).map_err(|err| {
            SwapError::MalformedPayload {
                reason: err.to_string(),
            }
        })?;
        Ok(Self {
            id: SwapId(params.id),
            taker: params.taker,
            token: params.token,
            taker_secret_hash: SecretHash(params.taker_secret_hash),
            maker_secret_hash: SecretHash(params.maker_secret_hash),
            lock_time: params.lock_time,
        })
    }

    /// Encode into the 192-byte block [`HookPayload::decode`] accepts.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        DepositParams {
            id: self.id.0,
            taker: self.taker,
            token: self.token,
            taker_secret_hash: self.taker_secret_hash.0,
            maker_secret_hash: self.maker_secret_hash.0,
            lock_time: self.lock_time,
        }
        .abi_encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HookPayload {
        HookPayload {
            id: SwapId::new([0x11; 32]),
            taker: Address::repeat_byte(0x22),
            token: Address::repeat_byte(0x33),
            taker_secret_hash: SecretHash::new([0x44; 32]),
            maker_secret_hash: SecretHash::new([0x55; 32]),
            lock_time: 1_700_000_000,
        }
    }

    #[test]
    fn layout_is_six_words() {
        let bytes = sample().encode();
        assert_eq!(bytes.len(), HOOK_PAYLOAD_LEN);
        assert_eq!(&bytes[..32], &[0x11; 32]);
        assert_eq!(&bytes[32..44], &[0u8; 12]);
        assert_eq!(&bytes[44..64], &[0x22; 20]);
        assert_eq!(&bytes[76..96], &[0x33; 20]);
        assert_eq!(&bytes[160..184], &[0u8; 24]);
        assert_eq!(&bytes[184..], &1_700_000_000u64.to_be_bytes());
        assert_eq!(HookPayload::decode(&bytes).unwrap(), sample());
    }

    #[test]
    fn rejects_wrong_length() {
        let mut bytes = sample().encode();
        bytes.push(0);
        assert!(matches!(
            HookPayload::decode(&bytes),
            Err(SwapError::MalformedPayload { .. })
        ));
        assert!(HookPayload::decode(&bytes[..160]).is_err());
        assert!(HookPayload::decode(&[]).is_err());
    }

    #[test]
    fn rejects_dirty_address_padding() {
        let mut bytes = sample().encode();
        bytes[32] = 1;
        assert!(matches!(
            HookPayload::decode(&bytes),
            Err(SwapError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn rejects_oversized_lock_time() {
        let mut bytes = sample().encode();
        bytes[160] = 1;
        assert!(matches!(
            HookPayload::decode(&bytes),
            Err(SwapError::MalformedPayload { .. })
        ));
    }
}
