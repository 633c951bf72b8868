//! Commitment tuples of every payment variant.
//!
//! Each tuple binds the economically relevant parameters of one payment.
//! Only its fingerprint is stored; callers rebuild the tuple on every
//! mutating call, with their own address in their role's slot and, on
//! secret-gated calls, the folded candidate secret in the secret-hash slot.
//!
//! | Variant | Packed order |
//! |---|---|
//! | legacy | `receiver ‖ sender ‖ secretHash20 ‖ token ‖ amount` |
//! | maker coin/fungible | `amount ‖ taker ‖ maker ‖ takerSH ‖ makerSH ‖ token` |
//! | maker unique | `taker ‖ maker ‖ takerSH ‖ makerSH ‖ token ‖ tokenId` |
//! | maker semi-fungible | `taker ‖ maker ‖ takerSH ‖ makerSH ‖ token ‖ tokenId ‖ amount` |
//! | taker | `amount ‖ dexFee ‖ maker ‖ taker ‖ takerSH ‖ makerSH ‖ token` |
//! | taker + burn | `amount ‖ dexFee ‖ burnFee ‖ maker ‖ taker ‖ takerSH ‖ makerSH ‖ token` |

use hashlock_types::{
    Address, AssetDescriptor, Fingerprint, LegacySecretHash, Result, Secret, SecretHash, SwapError,
    U256,
};

use crate::digest::{legacy_secret_hash, secret_hash};
use crate::encoding::CanonicalEncoder;

// ---------------------------------------------------------------------------
// Legacy v1
// ---------------------------------------------------------------------------

/// Single-role v1 payment: sender locks for receiver under one 20-byte hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTerms {
    pub sender: Address,
    pub receiver: Address,
    pub secret_hash: LegacySecretHash,
    pub asset: AssetDescriptor,
    pub amount: U256,
}

impl LegacyTerms {
    /// Replace the secret hash by the fold of a revealed candidate secret.
    #[must_use]
    pub fn with_revealed_secret(mut self, secret: &Secret) -> Self {
        self.secret_hash = legacy_secret_hash(secret);
        self
    }

    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        let mut enc = CanonicalEncoder::new();
        enc.address(&self.receiver)
            .address(&self.sender)
            .legacy_secret_hash(&self.secret_hash)
            .address(&self.asset.contract())
            .uint(self.amount);
        enc.fingerprint()
    }
}

// ---------------------------------------------------------------------------
// Maker v2
// ---------------------------------------------------------------------------

/// Maker payment: the maker locks for the taker under two secret hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakerTerms {
    pub maker: Address,
    pub taker: Address,
    pub taker_secret_hash: SecretHash,
    pub maker_secret_hash: SecretHash,
    pub asset: AssetDescriptor,
    /// Base units. Ignored for unique tokens.
    pub amount: U256,
}

impl MakerTerms {
    /// Spend path: the taker reveals the maker secret.
    #[must_use]
    pub fn with_maker_secret(mut self, maker_secret: &Secret) -> Self {
        self.maker_secret_hash = secret_hash(maker_secret);
        self
    }

    /// Secret refund path: the maker presents the leaked taker secret.
    #[must_use]
    pub fn with_taker_secret(mut self, taker_secret: &Secret) -> Self {
        self.taker_secret_hash = secret_hash(taker_secret);
        self
    }

    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        let mut enc = CanonicalEncoder::new();
        match self.asset {
            AssetDescriptor::NativeCoin | AssetDescriptor::FungibleToken(_) => {
                enc.uint(self.amount)
                    .address(&self.taker)
                    .address(&self.maker)
                    .secret_hash(&self.taker_secret_hash)
                    .secret_hash(&self.maker_secret_hash)
                    .address(&self.asset.contract());
            }
            AssetDescriptor::UniqueToken(token, id) => {
                enc.address(&self.taker)
                    .address(&self.maker)
                    .secret_hash(&self.taker_secret_hash)
                    .secret_hash(&self.maker_secret_hash)
                    .address(&token)
                    .token_id(id);
            }
            AssetDescriptor::SemiFungibleToken(token, id) => {
                enc.address(&self.taker)
                    .address(&self.maker)
                    .secret_hash(&self.taker_secret_hash)
                    .secret_hash(&self.maker_secret_hash)
                    .address(&token)
                    .token_id(id)
                    .uint(self.amount);
            }
        }
        enc.fingerprint()
    }
}

// ---------------------------------------------------------------------------
// Taker v2
// ---------------------------------------------------------------------------

/// Fee terms of a Taker payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeTerms {
    /// Paid to the dex-fee sink on spend.
    pub dex_fee: U256,
    /// Counted, never transferred. `None` selects the plain v2 wire format.
    pub burn_fee: Option<U256>,
}

impl FeeTerms {
    #[must_use]
    pub fn dex_only(dex_fee: U256) -> Self {
        Self {
            dex_fee,
            burn_fee: None,
        }
    }

    #[must_use]
    pub fn with_burn(dex_fee: U256, burn_fee: U256) -> Self {
        Self {
            dex_fee,
            burn_fee: Some(burn_fee),
        }
    }

    /// `dex_fee + burn_fee`.
    pub fn total(&self) -> Result<U256> {
        self.dex_fee
            .checked_add(self.burn_fee.unwrap_or_default())
            .ok_or(SwapError::AmountOverflow)
    }
}

/// Taker payment: the taker locks `amount + fees` for the maker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakerTerms {
    pub taker: Address,
    pub maker: Address,
    pub taker_secret_hash: SecretHash,
    pub maker_secret_hash: SecretHash,
    pub asset: AssetDescriptor,
    pub amount: U256,
    pub fees: FeeTerms,
}

impl TakerTerms {
    /// Spend path: the maker reveals its own secret.
    #[must_use]
    pub fn with_maker_secret(mut self, maker_secret: &Secret) -> Self {
        self.maker_secret_hash = secret_hash(maker_secret);
        self
    }

    /// Secret refund path: the taker reveals its own secret.
    #[must_use]
    pub fn with_taker_secret(mut self, taker_secret: &Secret) -> Self {
        self.taker_secret_hash = secret_hash(taker_secret);
        self
    }

    /// Everything that entered escrow: `amount + dex_fee + burn_fee`.
    pub fn total(&self) -> Result<U256> {
        self.amount
            .checked_add(self.fees.total()?)
            .ok_or(SwapError::AmountOverflow)
    }

    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        let mut enc = CanonicalEncoder::new();
        enc.uint(self.amount).uint(self.fees.dex_fee);
        if let Some(burn_fee) = self.fees.burn_fee {
            enc.uint(burn_fee);
        }
        enc.address(&self.maker)
            .address(&self.taker)
            .secret_hash(&self.taker_secret_hash)
            .secret_hash(&self.maker_secret_hash)
            .address(&self.asset.contract());
        enc.fingerprint()
    }
}

#[cfg(test)]
mod tests {
    use hashlock_types::TokenId;

    use super::*;
    use crate::digest::ripemd160;

    fn word(value: u64) -> [u8; 32] {
        U256::from(value).to_be_bytes::<32>()
    }

    fn maker_terms(asset: AssetDescriptor) -> MakerTerms {
        MakerTerms {
            maker: Address::repeat_byte(0x11),
            taker: Address::repeat_byte(0x22),
            taker_secret_hash: secret_hash(&Secret::new([1u8; 32])),
            maker_secret_hash: secret_hash(&Secret::new([2u8; 32])),
            asset,
            amount: U256::from(1_000),
        }
    }

    fn taker_terms(fees: FeeTerms) -> TakerTerms {
        TakerTerms {
            taker: Address::repeat_byte(0x22),
            maker: Address::repeat_byte(0x11),
            taker_secret_hash: secret_hash(&Secret::new([1u8; 32])),
            maker_secret_hash: secret_hash(&Secret::new([2u8; 32])),
            asset: AssetDescriptor::NativeCoin,
            amount: U256::from(900),
            fees,
        }
    }

    #[test]
    fn maker_coin_layout() {
        let t = maker_terms(AssetDescriptor::NativeCoin);
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&word(1_000));
        bytes.extend_from_slice(&[0x22; 20]);
        bytes.extend_from_slice(&[0x11; 20]);
        bytes.extend_from_slice(t.taker_secret_hash.0.as_slice());
        bytes.extend_from_slice(t.maker_secret_hash.0.as_slice());
        bytes.extend_from_slice(&[0u8; 20]);
        assert_eq!(t.fingerprint(), Fingerprint::new(ripemd160(&bytes)));
    }

    #[test]
    fn legacy_layout() {
        let secret = Secret::new([3u8; 32]);
        let t = LegacyTerms {
            sender: Address::repeat_byte(0x11),
            receiver: Address::repeat_byte(0x22),
            secret_hash: legacy_secret_hash(&secret),
            asset: AssetDescriptor::FungibleToken(Address::repeat_byte(0x33)),
            amount: U256::from(5),
        };
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&[0x22; 20]);
        bytes.extend_from_slice(&[0x11; 20]);
        bytes.extend_from_slice(t.secret_hash.0.as_slice());
        bytes.extend_from_slice(&[0x33; 20]);
        bytes.extend_from_slice(&word(5));
        assert_eq!(t.fingerprint(), Fingerprint::new(ripemd160(&bytes)));
    }

    #[test]
    fn unique_layout_carries_full_token_id() {
        let token = Address::repeat_byte(0x44);
        let id = TokenId(U256::MAX - U256::from(1));
        let t = maker_terms(AssetDescriptor::UniqueToken(token, id));
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&[0x22; 20]);
        bytes.extend_from_slice(&[0x11; 20]);
        bytes.extend_from_slice(t.taker_secret_hash.0.as_slice());
        bytes.extend_from_slice(t.maker_secret_hash.0.as_slice());
        bytes.extend_from_slice(&[0x44; 20]);
        bytes.extend_from_slice(&id.0.to_be_bytes::<32>());
        assert_eq!(t.fingerprint(), Fingerprint::new(ripemd160(&bytes)));
    }

    #[test]
    fn unique_ignores_amount_semi_does_not() {
        let token = Address::repeat_byte(0x44);
        let mut unique = maker_terms(AssetDescriptor::UniqueToken(token, TokenId::from(7)));
        let fp = unique.fingerprint();
        unique.amount = U256::from(2);
        assert_eq!(unique.fingerprint(), fp);

        let mut semi = maker_terms(AssetDescriptor::SemiFungibleToken(token, TokenId::from(7)));
        let fp = semi.fingerprint();
        semi.amount = U256::from(2);
        assert_ne!(semi.fingerprint(), fp);
    }

    #[test]
    fn unique_and_semi_differ_for_same_fields() {
        let token = Address::repeat_byte(0x44);
        let unique = maker_terms(AssetDescriptor::UniqueToken(token, TokenId::from(7)));
        let semi = maker_terms(AssetDescriptor::SemiFungibleToken(token, TokenId::from(7)));
        assert_ne!(unique.fingerprint(), semi.fingerprint());
    }

    #[test]
    fn revealed_secret_reproduces_commitment() {
        let maker_secret = Secret::new([2u8; 32]);
        let stored = maker_terms(AssetDescriptor::NativeCoin).fingerprint();

        let mut candidate = maker_terms(AssetDescriptor::NativeCoin);
        candidate.maker_secret_hash = SecretHash::new([0u8; 32]);
        assert_eq!(candidate.with_maker_secret(&maker_secret).fingerprint(), stored);

        let wrong = maker_terms(AssetDescriptor::NativeCoin).with_maker_secret(&Secret::new([9u8; 32]));
        assert_ne!(wrong.fingerprint(), stored);
    }

    #[test]
    fn burn_fee_changes_wire_format() {
        let plain = taker_terms(FeeTerms::dex_only(U256::from(100)));
        let zero_burn = taker_terms(FeeTerms::with_burn(U256::from(100), U256::ZERO));
        assert_ne!(plain.fingerprint(), zero_burn.fingerprint());
    }

    #[test]
    fn taker_total_sums_fees() {
        let dex = U256::from(100);
        assert_eq!(taker_terms(FeeTerms::dex_only(dex)).total().unwrap(), U256::from(1_000));
        assert_eq!(
            taker_terms(FeeTerms::with_burn(dex, U256::from(25))).total().unwrap(),
            U256::from(1_025)
        );
    }

    #[test]
    fn taker_total_overflow() {
        let mut t = taker_terms(FeeTerms::dex_only(U256::from(1)));
        t.amount = U256::MAX;
        assert_eq!(t.total().unwrap_err(), SwapError::AmountOverflow);
    }

    mod props {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            /// Changing the amount, any address, or the secret changes the fingerprint.
            #[test]
            fn single_field_flip_changes_fingerprint(
                amount in 1u128..u128::MAX,
                other_amount in 1u128..u128::MAX,
                addr in any::<[u8; 20]>(),
                secret in any::<[u8; 32]>(),
            ) {
                let base = taker_terms(FeeTerms::dex_only(U256::from(10)));
                let mut t = base.clone();
                t.amount = U256::from(amount);
                let stored = t.fingerprint();

                if other_amount != amount {
                    let mut flipped = t.clone();
                    flipped.amount = U256::from(other_amount);
                    prop_assert_ne!(flipped.fingerprint(), stored);
                }

                let addr = Address::from(addr);
                if addr != t.maker {
                    let mut flipped = t.clone();
                    flipped.maker = addr;
                    prop_assert_ne!(flipped.fingerprint(), stored);
                }

                let secret = Secret::new(secret);
                if secret != Secret::new([2u8; 32]) {
                    let flipped = t.clone().with_maker_secret(&secret);
                    prop_assert_ne!(flipped.fingerprint(), stored);
                } else {
                    prop_assert_eq!(t.clone().with_maker_secret(&secret).fingerprint(), stored);
                }
            }
        }
    }
}
