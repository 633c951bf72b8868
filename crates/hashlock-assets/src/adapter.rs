//! Asset transfer adapter.
//!
//! Uniform pull (depositor → escrow) and push (escrow → recipient) over
//! every supported asset kind. A fungible token that answers `false` is
//! treated exactly like one that reverts.
//!
//! Unique and semi-fungible assets are never pulled: they arrive through the
//! receiver hook while the token contract is already mid-transfer.

use hashlock_types::{Address, AssetDescriptor, Result, SwapError, U256};

use crate::chain::Chain;

/// Moves assets in and out of the escrow account.
#[derive(Debug, Clone, Copy)]
pub struct AssetAdapter {
    escrow: Address,
}

impl AssetAdapter {
    #[must_use]
    pub fn new(escrow: Address) -> Self {
        Self { escrow }
    }

    #[must_use]
    pub fn escrow(&self) -> Address {
        self.escrow
    }

    /// Pull `amount` of a pullable asset from `from` into the escrow.
    ///
    /// Native coin is taken from the value attached to the call, fungible
    /// tokens through the depositor's allowance.
    ///
    /// # Errors
    /// `TransferFailed` if the chain or token refuses, `UnsupportedOperation`
    /// for unique / semi-fungible assets.
    pub fn pull<C: Chain + ?Sized>(
        &self,
        chain: &mut C,
        from: &Address,
        asset: &AssetDescriptor,
        amount: U256,
    ) -> Result<()> {
        match asset {
            AssetDescriptor::NativeCoin => chain
                .native_transfer(from, &self.escrow, amount)
                .map_err(as_transfer_failure),
            AssetDescriptor::FungibleToken(token) => {
                let escrow = self.escrow;
                let accepted = chain
                    .fungible(token)?
                    .transfer_from(&escrow, from, &escrow, amount)
                    .map_err(as_transfer_failure)?;
                check_accepted(accepted, token)?;
                tracing::debug!(token = %token, from = %from, amount = %amount, "Pulled fungible deposit");
                Ok(())
            }
            AssetDescriptor::UniqueToken(..) | AssetDescriptor::SemiFungibleToken(..) => {
                Err(SwapError::UnsupportedOperation {
                    reason: format!("{} assets are deposited through the receiver hook", asset.kind()),
                })
            }
        }
    }

    /// Push `amount` of `asset` from the escrow to `to`.
    ///
    /// For a unique token `amount` is ignored; the one token named by the
    /// descriptor moves.
    ///
    /// # Errors
    /// `TransferFailed` if the chain or token refuses.
    pub fn push<C: Chain + ?Sized>(
        &self,
        chain: &mut C,
        to: &Address,
        asset: &AssetDescriptor,
        amount: U256,
    ) -> Result<()> {
        let escrow = self.escrow;
        match asset {
            AssetDescriptor::NativeCoin => chain
                .native_transfer(&escrow, to, amount)
                .map_err(as_transfer_failure),
            AssetDescriptor::FungibleToken(token) => {
                let accepted = chain
                    .fungible(token)?
                    .transfer(&escrow, to, amount)
                    .map_err(as_transfer_failure)?;
                check_accepted(accepted, token)
            }
            AssetDescriptor::UniqueToken(token, id) => chain
                .unique(token)?
                .safe_transfer_from(&escrow, &escrow, to, *id)
                .map_err(as_transfer_failure),
            AssetDescriptor::SemiFungibleToken(token, id) => chain
                .semi_fungible(token)?
                .safe_transfer_from(&escrow, &escrow, to, *id, amount)
                .map_err(as_transfer_failure),
        }
    }

    /// Units of `asset` currently held by the escrow account.
    ///
    /// # Errors
    /// `UnknownAsset` if the token contract does not exist.
    pub fn held<C: Chain + ?Sized>(&self, chain: &mut C, asset: &AssetDescriptor) -> Result<U256> {
        balance_of(chain, &self.escrow, asset)
    }
}

/// Units of `asset` held by `holder`. A unique token counts as 1 or 0.
///
/// # Errors
/// `UnknownAsset` if the token contract does not exist.
pub fn balance_of<C: Chain + ?Sized>(
    chain: &mut C,
    holder: &Address,
    asset: &AssetDescriptor,
) -> Result<U256> {
    Ok(match asset {
        AssetDescriptor::NativeCoin => chain.native_balance(holder),
        AssetDescriptor::FungibleToken(token) => chain.fungible(token)?.balance_of(holder),
        AssetDescriptor::UniqueToken(token, id) => {
            let held = chain.unique(token)?.owner_of(*id) == Some(*holder);
            U256::from(u8::from(held))
        }
        AssetDescriptor::SemiFungibleToken(token, id) => {
            chain.semi_fungible(token)?.balance_of(holder, *id)
        }
    })
}

fn check_accepted(accepted: bool, token: &Address) -> Result<()> {
    if accepted {
        Ok(())
    } else {
        tracing::warn!(token = %token, "Fungible token returned false");
        Err(SwapError::TransferFailed {
            reason: format!("token {token} returned false"),
        })
    }
}

fn as_transfer_failure(err: SwapError) -> SwapError {
    match err {
        SwapError::TransferFailed { .. } | SwapError::UnknownAsset(_) => err,
        other => SwapError::TransferFailed {
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashlock_types::TokenId;

    use crate::chain::ChainView;
    use crate::memory::{MemoryChain, TokenBehavior};

    fn units(n: u64) -> U256 {
        U256::from(n)
    }

    fn setup() -> (MemoryChain, AssetAdapter, Address, Address) {
        let escrow = Address::repeat_byte(0xee);
        let token = Address::repeat_byte(0x70);
        let mut chain = MemoryChain::at(1_000);
        chain.deploy_contract(escrow);
        chain.deploy_fungible(token);
        (chain, AssetAdapter::new(escrow), escrow, token)
    }

    #[test]
    fn native_pull_and_push() {
        let (mut chain, adapter, escrow, _) = setup();
        let alice = Address::repeat_byte(1);
        let bob = Address::repeat_byte(2);
        chain.mint_native(alice, units(100)).unwrap();

        adapter
            .pull(&mut chain, &alice, &AssetDescriptor::NativeCoin, units(60))
            .unwrap();
        assert_eq!(chain.native_balance(&escrow), units(60));

        adapter
            .push(&mut chain, &bob, &AssetDescriptor::NativeCoin, units(60))
            .unwrap();
        assert_eq!(chain.native_balance(&bob), units(60));
        assert_eq!(chain.native_balance(&escrow), units(0));
    }

    #[test]
    fn fungible_pull_uses_allowance() {
        let (mut chain, adapter, escrow, token) = setup();
        let alice = Address::repeat_byte(1);
        chain.mint_fungible(token, alice, units(500)).unwrap();
        let asset = AssetDescriptor::FungibleToken(token);

        let err = adapter.pull(&mut chain, &alice, &asset, units(100)).unwrap_err();
        assert!(matches!(err, SwapError::TransferFailed { .. }));

        chain.approve_fungible(token, alice, escrow, units(100));
        adapter.pull(&mut chain, &alice, &asset, units(100)).unwrap();
        assert_eq!(adapter.held(&mut chain, &asset).unwrap(), units(100));
        assert_eq!(chain.fungible_balance(&token, &alice), units(400));
    }

    #[test]
    fn false_return_is_a_failure() {
        let (mut chain, adapter, escrow, token) = setup();
        let alice = Address::repeat_byte(1);
        chain.mint_fungible(token, alice, units(500)).unwrap();
        chain.approve_fungible(token, alice, escrow, units(500));
        chain.set_fungible_behavior(token, TokenBehavior::ReturnsFalse);

        let err = adapter
            .pull(&mut chain, &alice, &AssetDescriptor::FungibleToken(token), units(100))
            .unwrap_err();
        assert!(matches!(err, SwapError::TransferFailed { .. }));
        assert_eq!(chain.fungible_balance(&token, &alice), units(500));
    }

    #[test]
    fn unique_is_not_pullable() {
        let (mut chain, adapter, _, _) = setup();
        let asset = AssetDescriptor::UniqueToken(Address::repeat_byte(0x71), TokenId::from(1));
        let err = adapter
            .pull(&mut chain, &Address::repeat_byte(1), &asset, units(1))
            .unwrap_err();
        assert!(matches!(err, SwapError::UnsupportedOperation { .. }));
    }

    #[test]
    fn unknown_token_is_reported() {
        let (mut chain, adapter, _, _) = setup();
        let ghost = Address::repeat_byte(0x99);
        let err = adapter
            .push(
                &mut chain,
                &Address::repeat_byte(1),
                &AssetDescriptor::FungibleToken(ghost),
                units(1),
            )
            .unwrap_err();
        assert_eq!(err, SwapError::UnknownAsset(ghost));
    }

    #[test]
    fn unique_push_moves_ownership() {
        let (mut chain, adapter, escrow, _) = setup();
        let nft = Address::repeat_byte(0x71);
        let bob = Address::repeat_byte(2);
        chain.deploy_unique(nft);
        chain.mint_unique(nft, escrow, TokenId::from(7));
        let asset = AssetDescriptor::UniqueToken(nft, TokenId::from(7));

        assert_eq!(adapter.held(&mut chain, &asset).unwrap(), units(1));
        adapter.push(&mut chain, &bob, &asset, units(1)).unwrap();
        assert_eq!(adapter.held(&mut chain, &asset).unwrap(), units(0));
        assert_eq!(chain.unique_owner(&nft, TokenId::from(7)), Some(bob));
    }
}
