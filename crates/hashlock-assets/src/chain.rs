//! Collaborator boundaries.
//!
//! The escrow never implements tokens or balances itself. Everything it
//! moves goes through these traits, implemented by whatever host embeds it
//! (an on-chain runtime binding, or [`crate::MemoryChain`] in-process).
//!
//! Token calls report a revert as `Err(..)`. Fungible transfers additionally
//! return a success flag; `Ok(false)` is a failure just like a revert.

use hashlock_types::{Address, Result, TokenId, U256};

/// Read-only view of the host chain.
pub trait ChainView {
    /// Chain clock in epoch seconds. Never decreases.
    fn now(&self) -> u64;

    /// Does `account` hold executable code?
    fn has_code(&self, account: &Address) -> bool;

    fn native_balance(&self, account: &Address) -> U256;
}

/// Handle to a host checkpoint taken with [`Chain::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a checkpoint must be reverted or discarded"]
pub struct Checkpoint(pub usize);

/// Mutable host: native value, token contracts, and atomic checkpoints.
pub trait Chain: ChainView {
    /// Move native coin. Fails (reverts) on insufficient balance.
    fn native_transfer(&mut self, from: &Address, to: &Address, amount: U256) -> Result<()>;

    /// The fungible token contract at `token`, or `UnknownAsset`.
    fn fungible(&mut self, token: &Address) -> Result<&mut dyn FungibleToken>;

    fn unique(&mut self, token: &Address) -> Result<&mut dyn UniqueToken>;

    fn semi_fungible(&mut self, token: &Address) -> Result<&mut dyn SemiFungibleToken>;

    /// Open a checkpoint. Every effect after it can be undone with
    /// [`Chain::revert_to`]. Checkpoints nest.
    fn checkpoint(&mut self) -> Checkpoint;

    /// Undo every effect since `checkpoint` and close it (and any newer one).
    fn revert_to(&mut self, checkpoint: Checkpoint);

    /// Keep every effect since `checkpoint` and close it.
    fn discard(&mut self, checkpoint: Checkpoint);
}

/// Fungible token contract.
pub trait FungibleToken {
    /// Allowance-based transfer executed by `spender` on behalf of `owner`.
    fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<bool>;

    /// Direct transfer from `sender`.
    fn transfer(&mut self, sender: &Address, to: &Address, amount: U256) -> Result<bool>;

    fn balance_of(&self, owner: &Address) -> U256;
}

/// Unique (non-fungible) token contract.
pub trait UniqueToken {
    fn safe_transfer_from(
        &mut self,
        operator: &Address,
        from: &Address,
        to: &Address,
        id: TokenId,
    ) -> Result<()>;

    fn owner_of(&self, id: TokenId) -> Option<Address>;
}

/// Semi-fungible (multi) token contract.
pub trait SemiFungibleToken {
    fn safe_transfer_from(
        &mut self,
        operator: &Address,
        from: &Address,
        to: &Address,
        id: TokenId,
        amount: U256,
    ) -> Result<()>;

    fn balance_of(&self, owner: &Address, id: TokenId) -> U256;
}

/// One inbound single-id transfer as seen by the receiving contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundTransfer {
    /// The asset contract calling the hook.
    pub token: Address,
    /// Who initiated the transfer.
    pub operator: Address,
    /// Previous holder of the asset.
    pub from: Address,
    pub token_id: TokenId,
    /// Units received. Always 1 for a unique token.
    pub amount: U256,
    /// Opaque data attached by the sender.
    pub data: Vec<u8>,
}

/// Receiver hooks a contract exposes to accept unique / semi-fungible
/// tokens. The asset has already moved when a hook runs; an `Err` or a wrong
/// acceptance value makes the token contract revert the whole transfer.
pub trait TokenReceiver {
    /// The account the hooks belong to: the destination of every delivery.
    fn receiver_address(&self) -> Address;

    fn on_unique_received(
        &mut self,
        chain: &dyn ChainView,
        transfer: &InboundTransfer,
    ) -> Result<[u8; 4]>;

    fn on_semi_fungible_received(
        &mut self,
        chain: &dyn ChainView,
        transfer: &InboundTransfer,
    ) -> Result<[u8; 4]>;

    #[allow(clippy::too_many_arguments)]
    fn on_semi_fungible_batch_received(
        &mut self,
        chain: &dyn ChainView,
        token: &Address,
        operator: &Address,
        from: &Address,
        ids: &[TokenId],
        amounts: &[U256],
        data: &[u8],
    ) -> Result<[u8; 4]>;
}
