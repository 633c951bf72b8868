//! In-memory host chain.
//!
//! A complete [`Chain`] kept in process memory: native balances, fungible /
//! unique / semi-fungible token ledgers, a set of code-bearing accounts, a
//! monotonic clock and a snapshot stack for checkpoints.
//!
//! Tokens can be configured to misbehave (answer `false`, or revert) so the
//! escrow's failure paths can be driven deterministically. Deliveries to a
//! [`TokenReceiver`] always run its hook and are undone in full if the hook
//! rejects. Balance arithmetic is checked: an overflowing credit reverts.
//!
//! The clock is not part of a snapshot; reverting never rewinds time.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use chrono::Utc;
use hashlock_types::constants::{
    SEMI_FUNGIBLE_BATCH_RECEIVED_SELECTOR, SEMI_FUNGIBLE_RECEIVED_SELECTOR,
    UNIQUE_RECEIVED_SELECTOR,
};
use hashlock_types::{Address, Result, SwapError, TokenId, U256};

use crate::chain::{
    Chain, ChainView, Checkpoint, FungibleToken, InboundTransfer, SemiFungibleToken,
    TokenReceiver, UniqueToken,
};

/// How a fungible token answers transfer calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenBehavior {
    /// Moves balances and returns `true`, reverts on shortfall.
    #[default]
    Standard,
    /// Returns `false` without moving anything.
    ReturnsFalse,
    /// Reverts every transfer.
    Reverts,
}

#[derive(Debug, Clone, Default)]
struct MemoryFungible {
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    behavior: TokenBehavior,
}

impl MemoryFungible {
    fn gate(&self) -> Result<bool> {
        match self.behavior {
            TokenBehavior::Standard => Ok(true),
            TokenBehavior::ReturnsFalse => Ok(false),
            TokenBehavior::Reverts => Err(revert("token reverted")),
        }
    }

    fn move_balance(&mut self, from: &Address, to: &Address, amount: U256) -> Result<()> {
        if to.is_zero() {
            return Err(revert("transfer to the zero address"));
        }
        move_units(&mut self.balances, *from, *to, amount)
    }
}

impl FungibleToken for MemoryFungible {
    fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<bool> {
        if !self.gate()? {
            return Ok(false);
        }
        let key = (*owner, *spender);
        let allowance = self.allowances.get(&key).copied().unwrap_or_default();
        let remaining = allowance
            .checked_sub(amount)
            .ok_or_else(|| revert("insufficient allowance"))?;
        self.move_balance(owner, to, amount)?;
        self.allowances.insert(key, remaining);
        Ok(true)
    }

    fn transfer(&mut self, sender: &Address, to: &Address, amount: U256) -> Result<bool> {
        if !self.gate()? {
            return Ok(false);
        }
        self.move_balance(sender, to, amount)?;
        Ok(true)
    }

    fn balance_of(&self, owner: &Address) -> U256 {
        self.balances.get(owner).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
struct MemoryUnique {
    owners: HashMap<TokenId, Address>,
    operators: HashSet<(Address, Address)>,
}

impl UniqueToken for MemoryUnique {
    fn safe_transfer_from(
        &mut self,
        operator: &Address,
        from: &Address,
        to: &Address,
        id: TokenId,
    ) -> Result<()> {
        if self.owners.get(&id) != Some(from) {
            return Err(revert("transfer from incorrect owner"));
        }
        if operator != from && !self.operators.contains(&(*from, *operator)) {
            return Err(revert("caller is not owner nor approved"));
        }
        if to.is_zero() {
            return Err(revert("transfer to the zero address"));
        }
        self.owners.insert(id, *to);
        Ok(())
    }

    fn owner_of(&self, id: TokenId) -> Option<Address> {
        self.owners.get(&id).copied()
    }
}

#[derive(Debug, Clone, Default)]
struct MemorySemiFungible {
    balances: HashMap<(Address, TokenId), U256>,
    operators: HashSet<(Address, Address)>,
}

impl SemiFungibleToken for MemorySemiFungible {
    fn safe_transfer_from(
        &mut self,
        operator: &Address,
        from: &Address,
        to: &Address,
        id: TokenId,
        amount: U256,
    ) -> Result<()> {
        if operator != from && !self.operators.contains(&(*from, *operator)) {
            return Err(revert("caller is not owner nor approved"));
        }
        if to.is_zero() {
            return Err(revert("transfer to the zero address"));
        }
        move_units(&mut self.balances, (*from, id), (*to, id), amount)
    }

    fn balance_of(&self, owner: &Address, id: TokenId) -> U256 {
        self.balances.get(&(*owner, id)).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
struct LedgerState {
    native: HashMap<Address, U256>,
    fungible: HashMap<Address, MemoryFungible>,
    unique: HashMap<Address, MemoryUnique>,
    semi_fungible: HashMap<Address, MemorySemiFungible>,
    contracts: HashSet<Address>,
}

/// In-process host chain.
#[derive(Debug, Clone)]
pub struct MemoryChain {
    state: LedgerState,
    snapshots: Vec<LedgerState>,
    now: u64,
}

impl Default for MemoryChain {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryChain {
    /// Empty chain with the clock at the current wall time.
    #[must_use]
    pub fn new() -> Self {
        Self::at(u64::try_from(Utc::now().timestamp()).unwrap_or(0))
    }

    /// Empty chain with the clock at `now`.
    #[must_use]
    pub fn at(now: u64) -> Self {
        Self {
            state: LedgerState::default(),
            snapshots: Vec::new(),
            now,
        }
    }

    /// Move the clock forward to `time`. Earlier times are ignored.
    pub fn advance_to(&mut self, time: u64) {
        self.now = self.now.max(time);
    }

    pub fn advance_by(&mut self, seconds: u64) {
        self.now = self.now.saturating_add(seconds);
    }

    /// Mark `account` as holding code.
    pub fn deploy_contract(&mut self, account: Address) {
        self.state.contracts.insert(account);
    }

    /// # Errors
    /// `TransferFailed` if the balance would overflow.
    pub fn mint_native(&mut self, account: Address, amount: U256) -> Result<()> {
        mint_units(&mut self.state.native, account, amount)
    }

    pub fn deploy_fungible(&mut self, token: Address) {
        self.state.contracts.insert(token);
        self.state.fungible.entry(token).or_default();
    }

    pub fn set_fungible_behavior(&mut self, token: Address, behavior: TokenBehavior) {
        self.state.fungible.entry(token).or_default().behavior = behavior;
    }

    /// # Errors
    /// `TransferFailed` if the balance would overflow.
    pub fn mint_fungible(&mut self, token: Address, owner: Address, amount: U256) -> Result<()> {
        let ledger = self.state.fungible.entry(token).or_default();
        mint_units(&mut ledger.balances, owner, amount)
    }

    pub fn approve_fungible(&mut self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.state
            .fungible
            .entry(token)
            .or_default()
            .allowances
            .insert((owner, spender), amount);
    }

    #[must_use]
    pub fn fungible_balance(&self, token: &Address, owner: &Address) -> U256 {
        self.state
            .fungible
            .get(token)
            .map_or(U256::ZERO, |t| t.balance_of(owner))
    }

    pub fn deploy_unique(&mut self, token: Address) {
        self.state.contracts.insert(token);
        self.state.unique.entry(token).or_default();
    }

    pub fn mint_unique(&mut self, token: Address, owner: Address, id: TokenId) {
        self.state
            .unique
            .entry(token)
            .or_default()
            .owners
            .insert(id, owner);
    }

    #[must_use]
    pub fn unique_owner(&self, token: &Address, id: TokenId) -> Option<Address> {
        self.state.unique.get(token).and_then(|t| t.owner_of(id))
    }

    pub fn deploy_semi_fungible(&mut self, token: Address) {
        self.state.contracts.insert(token);
        self.state.semi_fungible.entry(token).or_default();
    }

    /// # Errors
    /// `TransferFailed` if the balance would overflow.
    pub fn mint_semi_fungible(
        &mut self,
        token: Address,
        owner: Address,
        id: TokenId,
        amount: U256,
    ) -> Result<()> {
        let ledger = self.state.semi_fungible.entry(token).or_default();
        mint_units(&mut ledger.balances, (owner, id), amount)
    }

    #[must_use]
    pub fn semi_fungible_balance(&self, token: &Address, owner: &Address, id: TokenId) -> U256 {
        self.state
            .semi_fungible
            .get(token)
            .map_or(U256::ZERO, |t| t.balance_of(owner, id))
    }

    /// Let `operator` move every unique and semi-fungible token `owner`
    /// holds at `token`.
    pub fn set_approval_for_all(&mut self, token: Address, owner: Address, operator: Address) {
        if let Some(ledger) = self.state.unique.get_mut(&token) {
            ledger.operators.insert((owner, operator));
        }
        if let Some(ledger) = self.state.semi_fungible.get_mut(&token) {
            ledger.operators.insert((owner, operator));
        }
    }

    /// Unique-token `safeTransferFrom` executed by `operator` into
    /// `receiver`, followed by its hook.
    ///
    /// # Errors
    /// The token's revert reason, or the hook's rejection. Either way no
    /// ledger entry has changed.
    pub fn deliver_unique(
        &mut self,
        receiver: &mut dyn TokenReceiver,
        token: &Address,
        operator: &Address,
        from: &Address,
        id: TokenId,
        data: &[u8],
    ) -> Result<()> {
        let checkpoint = self.checkpoint();
        let outcome = self.unique_then_hook(receiver, token, operator, from, id, data);
        self.close(checkpoint, outcome)
    }

    /// Semi-fungible single `safeTransferFrom`, see [`Self::deliver_unique`].
    ///
    /// # Errors
    /// The token's revert reason, or the hook's rejection.
    #[allow(clippy::too_many_arguments)]
    pub fn deliver_semi_fungible(
        &mut self,
        receiver: &mut dyn TokenReceiver,
        token: &Address,
        operator: &Address,
        from: &Address,
        id: TokenId,
        amount: U256,
        data: &[u8],
    ) -> Result<()> {
        let checkpoint = self.checkpoint();
        let outcome = self.semi_fungible_then_hook(receiver, token, operator, from, id, amount, data);
        self.close(checkpoint, outcome)
    }

    /// Semi-fungible `safeBatchTransferFrom`.
    ///
    /// # Errors
    /// The token's revert reason, or the hook's rejection.
    #[allow(clippy::too_many_arguments)]
    pub fn deliver_semi_fungible_batch(
        &mut self,
        receiver: &mut dyn TokenReceiver,
        token: &Address,
        operator: &Address,
        from: &Address,
        ids: &[TokenId],
        amounts: &[U256],
        data: &[u8],
    ) -> Result<()> {
        let checkpoint = self.checkpoint();
        let outcome = self.batch_then_hook(receiver, token, operator, from, ids, amounts, data);
        self.close(checkpoint, outcome)
    }

    fn unique_then_hook(
        &mut self,
        receiver: &mut dyn TokenReceiver,
        token: &Address,
        operator: &Address,
        from: &Address,
        id: TokenId,
        data: &[u8],
    ) -> Result<()> {
        let to = receiver.receiver_address();
        self.unique(token)?.safe_transfer_from(operator, from, &to, id)?;
        let transfer = InboundTransfer {
            token: *token,
            operator: *operator,
            from: *from,
            token_id: id,
            amount: U256::from(1),
            data: data.to_vec(),
        };
        let answer = receiver.on_unique_received(&*self, &transfer)?;
        expect_acceptance(answer, UNIQUE_RECEIVED_SELECTOR)
    }

    #[allow(clippy::too_many_arguments)]
    fn semi_fungible_then_hook(
        &mut self,
        receiver: &mut dyn TokenReceiver,
        token: &Address,
        operator: &Address,
        from: &Address,
        id: TokenId,
        amount: U256,
        data: &[u8],
    ) -> Result<()> {
        let to = receiver.receiver_address();
        self.semi_fungible(token)?
            .safe_transfer_from(operator, from, &to, id, amount)?;
        let transfer = InboundTransfer {
            token: *token,
            operator: *operator,
            from: *from,
            token_id: id,
            amount,
            data: data.to_vec(),
        };
        let answer = receiver.on_semi_fungible_received(&*self, &transfer)?;
        expect_acceptance(answer, SEMI_FUNGIBLE_RECEIVED_SELECTOR)
    }

    #[allow(clippy::too_many_arguments)]
    fn batch_then_hook(
        &mut self,
        receiver: &mut dyn TokenReceiver,
        token: &Address,
        operator: &Address,
        from: &Address,
        ids: &[TokenId],
        amounts: &[U256],
        data: &[u8],
    ) -> Result<()> {
        if ids.len() != amounts.len() {
            return Err(revert("ids and amounts length mismatch"));
        }
        let to = receiver.receiver_address();
        let ledger = self.semi_fungible(token)?;
        for (id, amount) in ids.iter().zip(amounts) {
            ledger.safe_transfer_from(operator, from, &to, *id, *amount)?;
        }
        let answer = receiver
            .on_semi_fungible_batch_received(&*self, token, operator, from, ids, amounts, data)?;
        expect_acceptance(answer, SEMI_FUNGIBLE_BATCH_RECEIVED_SELECTOR)
    }

    fn close(&mut self, checkpoint: Checkpoint, outcome: Result<()>) -> Result<()> {
        match outcome {
            Ok(()) => {
                self.discard(checkpoint);
                Ok(())
            }
            Err(err) => {
                self.revert_to(checkpoint);
                Err(err)
            }
        }
    }
}

impl ChainView for MemoryChain {
    fn now(&self) -> u64 {
        self.now
    }

    fn has_code(&self, account: &Address) -> bool {
        self.state.contracts.contains(account)
    }

    fn native_balance(&self, account: &Address) -> U256 {
        self.state.native.get(account).copied().unwrap_or_default()
    }
}

impl Chain for MemoryChain {
    fn native_transfer(&mut self, from: &Address, to: &Address, amount: U256) -> Result<()> {
        move_units(&mut self.state.native, *from, *to, amount)
    }

    fn fungible(&mut self, token: &Address) -> Result<&mut dyn FungibleToken> {
        self.state
            .fungible
            .get_mut(token)
            .map(|t| t as &mut dyn FungibleToken)
            .ok_or(SwapError::UnknownAsset(*token))
    }

    fn unique(&mut self, token: &Address) -> Result<&mut dyn UniqueToken> {
        self.state
            .unique
            .get_mut(token)
            .map(|t| t as &mut dyn UniqueToken)
            .ok_or(SwapError::UnknownAsset(*token))
    }

    fn semi_fungible(&mut self, token: &Address) -> Result<&mut dyn SemiFungibleToken> {
        self.state
            .semi_fungible
            .get_mut(token)
            .map(|t| t as &mut dyn SemiFungibleToken)
            .ok_or(SwapError::UnknownAsset(*token))
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.snapshots.push(self.state.clone());
        Checkpoint(self.snapshots.len() - 1)
    }

    fn revert_to(&mut self, checkpoint: Checkpoint) {
        if checkpoint.0 >= self.snapshots.len() {
            return;
        }
        if let Some(snapshot) = self.snapshots.drain(checkpoint.0..).next() {
            self.state = snapshot;
        }
    }

    fn discard(&mut self, checkpoint: Checkpoint) {
        self.snapshots.truncate(checkpoint.0);
    }
}

/// Debit `from` and credit `to`, both or neither.
fn move_units<K: Copy + Eq + Hash>(
    balances: &mut HashMap<K, U256>,
    from: K,
    to: K,
    amount: U256,
) -> Result<()> {
    let from_balance = balances.get(&from).copied().unwrap_or_default();
    let remaining = from_balance
        .checked_sub(amount)
        .ok_or_else(|| revert("transfer amount exceeds balance"))?;
    if from == to {
        return Ok(());
    }
    let credited = balances
        .get(&to)
        .copied()
        .unwrap_or_default()
        .checked_add(amount)
        .ok_or_else(|| revert("balance overflow"))?;
    balances.insert(from, remaining);
    balances.insert(to, credited);
    Ok(())
}

fn mint_units<K: Eq + Hash>(balances: &mut HashMap<K, U256>, to: K, amount: U256) -> Result<()> {
    let balance = balances.entry(to).or_default();
    *balance = balance
        .checked_add(amount)
        .ok_or_else(|| revert("balance overflow"))?;
    Ok(())
}

fn expect_acceptance(answer: [u8; 4], expected: [u8; 4]) -> Result<()> {
    if answer == expected {
        Ok(())
    } else {
        Err(revert("receiver returned a wrong acceptance value"))
    }
}

fn revert(reason: &str) -> SwapError {
    SwapError::TransferFailed {
        reason: reason.to_string(),
    }
}
