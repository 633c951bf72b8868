//! The escrow: registries, configuration, and the shared machinery every
//! payment flow goes through.
//!
//! A state-changing call follows one shape:
//!
//! 1. Check the expected state of the id
//! 2. Rebuild the commitment tuple with the caller in its role's slot and
//!    compare its fingerprint with the stored one
//! 3. Check lock times
//! 4. Commit the registry transition
//! 5. Move assets inside a host checkpoint
//! 6. On a failed transfer, revert the host and restore the previous record
//!
//! Flows live in [`crate::legacy`], [`crate::maker`], [`crate::taker`] and
//! [`crate::inbound`].

use hashlock_assets::{balance_of, AssetAdapter, Chain};
use hashlock_commitment::verify_fingerprint;
use hashlock_types::{
    Address, AssetDescriptor, EscrowConfig, Fingerprint, LegacyPayment, MakerPayment, Result,
    SwapError, SwapEvent, SwapId, TakerPayment, U256,
};

use crate::fees::BurnFeeLedger;
use crate::holdings::HoldingsLedger;
use crate::registry::PaymentRegistry;

/// Non-custodial hashed-timelock escrow.
///
/// Holds no balances of its own beyond what the host reports for
/// [`EscrowConfig::escrow_address`]; it only tracks which locked payment is
/// allowed to leave, to whom, and when.
#[derive(Debug, Clone)]
pub struct SwapEscrow {
    config: EscrowConfig,
    pub(crate) adapter: AssetAdapter,
    pub(crate) legacy: PaymentRegistry<LegacyPayment>,
    pub(crate) makers: PaymentRegistry<MakerPayment>,
    pub(crate) takers: PaymentRegistry<TakerPayment>,
    pub(crate) burn_fees: BurnFeeLedger,
    pub(crate) holdings: HoldingsLedger,
    events: Vec<SwapEvent>,
}

impl SwapEscrow {
    /// Create an escrow for a validated configuration.
    ///
    /// # Errors
    /// Whatever [`EscrowConfig::validate`] reports.
    pub fn new(config: EscrowConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            escrow = %config.escrow_address,
            dex_fee_sink = %config.dex_fee_address,
            burn_fee_accounting = config.burn_fee_accounting,
            policy = ?config.counterparty_policy,
            "Escrow created"
        );
        Ok(Self {
            adapter: AssetAdapter::new(config.escrow_address),
            config,
            legacy: PaymentRegistry::new(),
            makers: PaymentRegistry::new(),
            takers: PaymentRegistry::new(),
            burn_fees: BurnFeeLedger::new(),
            holdings: HoldingsLedger::new(),
            events: Vec::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &EscrowConfig {
        &self.config
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.config.escrow_address
    }

    // --- Read surface ---

    #[must_use]
    pub fn legacy_payment(&self, id: &SwapId) -> LegacyPayment {
        self.legacy.get(id)
    }

    #[must_use]
    pub fn maker_payment(&self, id: &SwapId) -> MakerPayment {
        self.makers.get(id)
    }

    #[must_use]
    pub fn taker_payment(&self, id: &SwapId) -> TakerPayment {
        self.takers.get(id)
    }

    /// Sum of burn fees counted for `asset`.
    #[must_use]
    pub fn burn_fee_total(&self, asset: &AssetDescriptor) -> U256 {
        self.burn_fees.total(asset)
    }

    /// Every notification emitted so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[SwapEvent] {
        &self.events
    }

    /// Take the pending notifications, leaving the log empty.
    pub fn drain_events(&mut self) -> Vec<SwapEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Holdings ---

    /// Units of `asset` the escrow account should hold right now.
    #[must_use]
    pub fn expected_holdings(&self, asset: &AssetDescriptor) -> U256 {
        self.holdings.expected(asset)
    }

    /// Check `actual` against the expected holdings of `asset`.
    ///
    /// # Errors
    /// `HoldingsInvariantViolation` on any difference.
    pub fn verify_holdings(&self, asset: &AssetDescriptor, actual: U256) -> Result<()> {
        self.holdings.verify(asset, actual)
    }

    /// Read the escrow account's balance of `asset` from the host and verify
    /// it.
    ///
    /// # Errors
    /// `HoldingsInvariantViolation`, or `UnknownAsset` if the token contract
    /// does not exist.
    pub fn audit_holdings<C: Chain + ?Sized>(
        &self,
        chain: &mut C,
        asset: &AssetDescriptor,
    ) -> Result<()> {
        let actual = balance_of(chain, &self.config.escrow_address, asset)?;
        self.holdings.verify(asset, actual).inspect_err(|err| {
            tracing::error!(asset = %asset, error = %err, "Escrow holdings out of balance");
        })
    }

    pub(crate) fn emit(&mut self, event: SwapEvent) {
        tracing::info!(id = %event.id(), event = event.name(), "Swap event");
        self.events.push(event);
    }
}

/// Run `transfers` inside a host checkpoint: either every transfer lands or
/// the host is reverted to where it was.
pub(crate) fn settle<C, F>(chain: &mut C, transfers: F) -> Result<()>
where
    C: Chain + ?Sized,
    F: FnOnce(&mut C) -> Result<()>,
{
    let checkpoint = chain.checkpoint();
    match transfers(chain) {
        Ok(()) => {
            chain.discard(checkpoint);
            Ok(())
        }
        Err(err) => {
            chain.revert_to(checkpoint);
            tracing::warn!(error = %err, "Transfer failed, call rolled back");
            Err(err)
        }
    }
}

/// Compare the fingerprint rebuilt from the caller's fields with the stored
/// one.
pub(crate) fn authorize(id: &SwapId, stored: &Fingerprint, computed: &Fingerprint) -> Result<()> {
    tracing::debug!(id = %id, computed = %computed, "Recomputed payment fingerprint");
    verify_fingerprint(stored, computed).inspect_err(|_| {
        tracing::warn!(id = %id, "Commitment mismatch");
    })
}

pub(crate) fn require_address(address: &Address, field: &'static str) -> Result<()> {
    if address.is_zero() {
        Err(SwapError::ZeroAddress { field })
    } else {
        Ok(())
    }
}

pub(crate) fn require_amount(amount: U256, field: &'static str) -> Result<()> {
    if amount.is_zero() {
        Err(SwapError::ZeroAmount { field })
    } else {
        Ok(())
    }
}

/// Native coin or a fungible token with a non-zero contract.
pub(crate) fn require_pullable(asset: &AssetDescriptor) -> Result<()> {
    if !asset.is_pullable() {
        return Err(SwapError::UnsupportedOperation {
            reason: format!(
                "{} payments are created through the receiver hook",
                asset.kind()
            ),
        });
    }
    if let AssetDescriptor::FungibleToken(token) = asset {
        require_address(token, "token")?;
    }
    Ok(())
}

pub(crate) fn require_unlocked(now: u64, lock_time: u64) -> Result<()> {
    if now < lock_time {
        Err(SwapError::LockNotElapsed { now, lock_time })
    } else {
        Ok(())
    }
}

/// Units that actually move for `asset`: a unique token is always one.
pub(crate) fn units(asset: &AssetDescriptor, amount: U256) -> U256 {
    match asset {
        AssetDescriptor::UniqueToken(..) => U256::from(1),
        AssetDescriptor::NativeCoin
        | AssetDescriptor::FungibleToken(_)
        | AssetDescriptor::SemiFungibleToken(..) => amount,
    }
}
