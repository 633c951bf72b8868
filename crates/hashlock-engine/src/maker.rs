//! Maker payment flow.
//!
//! ```text
//! Uninitialized ──create──▶ PaymentSent ──spend (maker secret)──▶ TakerSpent
//!                                │
//!                                ├──refund after lock time──▶ MakerRefunded
//!                                └──refund (taker secret)───▶ MakerRefunded
//! ```
//!
//! Native coin and fungible payments are created here. Unique and
//! semi-fungible payments are created by the receiver hook
//! ([`crate::inbound`]) and then follow the same transitions.

use hashlock_assets::Chain;
use hashlock_commitment::MakerTerms;
use hashlock_types::{
    Address, MakerPayment, MakerPaymentState, Result, Secret, SwapEvent, SwapId,
};

use crate::escrow::{
    authorize, require_address, require_amount, require_pullable, require_unlocked, settle, units,
    SwapEscrow,
};

impl SwapEscrow {
    /// Lock `terms.amount` of `terms.asset` from `caller` (the maker) for
    /// `terms.taker`.
    ///
    /// `terms.maker` is replaced by `caller`.
    ///
    /// # Errors
    /// `InvalidState` if the id is taken, `ZeroAmount` / `ZeroAddress` on
    /// missing parameters, `UnsupportedOperation` for hook-only assets,
    /// `TransferFailed` if the deposit cannot be pulled.
    pub fn create_maker_payment<C: Chain + ?Sized>(
        &mut self,
        chain: &mut C,
        caller: Address,
        id: SwapId,
        terms: MakerTerms,
        lock_time: u64,
    ) -> Result<()> {
        self.makers
            .expect_state(&id, MakerPaymentState::Uninitialized)?;
        require_amount(terms.amount, "amount")?;
        require_address(&terms.taker, "taker")?;
        require_pullable(&terms.asset)?;

        let terms = MakerTerms {
            maker: caller,
            ..terms
        };
        self.makers.create(
            id,
            MakerPayment {
                fingerprint: terms.fingerprint(),
                lock_time,
                state: MakerPaymentState::PaymentSent,
            },
        )?;

        let adapter = self.adapter;
        if let Err(err) = settle(chain, |chain| {
            adapter.pull(chain, &caller, &terms.asset, terms.amount)
        }) {
            self.makers.restore(id, MakerPayment::default());
            return Err(err);
        }

        self.holdings.record_lock(terms.asset, terms.amount);
        tracing::info!(
            id = %id,
            role = "maker",
            asset = %terms.asset,
            amount = %terms.amount,
            lock_time,
            "Payment locked"
        );
        self.emit(SwapEvent::MakerPaymentSent { id });
        Ok(())
    }

    /// The taker claims the payment by revealing the maker secret.
    ///
    /// `terms.taker` is replaced by `caller`; `terms.maker_secret_hash` is
    /// replaced by the hash of `maker_secret`.
    ///
    /// # Errors
    /// `InvalidState` unless `PaymentSent`, `InvalidCommitment` on any field
    /// mismatch, `TransferFailed` if the payout fails.
    pub fn spend_maker_payment<C: Chain + ?Sized>(
        &mut self,
        chain: &mut C,
        caller: Address,
        id: SwapId,
        maker_secret: &Secret,
        terms: MakerTerms,
    ) -> Result<()> {
        let record = self
            .makers
            .expect_state(&id, MakerPaymentState::PaymentSent)?;
        let terms = MakerTerms {
            taker: caller,
            ..terms
        }
        .with_maker_secret(maker_secret);
        authorize(&id, &record.fingerprint, &terms.fingerprint())?;

        self.release_maker_payment(
            chain,
            id,
            MakerPaymentState::TakerSpent,
            caller,
            &terms,
            SwapEvent::MakerPaymentSpent {
                id,
                maker_secret: *maker_secret,
            },
        )
    }

    /// The maker takes the payment back once its lock time has passed.
    ///
    /// `terms.maker` is replaced by `caller`.
    ///
    /// # Errors
    /// `InvalidState`, `InvalidCommitment`, `LockNotElapsed` before the lock
    /// time, `TransferFailed`.
    pub fn refund_maker_payment_timelock<C: Chain + ?Sized>(
        &mut self,
        chain: &mut C,
        caller: Address,
        id: SwapId,
        terms: MakerTerms,
    ) -> Result<()> {
        let record = self
            .makers
            .expect_state(&id, MakerPaymentState::PaymentSent)?;
        let terms = MakerTerms {
            maker: caller,
            ..terms
        };
        authorize(&id, &record.fingerprint, &terms.fingerprint())?;
        require_unlocked(chain.now(), record.lock_time)?;

        self.release_maker_payment(
            chain,
            id,
            MakerPaymentState::MakerRefunded,
            caller,
            &terms,
            SwapEvent::MakerPaymentRefundedTimelock { id },
        )
    }

    /// The maker takes the payment back at any time by presenting the taker
    /// secret, which the taker leaked while refunding its own payment.
    ///
    /// `terms.maker` is replaced by `caller`; `terms.taker_secret_hash` by the
    /// hash of `taker_secret`.
    ///
    /// # Errors
    /// `InvalidState`, `InvalidCommitment`, `TransferFailed`.
    pub fn refund_maker_payment_secret<C: Chain + ?Sized>(
        &mut self,
        chain: &mut C,
        caller: Address,
        id: SwapId,
        taker_secret: &Secret,
        terms: MakerTerms,
    ) -> Result<()> {
        let record = self
            .makers
            .expect_state(&id, MakerPaymentState::PaymentSent)?;
        let terms = MakerTerms {
            maker: caller,
            ..terms
        }
        .with_taker_secret(taker_secret);
        authorize(&id, &record.fingerprint, &terms.fingerprint())?;

        self.release_maker_payment(
            chain,
            id,
            MakerPaymentState::MakerRefunded,
            caller,
            &terms,
            SwapEvent::MakerPaymentRefundedSecret {
                id,
                taker_secret: *taker_secret,
            },
        )
    }

    /// Commit `target`, then pay the locked asset out to `recipient`.
    fn release_maker_payment<C: Chain + ?Sized>(
        &mut self,
        chain: &mut C,
        id: SwapId,
        target: MakerPaymentState,
        recipient: Address,
        terms: &MakerTerms,
        event: SwapEvent,
    ) -> Result<()> {
        let amount = units(&terms.asset, terms.amount);

        let previous = self.makers.transition(&id, target)?;
        let adapter = self.adapter;
        if let Err(err) = settle(chain, |chain| {
            adapter.push(chain, &recipient, &terms.asset, amount)
        }) {
            self.makers.restore(id, previous);
            return Err(err);
        }

        self.holdings.record_release(terms.asset, amount);
        tracing::info!(id = %id, role = "maker", state = %target, to = %recipient, "Payment released");
        self.emit(event);
        Ok(())
    }
}
