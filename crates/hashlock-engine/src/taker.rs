//! Taker payment flow (two-phase, with fee splitting).
//!
//! ```text
//! Uninitialized ──create──▶ PaymentSent ──approve──▶ TakerApproved ──spend──▶ MakerSpent
//!                               │                          │
//!                               │  pre-approve lock time   │  payment lock time
//!                               │  or taker secret         │
//!                               └──────────────▶ TakerRefunded ◀┘
//! ```
//!
//! The taker locks `amount + dex_fee (+ burn_fee)`. On spend the maker
//! receives `amount`, the dex-fee sink receives `dex_fee`, and `burn_fee`
//! stays in escrow and is only counted. A refund returns everything.

use hashlock_assets::Chain;
use hashlock_commitment::{FeeTerms, TakerTerms};
use hashlock_types::{
    Address, PaymentState, Result, Secret, SwapError, SwapEvent, SwapId, TakerPayment,
    TakerPaymentState,
};

use crate::escrow::{
    authorize, require_address, require_amount, require_pullable, require_unlocked, settle,
    SwapEscrow,
};

impl SwapEscrow {
    /// Lock `terms.total()` of `terms.asset` from `caller` (the taker) for
    /// `terms.maker`.
    ///
    /// `terms.taker` is replaced by `caller`.
    ///
    /// # Errors
    /// `InvalidState` if the id is taken; `ZeroAmount` / `ZeroAddress`;
    /// `UnsupportedOperation` for hook-only assets or for a burn fee on a
    /// deployment without burn accounting; `AmountOverflow`;
    /// `TransferFailed`.
    pub fn create_taker_payment<C: Chain + ?Sized>(
        &mut self,
        chain: &mut C,
        caller: Address,
        id: SwapId,
        terms: TakerTerms,
        pre_approve_lock_time: u64,
        payment_lock_time: u64,
    ) -> Result<()> {
        self.takers
            .expect_state(&id, TakerPaymentState::Uninitialized)?;
        require_amount(terms.amount, "amount")?;
        require_address(&terms.maker, "maker")?;
        require_pullable(&terms.asset)?;
        self.check_fee_terms(&terms.fees)?;

        let terms = TakerTerms {
            taker: caller,
            ..terms
        };
        let total = terms.total()?;
        self.takers.create(
            id,
            TakerPayment {
                fingerprint: terms.fingerprint(),
                pre_approve_lock_time,
                payment_lock_time,
                state: TakerPaymentState::PaymentSent,
            },
        )?;

        let adapter = self.adapter;
        if let Err(err) = settle(chain, |chain| adapter.pull(chain, &caller, &terms.asset, total)) {
            self.takers.restore(id, TakerPayment::default());
            return Err(err);
        }

        self.holdings.record_lock(terms.asset, total);
        tracing::info!(
            id = %id,
            role = "taker",
            asset = %terms.asset,
            amount = %terms.amount,
            dex_fee = %terms.fees.dex_fee,
            burn_fee = %terms.fees.burn_fee.unwrap_or_default(),
            pre_approve_lock_time,
            payment_lock_time,
            "Payment locked"
        );
        self.emit(SwapEvent::TakerPaymentSent { id });
        Ok(())
    }

    /// The maker confirms it has seen the taker payment. From here on only
    /// the payment lock time allows a timelock refund.
    ///
    /// `terms.maker` is replaced by `caller`.
    ///
    /// # Errors
    /// `InvalidState` unless `PaymentSent`, `InvalidCommitment`.
    pub fn approve_taker_payment(
        &mut self,
        caller: Address,
        id: SwapId,
        terms: TakerTerms,
    ) -> Result<()> {
        let record = self
            .takers
            .expect_state(&id, TakerPaymentState::PaymentSent)?;
        let terms = TakerTerms {
            maker: caller,
            ..terms
        };
        authorize(&id, &record.fingerprint, &terms.fingerprint())?;

        self.takers
            .transition(&id, TakerPaymentState::TakerApproved)?;
        tracing::info!(id = %id, role = "taker", state = %TakerPaymentState::TakerApproved, "Payment approved");
        self.emit(SwapEvent::TakerPaymentApproved { id });
        Ok(())
    }

    /// The maker claims an approved payment by revealing its secret.
    ///
    /// `terms.maker` is replaced by `caller`; `terms.maker_secret_hash` by the
    /// hash of `maker_secret`.
    ///
    /// # Errors
    /// `InvalidState` unless `TakerApproved`, `InvalidCommitment`,
    /// `TransferFailed`.
    pub fn spend_taker_payment<C: Chain + ?Sized>(
        &mut self,
        chain: &mut C,
        caller: Address,
        id: SwapId,
        maker_secret: &Secret,
        terms: TakerTerms,
    ) -> Result<()> {
        let record = self
            .takers
            .expect_state(&id, TakerPaymentState::TakerApproved)?;
        let terms = TakerTerms {
            maker: caller,
            ..terms
        }
        .with_maker_secret(maker_secret);
        authorize(&id, &record.fingerprint, &terms.fingerprint())?;

        let previous = self.takers.transition(&id, TakerPaymentState::MakerSpent)?;
        let adapter = self.adapter;
        let sink = self.config().dex_fee_address;
        let FeeTerms { dex_fee, burn_fee } = terms.fees;
        if let Err(err) = settle(chain, |chain| {
            adapter.push(chain, &caller, &terms.asset, terms.amount)?;
            if !dex_fee.is_zero() {
                adapter.push(chain, &sink, &terms.asset, dex_fee)?;
            }
            Ok(())
        }) {
            self.takers.restore(id, previous);
            return Err(err);
        }

        self.holdings
            .record_release(terms.asset, terms.amount.saturating_add(dex_fee));
        if let Some(burn_fee) = burn_fee {
            self.burn_fees.record(terms.asset, burn_fee);
        }
        tracing::info!(
            id = %id,
            role = "taker",
            state = %TakerPaymentState::MakerSpent,
            to = %caller,
            amount = %terms.amount,
            dex_fee = %dex_fee,
            burn_fee = %burn_fee.unwrap_or_default(),
            "Payment released"
        );
        self.emit(SwapEvent::TakerPaymentSpent {
            id,
            maker_secret: *maker_secret,
        });
        Ok(())
    }

    /// The taker takes its payment back after the lock time that applies to
    /// the current state: the pre-approve lock before approval, the payment
    /// lock after.
    ///
    /// `terms.taker` is replaced by `caller`.
    ///
    /// # Errors
    /// `InvalidState` unless `PaymentSent` or `TakerApproved`,
    /// `InvalidCommitment`, `LockNotElapsed`, `TransferFailed`.
    pub fn refund_taker_payment_timelock<C: Chain + ?Sized>(
        &mut self,
        chain: &mut C,
        caller: Address,
        id: SwapId,
        terms: TakerTerms,
    ) -> Result<()> {
        let record = self.takers.get(&id);
        let Some(lock_time) = record.refund_lock_time() else {
            return Err(SwapError::InvalidState {
                id,
                expected: "PAYMENT_SENT or TAKER_APPROVED",
                actual: record.state.label(),
            });
        };
        let terms = TakerTerms {
            taker: caller,
            ..terms
        };
        authorize(&id, &record.fingerprint, &terms.fingerprint())?;
        require_unlocked(chain.now(), lock_time)?;

        self.refund_taker_payment(
            chain,
            id,
            &terms,
            SwapEvent::TakerPaymentRefundedTimelock { id },
        )
    }

    /// The taker takes its payment back before approval by revealing its own
    /// secret. Revealing it lets the maker refund its side as well.
    ///
    /// `terms.taker` is replaced by `caller`; `terms.taker_secret_hash` by the
    /// hash of `taker_secret`.
    ///
    /// # Errors
    /// `InvalidState` unless `PaymentSent`, `InvalidCommitment`,
    /// `TransferFailed`.
    pub fn refund_taker_payment_secret<C: Chain + ?Sized>(
        &mut self,
        chain: &mut C,
        caller: Address,
        id: SwapId,
        taker_secret: &Secret,
        terms: TakerTerms,
    ) -> Result<()> {
        let record = self
            .takers
            .expect_state(&id, TakerPaymentState::PaymentSent)?;
        let terms = TakerTerms {
            taker: caller,
            ..terms
        }
        .with_taker_secret(taker_secret);
        authorize(&id, &record.fingerprint, &terms.fingerprint())?;

        self.refund_taker_payment(
            chain,
            id,
            &terms,
            SwapEvent::TakerPaymentRefundedSecret {
                id,
                taker_secret: *taker_secret,
            },
        )
    }

    fn refund_taker_payment<C: Chain + ?Sized>(
        &mut self,
        chain: &mut C,
        id: SwapId,
        terms: &TakerTerms,
        event: SwapEvent,
    ) -> Result<()> {
        let total = terms.total()?;
        let previous = self
            .takers
            .transition(&id, TakerPaymentState::TakerRefunded)?;
        let adapter = self.adapter;
        if let Err(err) = settle(chain, |chain| {
            adapter.push(chain, &terms.taker, &terms.asset, total)
        }) {
            self.takers.restore(id, previous);
            return Err(err);
        }

        self.holdings.record_release(terms.asset, total);
        tracing::info!(
            id = %id,
            role = "taker",
            state = %TakerPaymentState::TakerRefunded,
            to = %terms.taker,
            total = %total,
            "Payment released"
        );
        self.emit(event);
        Ok(())
    }

    fn check_fee_terms(&self, fees: &FeeTerms) -> Result<()> {
        if fees.burn_fee.is_some() && !self.config().burn_fee_accounting {
            return Err(SwapError::UnsupportedOperation {
                reason: "burn fee supplied but burn-fee accounting is disabled".to_string(),
            });
        }
        Ok(())
    }
}
