//! Legacy v1 payment flow.
//!
//! Single role: the sender locks native coin or a fungible token for a
//! receiver under one 20-byte secret hash `ripemd160(sha256(secret))`.

use hashlock_assets::Chain;
use hashlock_commitment::LegacyTerms;
use hashlock_types::{
    Address, LegacyPayment, LegacyPaymentState, Result, Secret, SwapEvent, SwapId,
};

use crate::escrow::{
    authorize, require_address, require_amount, require_pullable, require_unlocked, settle,
    SwapEscrow,
};

impl SwapEscrow {
    /// Lock `terms.amount` from `caller` (the sender) for `terms.receiver`.
    ///
    /// `terms.sender` is replaced by `caller`.
    ///
    /// # Errors
    /// `InvalidState`, `ZeroAmount`, `ZeroAddress`, `UnsupportedOperation`,
    /// `TransferFailed`.
    pub fn create_legacy_payment<C: Chain + ?Sized>(
        &mut self,
        chain: &mut C,
        caller: Address,
        id: SwapId,
        terms: LegacyTerms,
        lock_time: u64,
    ) -> Result<()> {
        self.legacy
            .expect_state(&id, LegacyPaymentState::Uninitialized)?;
        require_address(&terms.receiver, "receiver")?;
        require_amount(terms.amount, "amount")?;
        require_pullable(&terms.asset)?;

        let terms = LegacyTerms {
            sender: caller,
            ..terms
        };
        self.legacy.create(
            id,
            LegacyPayment {
                fingerprint: terms.fingerprint(),
                lock_time,
                state: LegacyPaymentState::PaymentSent,
            },
        )?;

        let adapter = self.adapter;
        if let Err(err) = settle(chain, |chain| {
            adapter.pull(chain, &caller, &terms.asset, terms.amount)
        }) {
            self.legacy.restore(id, LegacyPayment::default());
            return Err(err);
        }

        self.holdings.record_lock(terms.asset, terms.amount);
        tracing::info!(
            id = %id,
            role = "legacy",
            asset = %terms.asset,
            amount = %terms.amount,
            lock_time,
            "Payment locked"
        );
        self.emit(SwapEvent::PaymentSent { id });
        Ok(())
    }

    /// The receiver claims the payment with the secret.
    ///
    /// `terms.receiver` is replaced by `caller`; `terms.secret_hash` by the
    /// fold of `secret`.
    ///
    /// # Errors
    /// `InvalidState`, `InvalidCommitment`, `TransferFailed`.
    pub fn legacy_receiver_spend<C: Chain + ?Sized>(
        &mut self,
        chain: &mut C,
        caller: Address,
        id: SwapId,
        secret: &Secret,
        terms: LegacyTerms,
    ) -> Result<()> {
        let record = self
            .legacy
            .expect_state(&id, LegacyPaymentState::PaymentSent)?;
        let terms = LegacyTerms {
            receiver: caller,
            ..terms
        }
        .with_revealed_secret(secret);
        authorize(&id, &record.fingerprint, &terms.fingerprint())?;

        self.release_legacy_payment(
            chain,
            id,
            LegacyPaymentState::ReceiverSpent,
            caller,
            &terms,
            SwapEvent::ReceiverSpent {
                id,
                secret: *secret,
            },
        )
    }

    /// The sender takes the payment back after the lock time.
    ///
    /// `terms.sender` is replaced by `caller`.
    ///
    /// # Errors
    /// `InvalidState`, `InvalidCommitment`, `LockNotElapsed`,
    /// `TransferFailed`.
    pub fn legacy_sender_refund<C: Chain + ?Sized>(
        &mut self,
        chain: &mut C,
        caller: Address,
        id: SwapId,
        terms: LegacyTerms,
    ) -> Result<()> {
        let record = self
            .legacy
            .expect_state(&id, LegacyPaymentState::PaymentSent)?;
        let terms = LegacyTerms {
            sender: caller,
            ..terms
        };
        authorize(&id, &record.fingerprint, &terms.fingerprint())?;
        require_unlocked(chain.now(), record.lock_time)?;

        self.release_legacy_payment(
            chain,
            id,
            LegacyPaymentState::SenderRefunded,
            caller,
            &terms,
            SwapEvent::SenderRefunded { id },
        )
    }

    fn release_legacy_payment<C: Chain + ?Sized>(
        &mut self,
        chain: &mut C,
        id: SwapId,
        target: LegacyPaymentState,
        recipient: Address,
        terms: &LegacyTerms,
        event: SwapEvent,
    ) -> Result<()> {
        let previous = self.legacy.transition(&id, target)?;
        let adapter = self.adapter;
        if let Err(err) = settle(chain, |chain| {
            adapter.push(chain, &recipient, &terms.asset, terms.amount)
        }) {
            self.legacy.restore(id, previous);
            return Err(err);
        }

        self.holdings.record_release(terms.asset, terms.amount);
        tracing::info!(id = %id, role = "legacy", state = %target, to = %recipient, "Payment released");
        self.emit(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hashlock_assets::{ChainView, MemoryChain};
    use hashlock_commitment::legacy_secret_hash;
    use hashlock_types::{AssetDescriptor, EscrowConfig, SwapError, TokenId, U256};

    use super::*;

    const ESCROW: Address = Address::repeat_byte(0xee);
    const SENDER: Address = Address::repeat_byte(0x01);
    const RECEIVER: Address = Address::repeat_byte(0x02);

    fn setup() -> (MemoryChain, SwapEscrow) {
        let mut chain = MemoryChain::at(500);
        chain.deploy_contract(ESCROW);
        chain.mint_native(SENDER, U256::from(1_000)).unwrap();
        let escrow =
            SwapEscrow::new(EscrowConfig::new(ESCROW, Address::repeat_byte(0xfe))).unwrap();
        (chain, escrow)
    }

    fn terms(secret: &Secret) -> LegacyTerms {
        LegacyTerms {
            sender: SENDER,
            receiver: RECEIVER,
            secret_hash: legacy_secret_hash(secret),
            asset: AssetDescriptor::NativeCoin,
            amount: U256::from(250),
        }
    }

    #[test]
    fn receiver_spends_with_secret() {
        let (mut chain, mut escrow) = setup();
        let secret = Secret::new([3u8; 32]);
        let id = SwapId::new([1u8; 32]);
        escrow
            .create_legacy_payment(&mut chain, SENDER, id, terms(&secret), 600)
            .unwrap();
        assert_eq!(chain.native_balance(&ESCROW), U256::from(250));

        let wrong = Secret::new([4u8; 32]);
        assert_eq!(
            escrow
                .legacy_receiver_spend(&mut chain, RECEIVER, id, &wrong, terms(&secret))
                .unwrap_err(),
            SwapError::InvalidCommitment
        );
        escrow
            .legacy_receiver_spend(&mut chain, RECEIVER, id, &secret, terms(&secret))
            .unwrap();
        assert_eq!(chain.native_balance(&RECEIVER), U256::from(250));
        assert_eq!(escrow.legacy_payment(&id).state, LegacyPaymentState::ReceiverSpent);
        assert_eq!(
            escrow.events(),
            &[
                SwapEvent::PaymentSent { id },
                SwapEvent::ReceiverSpent { id, secret }
            ]
        );
    }

    #[test]
    fn sender_refunds_after_lock_time() {
        let (mut chain, mut escrow) = setup();
        let secret = Secret::new([3u8; 32]);
        let id = SwapId::new([1u8; 32]);
        escrow
            .create_legacy_payment(&mut chain, SENDER, id, terms(&secret), 600)
            .unwrap();

        assert!(matches!(
            escrow.legacy_sender_refund(&mut chain, SENDER, id, terms(&secret)),
            Err(SwapError::LockNotElapsed { .. })
        ));
        chain.advance_to(600);
        assert_eq!(
            escrow
                .legacy_sender_refund(&mut chain, RECEIVER, id, terms(&secret))
                .unwrap_err(),
            SwapError::InvalidCommitment
        );
        escrow
            .legacy_sender_refund(&mut chain, SENDER, id, terms(&secret))
            .unwrap();
        assert_eq!(chain.native_balance(&SENDER), U256::from(1_000));
        assert!(matches!(
            escrow.legacy_receiver_spend(&mut chain, RECEIVER, id, &secret, terms(&secret)),
            Err(SwapError::InvalidState { .. })
        ));
    }

    #[test]
    fn unique_tokens_are_not_supported() {
        let (mut chain, mut escrow) = setup();
        let secret = Secret::new([3u8; 32]);
        let mut t = terms(&secret);
        t.asset = AssetDescriptor::UniqueToken(Address::repeat_byte(0x71), TokenId::from(1));
        assert!(matches!(
            escrow.create_legacy_payment(&mut chain, SENDER, SwapId::new([1u8; 32]), t, 600),
            Err(SwapError::UnsupportedOperation { .. })
        ));
    }
}
