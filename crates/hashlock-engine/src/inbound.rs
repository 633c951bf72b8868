//! Receiver hook: reactive creation of unique / semi-fungible Maker
//! payments.
//!
//! The maker sends the token straight to the escrow with the swap
//! parameters in the transfer's data. The hook validates in a fixed order
//! and either records a `PaymentSent` Maker payment and returns the
//! acceptance value, or fails and lets the token contract revert the
//! transfer:
//!
//! 1. The data decodes as exactly one parameter block
//! 2. The calling contract is the declared token
//! 3. The operator is the holder the token came from
//! 4. The id is unused
//! 5. Token id (unique) or amount (semi-fungible) is non-zero
//! 6. The taker is non-zero
//! 7. The taker holds no code, unless the deployment allows contracts

use hashlock_assets::{ChainView, HookPayload, InboundTransfer, TokenReceiver};
use hashlock_commitment::MakerTerms;
use hashlock_types::constants::{SEMI_FUNGIBLE_RECEIVED_SELECTOR, UNIQUE_RECEIVED_SELECTOR};
use hashlock_types::{
    Address, AssetDescriptor, CounterpartyPolicy, MakerPayment, MakerPaymentState, Result,
    SwapError, SwapEvent, TokenId, U256,
};

use crate::escrow::{require_address, require_amount, units, SwapEscrow};

impl SwapEscrow {
    fn accept_deposit(
        &mut self,
        chain: &dyn ChainView,
        transfer: &InboundTransfer,
        asset: AssetDescriptor,
    ) -> Result<()> {
        let payload = HookPayload::decode(&transfer.data)?;
        if transfer.token != payload.token {
            return Err(SwapError::AssetMismatch {
                declared: payload.token,
                caller: transfer.token,
            });
        }
        if transfer.operator != transfer.from {
            return Err(SwapError::OperatorMismatch {
                operator: transfer.operator,
                holder: transfer.from,
            });
        }
        self.makers
            .expect_state(&payload.id, MakerPaymentState::Uninitialized)?;
        match asset {
            AssetDescriptor::UniqueToken(..) => require_amount(transfer.token_id.0, "token_id")?,
            _ => require_amount(transfer.amount, "amount")?,
        }
        require_address(&payload.taker, "taker")?;
        if self.config().counterparty_policy == CounterpartyPolicy::RejectContracts
            && chain.has_code(&payload.taker)
        {
            return Err(SwapError::ContractCounterparty(payload.taker));
        }

        let terms = MakerTerms {
            maker: transfer.from,
            taker: payload.taker,
            taker_secret_hash: payload.taker_secret_hash,
            maker_secret_hash: payload.maker_secret_hash,
            asset,
            amount: transfer.amount,
        };
        self.makers.create(
            payload.id,
            MakerPayment {
                fingerprint: terms.fingerprint(),
                lock_time: payload.lock_time,
                state: MakerPaymentState::PaymentSent,
            },
        )?;

        self.holdings
            .record_lock(asset, units(&asset, transfer.amount));
        tracing::info!(
            id = %payload.id,
            role = "maker",
            asset = %asset,
            amount = %transfer.amount,
            lock_time = payload.lock_time,
            "Payment received through receiver hook"
        );
        self.emit(SwapEvent::MakerPaymentSent { id: payload.id });
        Ok(())
    }
}

fn rejected(kind: &str, transfer: &InboundTransfer, err: &SwapError) {
    tracing::warn!(
        kind,
        token = %transfer.token,
        from = %transfer.from,
        token_id = %transfer.token_id,
        error = %err,
        "Inbound transfer rejected"
    );
}

impl TokenReceiver for SwapEscrow {
    fn receiver_address(&self) -> Address {
        self.address()
    }

    fn on_unique_received(
        &mut self,
        chain: &dyn ChainView,
        transfer: &InboundTransfer,
    ) -> Result<[u8; 4]> {
        let asset = AssetDescriptor::UniqueToken(transfer.token, transfer.token_id);
        self.accept_deposit(chain, transfer, asset)
            .inspect_err(|err| rejected("unique", transfer, err))?;
        Ok(UNIQUE_RECEIVED_SELECTOR)
    }

    fn on_semi_fungible_received(
        &mut self,
        chain: &dyn ChainView,
        transfer: &InboundTransfer,
    ) -> Result<[u8; 4]> {
        let asset = AssetDescriptor::SemiFungibleToken(transfer.token, transfer.token_id);
        self.accept_deposit(chain, transfer, asset)
            .inspect_err(|err| rejected("semi_fungible", transfer, err))?;
        Ok(SEMI_FUNGIBLE_RECEIVED_SELECTOR)
    }

    fn on_semi_fungible_batch_received(
        &mut self,
        _chain: &dyn ChainView,
        token: &Address,
        _operator: &Address,
        from: &Address,
        ids: &[TokenId],
        _amounts: &[U256],
        _data: &[u8],
    ) -> Result<[u8; 4]> {
        tracing::warn!(token = %token, from = %from, ids = ids.len(), "Batch transfer rejected");
        Err(SwapError::UnsupportedOperation {
            reason: "batch transfers cannot create swap payments".to_string(),
        })
    }
}
