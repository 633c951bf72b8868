//! Notifications emitted by the escrow, one per state transition.
//!
//! Every event carries the swap id. Secret-gated transitions also carry the
//! revealed secret: from that point it is public, which is how the other
//! side of the swap learns it.

use serde::{Deserialize, Serialize};

use crate::{Secret, SwapId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapEvent {
    // --- Legacy v1 ---
    PaymentSent { id: SwapId },
    ReceiverSpent { id: SwapId, secret: Secret },
    SenderRefunded { id: SwapId },

    // --- Maker v2 ---
    MakerPaymentSent { id: SwapId },
    MakerPaymentSpent { id: SwapId, maker_secret: Secret },
    MakerPaymentRefundedTimelock { id: SwapId },
    MakerPaymentRefundedSecret { id: SwapId, taker_secret: Secret },

    // --- Taker v2 ---
    TakerPaymentSent { id: SwapId },
    TakerPaymentApproved { id: SwapId },
    TakerPaymentSpent { id: SwapId, maker_secret: Secret },
    TakerPaymentRefundedTimelock { id: SwapId },
    TakerPaymentRefundedSecret { id: SwapId, taker_secret: Secret },
}

impl SwapEvent {
    #[must_use]
    pub fn id(&self) -> SwapId {
        match self {
            Self::PaymentSent { id }
            | Self::ReceiverSpent { id, .. }
            | Self::SenderRefunded { id }
            | Self::MakerPaymentSent { id }
            | Self::MakerPaymentSpent { id, .. }
            | Self::MakerPaymentRefundedTimelock { id }
            | Self::MakerPaymentRefundedSecret { id, .. }
            | Self::TakerPaymentSent { id }
            | Self::TakerPaymentApproved { id }
            | Self::TakerPaymentSpent { id, .. }
            | Self::TakerPaymentRefundedTimelock { id }
            | Self::TakerPaymentRefundedSecret { id, .. } => *id,
        }
    }

    /// The secret this transition published, if it was secret-gated.
    #[must_use]
    pub fn revealed_secret(&self) -> Option<Secret> {
        match self {
            Self::ReceiverSpent { secret, .. } => Some(*secret),
            Self::MakerPaymentSpent { maker_secret, .. }
            | Self::TakerPaymentSpent { maker_secret, .. } => Some(*maker_secret),
            Self::MakerPaymentRefundedSecret { taker_secret, .. }
            | Self::TakerPaymentRefundedSecret { taker_secret, .. } => Some(*taker_secret),
            Self::PaymentSent { .. }
            | Self::SenderRefunded { .. }
            | Self::MakerPaymentSent { .. }
            | Self::MakerPaymentRefundedTimelock { .. }
            | Self::TakerPaymentSent { .. }
            | Self::TakerPaymentApproved { .. }
            | Self::TakerPaymentRefundedTimelock { .. } => None,
        }
    }

    /// Event name as it appears in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PaymentSent { .. } => "PAYMENT_SENT",
            Self::ReceiverSpent { .. } => "RECEIVER_SPENT",
            Self::SenderRefunded { .. } => "SENDER_REFUNDED",
            Self::MakerPaymentSent { .. } => "MAKER_PAYMENT_SENT",
            Self::MakerPaymentSpent { .. } => "MAKER_PAYMENT_SPENT",
            Self::MakerPaymentRefundedTimelock { .. } => "MAKER_PAYMENT_REFUNDED_TIMELOCK",
            Self::MakerPaymentRefundedSecret { .. } => "MAKER_PAYMENT_REFUNDED_SECRET",
            Self::TakerPaymentSent { .. } => "TAKER_PAYMENT_SENT",
            Self::TakerPaymentApproved { .. } => "TAKER_PAYMENT_APPROVED",
            Self::TakerPaymentSpent { .. } => "TAKER_PAYMENT_SPENT",
            Self::TakerPaymentRefundedTimelock { .. } => "TAKER_PAYMENT_REFUNDED_TIMELOCK",
            Self::TakerPaymentRefundedSecret { .. } => "TAKER_PAYMENT_REFUNDED_SECRET",
        }
    }
}

impl std::fmt::Display for SwapEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_gated_events_carry_secret() {
        let id = SwapId::new([3u8; 32]);
        let secret = Secret::new([9u8; 32]);
        let spent = SwapEvent::MakerPaymentSpent {
            id,
            maker_secret: secret,
        };
        assert_eq!(spent.id(), id);
        assert_eq!(spent.revealed_secret(), Some(secret));

        let refunded = SwapEvent::TakerPaymentRefundedTimelock { id };
        assert_eq!(refunded.revealed_secret(), None);
    }

    #[test]
    fn display_includes_name_and_id() {
        let id = SwapId::new([0xcd; 32]);
        let ev = SwapEvent::TakerPaymentApproved { id };
        assert_eq!(ev.to_string(), format!("TAKER_PAYMENT_APPROVED({id})"));
        assert!(ev.to_string().starts_with("TAKER_PAYMENT_APPROVED(swap:0xcdcd"));
    }

    #[test]
    fn serde_roundtrip() {
        let ev = SwapEvent::ReceiverSpent {
            id: SwapId::new([1u8; 32]),
            secret: Secret::new([2u8; 32]),
        };
        let json = serde_json::to_string(&ev).unwrap();
        let back: SwapEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(ev, back);
    }
}
