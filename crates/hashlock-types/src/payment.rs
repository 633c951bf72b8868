//! # Payment records and their state machines
//!
//! The escrow stores one compact record per swap id and role. Parameters are
//! never stored, only their [`Fingerprint`]; every mutating call re-supplies
//! them and the fingerprint is recomputed.
//!
//! ## Maker payment
//!
//! ```text
//!   Uninitialized ──create──▶ PaymentSent ──spend──────────────▶ TakerSpent
//!                                  │
//!                                  └──refund (timelock|secret)──▶ MakerRefunded
//! ```
//!
//! ## Taker payment (two-phase)
//!
//! ```text
//!   Uninitialized ──create──▶ PaymentSent ──approve──▶ TakerApproved ──spend──▶ MakerSpent
//!                                  │                         │
//!                                  │ refund (pre-approve     │ refund (payment
//!                                  │ lock | taker secret)    │ lock only)
//!                                  ▼                         ▼
//!                             TakerRefunded ◀────────────────┘
//! ```
//!
//! ## Legacy (v1) payment
//!
//! ```text
//!   Uninitialized ──create──▶ PaymentSent ──▶ { ReceiverSpent | SenderRefunded }
//! ```
//!
//! Transitions are monotonic: records are never deleted and never touched
//! again after a terminal state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Fingerprint;

/// Common behaviour of the per-role state enums.
pub trait PaymentState: Copy + Eq + fmt::Display {
    /// State of an id that has no record.
    const UNINITIALIZED: Self;

    /// Can this state move to `target`? Every pair not listed is illegal.
    fn can_transition_to(&self, target: Self) -> bool;

    /// No transition leaves this state.
    fn is_terminal(&self) -> bool;

    /// Upper-case label used in errors and logs.
    fn label(&self) -> &'static str;
}

/// Common behaviour of the per-role records.
pub trait PaymentRecord: Clone + Default {
    type State: PaymentState;

    fn state(&self) -> Self::State;
    fn fingerprint(&self) -> Fingerprint;

    /// Overwrite the state. Callers check [`PaymentState::can_transition_to`] first.
    fn set_state(&mut self, state: Self::State);
}

// ---------------------------------------------------------------------------
// Maker payment
// ---------------------------------------------------------------------------

/// Lifecycle of a Maker payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MakerPaymentState {
    #[default]
    Uninitialized,
    /// Funds are in escrow.
    PaymentSent,
    /// The taker revealed the maker secret and took the funds. Terminal.
    TakerSpent,
    /// The maker took the funds back, by timelock or taker secret. Terminal.
    MakerRefunded,
}

impl PaymentState for MakerPaymentState {
    const UNINITIALIZED: Self = Self::Uninitialized;

    fn can_transition_to(&self, target: Self) -> bool {
        match (self, target) {
            (Self::Uninitialized, Self::PaymentSent)
            | (Self::PaymentSent, Self::TakerSpent | Self::MakerRefunded) => true,
            _ => false,
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Self::TakerSpent | Self::MakerRefunded)
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Uninitialized => "UNINITIALIZED",
            Self::PaymentSent => "PAYMENT_SENT",
            Self::TakerSpent => "TAKER_SPENT",
            Self::MakerRefunded => "MAKER_REFUNDED",
        }
    }
}

impl fmt::Display for MakerPaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stored Maker payment: fingerprint, one lock time, state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakerPayment {
    pub fingerprint: Fingerprint,
    /// Epoch seconds after which the maker may refund without a secret.
    pub lock_time: u64,
    pub state: MakerPaymentState,
}

impl PaymentRecord for MakerPayment {
    type State = MakerPaymentState;

    fn state(&self) -> MakerPaymentState {
        self.state
    }

    fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    fn set_state(&mut self, state: MakerPaymentState) {
        self.state = state;
    }
}

// ---------------------------------------------------------------------------
// Taker payment
// ---------------------------------------------------------------------------

/// Lifecycle of a two-phase Taker payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TakerPaymentState {
    #[default]
    Uninitialized,
    /// Funds are in escrow, the taker can still refund early.
    PaymentSent,
    /// The maker approved. Only the long payment lock allows a refund now.
    TakerApproved,
    /// The maker revealed its secret and took the funds. Terminal.
    MakerSpent,
    /// The taker took the funds back. Terminal.
    TakerRefunded,
}

impl PaymentState for TakerPaymentState {
    const UNINITIALIZED: Self = Self::Uninitialized;

    fn can_transition_to(&self, target: Self) -> bool {
        match (self, target) {
            (Self::Uninitialized, Self::PaymentSent)
            | (Self::PaymentSent, Self::TakerApproved | Self::TakerRefunded)
            | (Self::TakerApproved, Self::MakerSpent | Self::TakerRefunded) => true,
            _ => false,
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Self::MakerSpent | Self::TakerRefunded)
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Uninitialized => "UNINITIALIZED",
            Self::PaymentSent => "PAYMENT_SENT",
            Self::TakerApproved => "TAKER_APPROVED",
            Self::MakerSpent => "MAKER_SPENT",
            Self::TakerRefunded => "TAKER_REFUNDED",
        }
    }
}

impl fmt::Display for TakerPaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stored Taker payment: fingerprint, two lock times, state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakerPayment {
    pub fingerprint: Fingerprint,
    /// Refund deadline while the payment is not yet approved.
    pub pre_approve_lock_time: u64,
    /// Refund deadline once the maker approved.
    pub payment_lock_time: u64,
    pub state: TakerPaymentState,
}

impl TakerPayment {
    /// The lock time that gates a timelock refund from the current state,
    /// or `None` if no timelock refund is possible from it.
    #[must_use]
    pub fn refund_lock_time(&self) -> Option<u64> {
        match self.state {
            TakerPaymentState::PaymentSent => Some(self.pre_approve_lock_time),
            TakerPaymentState::TakerApproved => Some(self.payment_lock_time),
            TakerPaymentState::Uninitialized
            | TakerPaymentState::MakerSpent
            | TakerPaymentState::TakerRefunded => None,
        }
    }
}

impl PaymentRecord for TakerPayment {
    type State = TakerPaymentState;

    fn state(&self) -> TakerPaymentState {
        self.state
    }

    fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    fn set_state(&mut self, state: TakerPaymentState) {
        self.state = state;
    }
}

// ---------------------------------------------------------------------------
// Legacy payment
// ---------------------------------------------------------------------------

/// Lifecycle of a single-role v1 payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LegacyPaymentState {
    #[default]
    Uninitialized,
    PaymentSent,
    /// The receiver revealed the secret and took the funds. Terminal.
    ReceiverSpent,
    /// The sender refunded after the lock time. Terminal.
    SenderRefunded,
}

impl PaymentState for LegacyPaymentState {
    const UNINITIALIZED: Self = Self::Uninitialized;

    fn can_transition_to(&self, target: Self) -> bool {
        match (self, target) {
            (Self::Uninitialized, Self::PaymentSent)
            | (Self::PaymentSent, Self::ReceiverSpent | Self::SenderRefunded) => true,
            _ => false,
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Self::ReceiverSpent | Self::SenderRefunded)
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Uninitialized => "UNINITIALIZED",
            Self::PaymentSent => "PAYMENT_SENT",
            Self::ReceiverSpent => "RECEIVER_SPENT",
            Self::SenderRefunded => "SENDER_REFUNDED",
        }
    }
}

impl fmt::Display for LegacyPaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyPayment {
    pub fingerprint: Fingerprint,
    pub lock_time: u64,
    pub state: LegacyPaymentState,
}

impl PaymentRecord for LegacyPayment {
    type State = LegacyPaymentState;

    fn state(&self) -> LegacyPaymentState {
        self.state
    }

    fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    fn set_state(&mut self, state: LegacyPaymentState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maker_transitions() {
        use MakerPaymentState::*;
        assert!(Uninitialized.can_transition_to(PaymentSent));
        assert!(PaymentSent.can_transition_to(TakerSpent));
        assert!(PaymentSent.can_transition_to(MakerRefunded));

        assert!(!Uninitialized.can_transition_to(TakerSpent));
        assert!(!TakerSpent.can_transition_to(MakerRefunded));
        assert!(!MakerRefunded.can_transition_to(TakerSpent));
        assert!(!PaymentSent.can_transition_to(PaymentSent));
    }

    #[test]
    fn taker_transitions() {
        use TakerPaymentState::*;
        assert!(PaymentSent.can_transition_to(TakerApproved));
        assert!(PaymentSent.can_transition_to(TakerRefunded));
        assert!(TakerApproved.can_transition_to(MakerSpent));
        assert!(TakerApproved.can_transition_to(TakerRefunded));

        assert!(!PaymentSent.can_transition_to(MakerSpent), "spend needs approval");
        assert!(!TakerApproved.can_transition_to(PaymentSent));
        assert!(!MakerSpent.can_transition_to(TakerRefunded));
        assert!(!TakerRefunded.can_transition_to(MakerSpent));
    }

    #[test]
    fn legacy_transitions() {
        use LegacyPaymentState::*;
        assert!(PaymentSent.can_transition_to(ReceiverSpent));
        assert!(PaymentSent.can_transition_to(SenderRefunded));
        assert!(!ReceiverSpent.can_transition_to(SenderRefunded));
    }

    #[test]
    fn terminal_states() {
        assert!(MakerPaymentState::TakerSpent.is_terminal());
        assert!(!MakerPaymentState::PaymentSent.is_terminal());
        assert!(TakerPaymentState::TakerRefunded.is_terminal());
        assert!(!TakerPaymentState::TakerApproved.is_terminal());
        assert!(LegacyPaymentState::SenderRefunded.is_terminal());
    }

    #[test]
    fn default_record_is_uninitialized() {
        assert_eq!(MakerPayment::default().state, MakerPaymentState::Uninitialized);
        assert_eq!(TakerPayment::default().state, TakerPaymentState::Uninitialized);
        assert_eq!(
            LegacyPayment::default().state,
            LegacyPaymentState::Uninitialized
        );
        assert_eq!(MakerPayment::default().fingerprint, Fingerprint::default());
    }

    #[test]
    fn taker_refund_lock_time_by_state() {
        let mut p = TakerPayment {
            fingerprint: Fingerprint::default(),
            pre_approve_lock_time: 10,
            payment_lock_time: 100,
            state: TakerPaymentState::PaymentSent,
        };
        assert_eq!(p.refund_lock_time(), Some(10));
        p.state = TakerPaymentState::TakerApproved;
        assert_eq!(p.refund_lock_time(), Some(100));
        p.state = TakerPaymentState::MakerSpent;
        assert_eq!(p.refund_lock_time(), None);
    }

    #[test]
    fn state_display() {
        assert_eq!(TakerPaymentState::TakerApproved.to_string(), "TAKER_APPROVED");
        assert_eq!(MakerPaymentState::MakerRefunded.to_string(), "MAKER_REFUNDED");
    }
}
