//! Per-role payment registry.
//!
//! Maps a swap id to its record. An id without a record is in the
//! `Uninitialized` state and reads as the all-zero default record. Records
//! are never deleted once a transition has been committed.

use std::collections::HashMap;

use hashlock_types::{PaymentRecord, PaymentState, Result, SwapError, SwapId};

/// Registry of one payment role.
#[derive(Debug, Clone)]
pub struct PaymentRegistry<R: PaymentRecord> {
    records: HashMap<SwapId, R>,
}

impl<R: PaymentRecord> Default for PaymentRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: PaymentRecord> PaymentRegistry<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// The record of `id`, or the default `Uninitialized` record.
    #[must_use]
    pub fn get(&self, id: &SwapId) -> R {
        self.records.get(id).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn state(&self, id: &SwapId) -> R::State {
        self.records
            .get(id)
            .map_or(<R::State as PaymentState>::UNINITIALIZED, PaymentRecord::state)
    }

    /// The record of `id` if it is in `expected`.
    ///
    /// # Errors
    /// `InvalidState` otherwise.
    pub fn expect_state(&self, id: &SwapId, expected: R::State) -> Result<R> {
        let record = self.get(id);
        let actual = record.state();
        if actual == expected {
            Ok(record)
        } else {
            Err(invalid_state(id, expected.label(), actual))
        }
    }

    /// Store a freshly created record.
    ///
    /// # Errors
    /// `InvalidState` if `id` already has a record, or if `record` is not in a
    /// state reachable from `Uninitialized`.
    pub fn create(&mut self, id: SwapId, record: R) -> Result<()> {
        let uninitialized = <R::State as PaymentState>::UNINITIALIZED;
        let actual = self.state(&id);
        if actual != uninitialized {
            return Err(invalid_state(&id, uninitialized.label(), actual));
        }
        if !uninitialized.can_transition_to(record.state()) {
            return Err(invalid_state(&id, "a creation state", record.state()));
        }
        self.records.insert(id, record);
        Ok(())
    }

    /// Move `id` to `target`. Returns the record as it was before, for
    /// [`Self::restore`] if the surrounding call fails later.
    ///
    /// # Errors
    /// `InvalidState` if the current state cannot move to `target`.
    pub fn transition(&mut self, id: &SwapId, target: R::State) -> Result<R> {
        let previous = self.get(id);
        let current = previous.state();
        if !current.can_transition_to(target) {
            return Err(invalid_state(id, "a state that precedes the target", current));
        }
        let mut next = previous.clone();
        next.set_state(target);
        self.records.insert(*id, next);
        Ok(previous)
    }

    /// Put back a record returned by [`Self::transition`].
    pub fn restore(&mut self, id: SwapId, previous: R) {
        if previous.state() == <R::State as PaymentState>::UNINITIALIZED {
            self.records.remove(&id);
        } else {
            self.records.insert(id, previous);
        }
    }

    /// Number of ids that have a record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn invalid_state<S: PaymentState>(id: &SwapId, expected: &'static str, actual: S) -> SwapError {
    SwapError::InvalidState {
        id: *id,
        expected,
        actual: actual.label(),
    }
}

#[cfg(test)]
mod tests {
    use hashlock_types::{Fingerprint, MakerPayment, MakerPaymentState};

    use super::*;

    fn sent() -> MakerPayment {
        MakerPayment {
            fingerprint: Fingerprint::new([1u8; 20]),
            lock_time: 100,
            state: MakerPaymentState::PaymentSent,
        }
    }

    #[test]
    fn unknown_id_reads_as_default() {
        let registry: PaymentRegistry<MakerPayment> = PaymentRegistry::new();
        let id = SwapId::new([9u8; 32]);
        assert_eq!(registry.get(&id), MakerPayment::default());
        assert_eq!(registry.state(&id), MakerPaymentState::Uninitialized);
        assert!(registry.is_empty());
    }

    #[test]
    fn create_only_once() {
        let mut registry = PaymentRegistry::new();
        let id = SwapId::new([1u8; 32]);
        registry.create(id, sent()).unwrap();
        let err = registry.create(id, sent()).unwrap_err();
        assert!(matches!(
            err,
            SwapError::InvalidState {
                expected: "UNINITIALIZED",
                actual: "PAYMENT_SENT",
                ..
            }
        ));
    }

    #[test]
    fn create_rejects_non_creation_state() {
        let mut registry = PaymentRegistry::new();
        let mut record = sent();
        record.state = MakerPaymentState::TakerSpent;
        assert!(registry.create(SwapId::new([1u8; 32]), record).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn transition_is_one_shot() {
        let mut registry = PaymentRegistry::new();
        let id = SwapId::new([1u8; 32]);
        registry.create(id, sent()).unwrap();

        let previous = registry
            .transition(&id, MakerPaymentState::TakerSpent)
            .unwrap();
        assert_eq!(previous.state, MakerPaymentState::PaymentSent);
        assert_eq!(registry.get(&id).lock_time, 100);

        assert!(registry.transition(&id, MakerPaymentState::MakerRefunded).is_err());
        assert!(registry.transition(&id, MakerPaymentState::TakerSpent).is_err());
    }

    #[test]
    fn restore_undoes_transition() {
        let mut registry = PaymentRegistry::new();
        let id = SwapId::new([1u8; 32]);
        registry.create(id, sent()).unwrap();
        let previous = registry
            .transition(&id, MakerPaymentState::MakerRefunded)
            .unwrap();
        registry.restore(id, previous);
        assert_eq!(registry.state(&id), MakerPaymentState::PaymentSent);
    }

    #[test]
    fn restore_of_uninitialized_removes() {
        let mut registry = PaymentRegistry::new();
        let id = SwapId::new([1u8; 32]);
        registry.create(id, sent()).unwrap();
        registry.restore(id, MakerPayment::default());
        assert!(registry.is_empty());
    }

    #[test]
    fn expect_state_reports_labels() {
        let registry: PaymentRegistry<MakerPayment> = PaymentRegistry::new();
        let err = registry
            .expect_state(&SwapId::new([2u8; 32]), MakerPaymentState::PaymentSent)
            .unwrap_err();
        assert_eq!(
            err,
            SwapError::InvalidState {
                id: SwapId::new([2u8; 32]),
                expected: "PAYMENT_SENT",
                actual: "UNINITIALIZED",
            }
        );
    }
}
