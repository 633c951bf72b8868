//! Escrow holdings conservation.
//!
//! ```text
//! ∀ asset: held_by_escrow == Σ(locked) − Σ(released)
//! ```
//!
//! Burn fees are locked and never released, so they remain part of the
//! expected holdings.

use std::collections::HashMap;

use hashlock_types::{AssetDescriptor, Result, SwapError, U256};

/// Per-asset lock / release totals since the escrow was created.
#[derive(Debug, Clone, Default)]
pub struct HoldingsLedger {
    locked: HashMap<AssetDescriptor, U256>,
    released: HashMap<AssetDescriptor, U256>,
}

impl HoldingsLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_lock(&mut self, asset: AssetDescriptor, amount: U256) {
        let entry = self.locked.entry(asset).or_default();
        *entry = entry.saturating_add(amount);
    }

    pub fn record_release(&mut self, asset: AssetDescriptor, amount: U256) {
        let entry = self.released.entry(asset).or_default();
        *entry = entry.saturating_add(amount);
    }

    /// Units the escrow should hold: locked − released.
    #[must_use]
    pub fn expected(&self, asset: &AssetDescriptor) -> U256 {
        self.locked_total(asset)
            .saturating_sub(self.released_total(asset))
    }

    /// Compare what the chain reports for the escrow account with the
    /// expected holdings.
    ///
    /// # Errors
    /// [`SwapError::HoldingsInvariantViolation`] if they differ, or if more
    /// was ever released than locked.
    pub fn verify(&self, asset: &AssetDescriptor, actual: U256) -> Result<()> {
        let locked = self.locked_total(asset);
        let released = self.released_total(asset);
        if released > locked {
            return Err(SwapError::HoldingsInvariantViolation {
                reason: format!("{asset}: released {released} exceeds locked {locked}"),
            });
        }
        let expected = locked - released;
        if actual != expected {
            return Err(SwapError::HoldingsInvariantViolation {
                reason: format!(
                    "{asset}: escrow holds {actual}, expected {expected} \
                     (locked={locked}, released={released})"
                ),
            });
        }
        Ok(())
    }

    fn locked_total(&self, asset: &AssetDescriptor) -> U256 {
        self.locked.get(asset).copied().unwrap_or_default()
    }

    fn released_total(&self, asset: &AssetDescriptor) -> U256 {
        self.released.get(asset).copied().unwrap_or_default()
    }
}
