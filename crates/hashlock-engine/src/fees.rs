//! Burn-fee accounting.
//!
//! A burn fee is never transferred. Spending a Taker payment that carries
//! one only adds it to a per-asset counter for off-chain processing; the
//! units stay in the escrow account.

use std::collections::HashMap;

use hashlock_types::{AssetDescriptor, U256};

/// Per-asset, monotonically increasing burn-fee totals.
#[derive(Debug, Clone, Default)]
pub struct BurnFeeLedger {
    totals: HashMap<AssetDescriptor, U256>,
}

impl BurnFeeLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, asset: AssetDescriptor, fee: U256) {
        let total = self.totals.entry(asset).or_default();
        *total = total.saturating_add(fee);
    }

    #[must_use]
    pub fn total(&self, asset: &AssetDescriptor) -> U256 {
        self.totals.get(asset).copied().unwrap_or_default()
    }
}
