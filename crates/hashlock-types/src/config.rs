//! Deployment-time configuration of an escrow instance.
//!
//! Validated once at construction and immutable afterwards.

use serde::{Deserialize, Serialize};

use crate::{Address, Result, SwapError};

/// Whether the inbound receiver hook accepts a counterparty that holds code.
///
/// Rejecting contracts keeps opaque counterparties (and any re-entry they
/// could attempt) out of the unique/semi-fungible path, but it also blocks
/// smart-contract wallets. Deployments choose explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterpartyPolicy {
    #[default]
    RejectContracts,
    AllowContracts,
}

/// Configuration for one escrow deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowConfig {
    /// The escrow's own address: holder of every locked asset.
    pub escrow_address: Address,
    /// Sink that receives the dex fee of every spent Taker payment.
    pub dex_fee_address: Address,
    /// Taker payments may carry a burn fee that is only counted.
    #[serde(default)]
    pub burn_fee_accounting: bool,
    #[serde(default)]
    pub counterparty_policy: CounterpartyPolicy,
}

impl EscrowConfig {
    #[must_use]
    pub fn new(escrow_address: Address, dex_fee_address: Address) -> Self {
        Self {
            escrow_address,
            dex_fee_address,
            burn_fee_accounting: false,
            counterparty_policy: CounterpartyPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_burn_accounting(mut self, enabled: bool) -> Self {
        self.burn_fee_accounting = enabled;
        self
    }

    #[must_use]
    pub fn with_counterparty_policy(mut self, policy: CounterpartyPolicy) -> Self {
        self.counterparty_policy = policy;
        self
    }

    /// Parse and validate a JSON configuration document. Addresses are
    /// `0x`-prefixed hex strings.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// `ZeroAddress` for a zero escrow or fee sink address,
    /// `Configuration` if the fee sink is the escrow itself.
    pub fn validate(&self) -> Result<()> {
        if self.escrow_address.is_zero() {
            return Err(SwapError::ZeroAddress {
                field: "escrow_address",
            });
        }
        if self.dex_fee_address.is_zero() {
            return Err(SwapError::ZeroAddress {
                field: "dex_fee_address",
            });
        }
        if self.dex_fee_address == self.escrow_address {
            return Err(SwapError::Configuration(
                "dex fee sink must differ from the escrow address".into(),
            ));
        }
        Ok(())
    }
}
