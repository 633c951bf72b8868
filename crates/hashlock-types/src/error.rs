//! Error types for the hashlock swap escrow.
//!
//! All errors use the `HL_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Input validation
//! - 2xx: Payment state
//! - 3xx: Authorization (commitment, lock time)
//! - 4xx: Asset transfers
//! - 5xx: Inbound receiver hook
//! - 6xx: Escrow accounting
//! - 9xx: General / configuration

use thiserror::Error;

use crate::{Address, SwapId};

/// Central error enum for all hashlock operations.
///
/// Every variant aborts the triggering call. Nothing is retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    // =================================================================
    // Input Validation (1xx)
    // =================================================================
    /// A counterparty, token contract or fee sink was the zero address.
    #[error("HL_ERR_100: Zero address supplied for {field}")]
    ZeroAddress { field: &'static str },

    /// A locked amount or received token id was zero.
    #[error("HL_ERR_101: Zero amount supplied for {field}")]
    ZeroAmount { field: &'static str },

    /// `amount + fees` does not fit the amount type.
    #[error("HL_ERR_102: Amount overflow while summing payment total")]
    AmountOverflow,

    // =================================================================
    // Payment State (2xx)
    // =================================================================
    /// The payment is not in the state the operation requires.
    #[error("HL_ERR_200: Invalid payment state for {id}: expected {expected}, got {actual}")]
    InvalidState {
        id: SwapId,
        expected: &'static str,
        actual: &'static str,
    },

    // =================================================================
    // Authorization (3xx)
    // =================================================================
    /// The recomputed fingerprint differs from the stored one.
    ///
    /// Deliberately carries no detail: it must not reveal which field
    /// (address, amount, secret) was wrong.
    #[error("HL_ERR_300: Invalid commitment")]
    InvalidCommitment,

    /// The refund lock time has not been reached by the chain clock.
    #[error("HL_ERR_301: Lock time not elapsed: now {now}, unlocks at {lock_time}")]
    LockNotElapsed { now: u64, lock_time: u64 },

    // =================================================================
    // Asset Transfers (4xx)
    // =================================================================
    /// A collaborator transfer returned `false` or reverted.
    #[error("HL_ERR_400: Transfer failed: {reason}")]
    TransferFailed { reason: String },

    /// The operation is not supported (batch receipt, burn fee on a
    /// deployment without burn accounting, wrong asset kind for the path).
    #[error("HL_ERR_401: Unsupported operation: {reason}")]
    UnsupportedOperation { reason: String },

    /// No collaborator contract of the required kind exists at the address.
    #[error("HL_ERR_402: Unknown asset contract {0}")]
    UnknownAsset(Address),

    // =================================================================
    // Inbound Receiver Hook (5xx)
    // =================================================================
    /// The embedded parameter block did not decode exactly.
    #[error("HL_ERR_500: Malformed receiver payload: {reason}")]
    MalformedPayload { reason: String },

    /// The calling asset contract is not the token declared in the payload.
    #[error("HL_ERR_501: Asset contract mismatch: declared {declared}, caller {caller}")]
    AssetMismatch { declared: Address, caller: Address },

    /// The transfer was initiated by an operator other than the holder.
    #[error("HL_ERR_502: Operator {operator} is not the asset holder {holder}")]
    OperatorMismatch { operator: Address, holder: Address },

    /// The declared counterparty holds executable code.
    #[error("HL_ERR_503: Counterparty {0} is a contract")]
    ContractCounterparty(Address),

    // =================================================================
    // Escrow Accounting (6xx)
    // =================================================================
    /// Escrow holdings differ from locked minus released, critical alert.
    #[error("HL_ERR_600: Holdings invariant violation: {reason}")]
    HoldingsInvariantViolation { reason: String },

    // =================================================================
    // General (9xx)
    // =================================================================
    /// Invalid deployment configuration.
    #[error("HL_ERR_900: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("HL_ERR_901: Serialization error: {0}")]
    Serialization(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SwapError>;

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
