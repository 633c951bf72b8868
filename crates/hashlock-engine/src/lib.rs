//! # hashlock-engine
//!
//! **Payment registry, state machines and variant orchestration** of the
//! hashlock swap escrow.
//!
//! Three payment roles share one escrow account:
//!
//! - **Legacy v1** ([`legacy`]): sender → receiver, one 20-byte secret hash
//! - **Maker** ([`maker`]): maker → taker under two secret hashes; unique and
//!   semi-fungible payments arrive through the receiver hook ([`inbound`])
//! - **Taker** ([`taker`]): two-phase taker → maker with approval and a dex
//!   fee, optionally a counted burn fee ([`fees`])
//!
//! Every id moves through its role's state machine at most once per
//! transition. Authorization is a fingerprint match only: the escrow
//! stores `RIPEMD160(canonicalEncode(terms))` and every later call must
//! rebuild the same terms with the caller in its own slot.
//!
//! Holdings are tracked per asset ([`holdings`]) so the escrow account can be
//! audited against the host at any time.

pub mod escrow;
pub mod fees;
pub mod holdings;
pub mod inbound;
pub mod legacy;
pub mod maker;
pub mod registry;
pub mod taker;

pub use escrow::SwapEscrow;
pub use fees::BurnFeeLedger;
pub use hashlock_commitment::{FeeTerms, LegacyTerms, MakerTerms, TakerTerms};
pub use holdings::HoldingsLedger;
pub use registry::PaymentRegistry;
