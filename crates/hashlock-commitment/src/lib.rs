//! # hashlock-commitment
//!
//! **Commitment Hasher**: the only authorization primitive of the escrow.
//!
//! ```text
//! fingerprint = RIPEMD160(canonicalEncode(fields...))
//! ```
//!
//! - [`encoding`]: packed fixed-width encoder
//! - [`digest`]: SHA-256 / RIPEMD-160 and secret folding
//! - [`terms`]: per-variant commitment tuples
//!
//! A mismatch at any field produces a different fingerprint and is reported
//! as the same `InvalidCommitment`, whichever field was wrong.

pub mod digest;
pub mod encoding;
pub mod terms;

pub use digest::{legacy_secret_hash, secret_hash, verify_fingerprint};
pub use encoding::CanonicalEncoder;
pub use terms::{FeeTerms, LegacyTerms, MakerTerms, TakerTerms};
