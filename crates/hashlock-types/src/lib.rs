//! # hashlock-types
//!
//! Shared types, errors, and configuration for the **hashlock** swap escrow.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`SwapId`], [`Secret`], [`SecretHash`],
//!   [`LegacySecretHash`], [`Fingerprint`], [`TokenId`], plus the
//!   re-exported `alloy-primitives` [`Address`], [`B256`] and [`U256`]
//! - **Assets**: [`AssetDescriptor`]
//! - **Payment records**: [`MakerPayment`], [`TakerPayment`], [`LegacyPayment`]
//!   and their state enums
//! - **Notifications**: [`SwapEvent`]
//! - **Configuration**: [`EscrowConfig`], [`CounterpartyPolicy`]
//! - **Errors**: [`SwapError`] with `HL_ERR_` prefix codes
//! - **Constants**: wire widths and receiver selectors

pub mod asset;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod payment;

pub use asset::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use payment::*;

// Constants are accessed via `hashlock_types::constants::FOO`.
