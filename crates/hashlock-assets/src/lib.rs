//! # hashlock-assets
//!
//! **Asset Transfer Adapter** and the collaborator boundaries of the escrow.
//!
//! - [`chain`]: host chain and token contract traits, receiver hooks
//! - [`adapter`]: pull / push over every [`hashlock_types::AssetDescriptor`]
//! - [`payload`]: the receiver-hook parameter block
//! - [`memory`]: in-process host used by tests and simulations

pub mod adapter;
pub mod chain;
pub mod memory;
pub mod payload;

pub use adapter::{balance_of, AssetAdapter};
pub use chain::{
    Chain, ChainView, Checkpoint, FungibleToken, InboundTransfer, SemiFungibleToken,
    TokenReceiver, UniqueToken,
};
pub use memory::{MemoryChain, TokenBehavior};
pub use payload::HookPayload;
