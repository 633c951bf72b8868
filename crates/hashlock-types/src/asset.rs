//! Asset descriptors: what a payment locks.
//!
//! The quantity travels next to the descriptor as a `U256` in base units. A [`AssetDescriptor::UniqueToken`] always moves exactly one unit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Address, TokenId};

/// The kind of asset, including its contract address and token id where
/// applicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetDescriptor {
    /// The chain's native coin.
    NativeCoin,
    /// A fungible token contract.
    FungibleToken(Address),
    /// One unique (non-fungible) token.
    UniqueToken(Address, TokenId),
    /// A quantity of one id of a semi-fungible token contract.
    SemiFungibleToken(Address, TokenId),
}

impl AssetDescriptor {
    /// The token contract address. Native coin encodes as the zero address.
    #[must_use]
    pub fn contract(&self) -> Address {
        match self {
            Self::NativeCoin => Address::ZERO,
            Self::FungibleToken(token)
            | Self::UniqueToken(token, _)
            | Self::SemiFungibleToken(token, _) => *token,
        }
    }

    #[must_use]
    pub fn token_id(&self) -> Option<TokenId> {
        match self {
            Self::NativeCoin | Self::FungibleToken(_) => None,
            Self::UniqueToken(_, id) | Self::SemiFungibleToken(_, id) => Some(*id),
        }
    }

    /// Native coin and fungible tokens: created by a direct call that pulls
    /// value from the caller. Unique and semi-fungible assets arrive through
    /// the receiver hook instead.
    #[must_use]
    pub fn is_pullable(&self) -> bool {
        matches!(self, Self::NativeCoin | Self::FungibleToken(_))
    }

    /// Short kind label for logs and errors.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NativeCoin => "NATIVE",
            Self::FungibleToken(_) => "FUNGIBLE",
            Self::UniqueToken(..) => "UNIQUE",
            Self::SemiFungibleToken(..) => "SEMI_FUNGIBLE",
        }
    }
}

impl fmt::Display for AssetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NativeCoin => write!(f, "native"),
            Self::FungibleToken(token) => write!(f, "fungible:{token}"),
            Self::UniqueToken(token, id) => write!(f, "unique:{token}{id}"),
            Self::SemiFungibleToken(token, id) => write!(f, "semi:{token}{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_contract_is_zero() {
        assert_eq!(AssetDescriptor::NativeCoin.contract(), Address::ZERO);
        assert_eq!(AssetDescriptor::NativeCoin.token_id(), None);
    }

    #[test]
    fn token_ids_exposed() {
        let token = Address::repeat_byte(9);
        let unique = AssetDescriptor::UniqueToken(token, TokenId::from(4));
        assert_eq!(unique.contract(), token);
        assert_eq!(unique.token_id(), Some(TokenId::from(4)));
        assert!(!unique.is_pullable());
        assert!(AssetDescriptor::FungibleToken(token).is_pullable());
    }

    #[test]
    fn kind_labels() {
        let token = Address::repeat_byte(9);
        assert_eq!(AssetDescriptor::NativeCoin.kind(), "NATIVE");
        assert_eq!(
            AssetDescriptor::SemiFungibleToken(token, TokenId::from(1)).kind(),
            "SEMI_FUNGIBLE"
        );
    }
}
