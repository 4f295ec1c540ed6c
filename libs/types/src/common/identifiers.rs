//! # Typed Identifiers for Ledger Entries
//!
//! Zero-cost wrappers that keep offer ids and pool ids from being confused with
//! amounts or ledger sequences at compile time.
//!
//! ```rust
//! use types::{OfferId, PoolId};
//!
//! let offer = OfferId::new(42);
//! let pool = PoolId::from([7u8; 32]);
//!
//! assert_eq!(offer.inner(), 42);
//! assert_eq!(pool.to_string().len(), 64);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::common::errors::ValidationError;

/// Macro for generating typed integer id wrappers
///
/// Creates a new type that wraps `i64` with identical memory layout and a
/// transparent serde representation.
#[macro_export]
macro_rules! define_typed_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[repr(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Create a new typed ID
            #[inline(always)]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Extract the inner value
            #[inline(always)]
            pub const fn inner(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            #[inline(always)]
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            #[inline(always)]
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                self.0.serialize(serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                <i64>::deserialize(deserializer).map(Self)
            }
        }
    };
}

define_typed_id!(
    /// Ledger-assigned identifier of a standing offer
    OfferId
);

/// 32-byte liquidity pool identifier, rendered as lowercase hex
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct PoolId(pub [u8; 32]);

impl PoolId {
    #[inline(always)]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short prefix used in log lines
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl From<[u8; 32]> for PoolId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PoolId({})", hex::encode(self.0))
    }
}

impl FromStr for PoolId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(cleaned, &mut bytes)
            .map_err(|e| ValidationError::InvalidPoolId(format!("{}: {}", s, e)))?;
        Ok(Self(bytes))
    }
}

impl Serialize for PoolId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PoolId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_id_hex_roundtrip() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xab;
        bytes[31] = 0x01;
        let id = PoolId::from(bytes);

        let text = id.to_string();
        assert!(text.starts_with("ab"));
        assert_eq!(text.parse::<PoolId>().unwrap(), id);
        assert_eq!(format!("0x{}", text).parse::<PoolId>().unwrap(), id);
        assert_eq!(id.short(), "ab000000");
    }

    #[test]
    fn test_pool_id_rejects_short_hex() {
        assert!(matches!(
            "abcd".parse::<PoolId>(),
            Err(ValidationError::InvalidPoolId(_))
        ));
    }

    #[test]
    fn test_offer_id_serializes_as_integer() {
        let json = serde_json::to_string(&OfferId::new(77)).unwrap();
        assert_eq!(json, "77");
        let back: OfferId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OfferId::new(77));
    }
}
