//! Asset identifiers
//!
//! An asset is either the ledger's native currency or a credit asset scoped to an
//! issuer. Ordering is total and stable (native first, then by code, then by issuer)
//! so assets can key ordered maps and sort path candidates deterministically.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::common::errors::ValidationError;

/// Longest permitted credit asset code
pub const MAX_ASSET_CODE_LENGTH: usize = 12;

/// Issuer-scoped credit asset
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CreditAsset {
    code: String,
    issuer: String,
}

impl CreditAsset {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}

/// Unit of value traded on the order book
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Asset {
    Native,
    Credit(CreditAsset),
}

impl Asset {
    /// Build a credit asset, validating the code and issuer
    pub fn credit(code: &str, issuer: &str) -> Result<Self, ValidationError> {
        if code.is_empty()
            || code.len() > MAX_ASSET_CODE_LENGTH
            || !code.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(ValidationError::InvalidAssetCode {
                code: code.to_string(),
            });
        }
        if issuer.is_empty() {
            return Err(ValidationError::MissingIssuer {
                code: code.to_string(),
            });
        }
        Ok(Asset::Credit(CreditAsset {
            code: code.to_string(),
            issuer: issuer.to_string(),
        }))
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }

    /// Asset code, `None` for the native asset
    pub fn code(&self) -> Option<&str> {
        match self {
            Asset::Native => None,
            Asset::Credit(credit) => Some(credit.code()),
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Native => write!(f, "native"),
            Asset::Credit(credit) => write!(f, "{}:{}", credit.code, credit.issuer),
        }
    }
}

impl FromStr for Asset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "native" {
            return Ok(Asset::Native);
        }
        match s.split_once(':') {
            Some((code, issuer)) if !issuer.contains(':') => Asset::credit(code, issuer),
            _ => Err(ValidationError::InvalidAssetFormat {
                input: s.to_string(),
            }),
        }
    }
}

impl Serialize for Asset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
