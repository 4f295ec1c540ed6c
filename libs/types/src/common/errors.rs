//! Error types for asset parsing and ledger entry validation
//!
//! [`EntryError`] is raised when ingestion supplies an offer or pool that can never
//! be live (non-positive amount or price, invalid fee). The entry is rejected before
//! it reaches a graph, so graph state is unaffected.

use thiserror::Error;

use crate::common::identifiers::{OfferId, PoolId};

/// Errors that can occur while parsing or constructing identifiers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Asset code is empty or longer than 12 characters
    #[error("Invalid asset code '{code}': expected 1 to 12 alphanumeric characters")]
    InvalidAssetCode { code: String },

    /// Credit asset without an issuer
    #[error("Asset '{code}' is missing an issuer")]
    MissingIssuer { code: String },

    /// Input is not `native` or `CODE:ISSUER`
    #[error("Invalid asset format: '{input}' - expected 'native' or 'CODE:ISSUER'")]
    InvalidAssetFormat { input: String },

    /// Pool id is not 32 bytes of hex
    #[error("Invalid pool id: {0}")]
    InvalidPoolId(String),
}

/// Malformed ledger entries supplied by ingestion
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("Offer {offer_id} has non-positive amount {amount}")]
    NonPositiveAmount { offer_id: OfferId, amount: i64 },

    #[error("Offer {offer_id} has invalid price {numerator}/{denominator}")]
    InvalidPrice {
        offer_id: OfferId,
        numerator: u32,
        denominator: u32,
    },

    #[error("Offer {offer_id} sells and buys the same asset")]
    SameAssetOffer { offer_id: OfferId },

    #[error("Pool {pool_id} has negative reserve {reserve}")]
    NegativeReserve { pool_id: PoolId, reserve: i64 },

    #[error("Pool {pool_id} has invalid fee {fee_bps} bps (must be below {max})")]
    InvalidFee {
        pool_id: PoolId,
        fee_bps: u32,
        max: u32,
    },

    #[error("Pool {pool_id} assets are not in canonical order")]
    NonCanonicalAssets { pool_id: PoolId },
}
