//! # Path Search Engine
//!
//! ## Purpose
//!
//! Bounded-depth exploration of the asset graph of one committed
//! [`GraphSnapshot`](crate::graph::GraphSnapshot), simulating offer and pool
//! liquidity hop by hop without touching shared state.
//!
//! - **Forward** ([`FixedSourceRequest`]): a fixed source amount, best destination
//!   amount per destination asset
//! - **Backward** ([`FixedDestinationRequest`]): a fixed destination amount, minimal
//!   source amount per source asset
//!
//! ## Hop Evaluation
//!
//! Each hop is priced against the pair's offer book (cheapest first) and, when
//! pools are included, the connecting pool. The better venue wins the hop; venues
//! are never combined. On equal results the offer book is used.
//!
//! ## Pruning
//!
//! - Simple paths only: an asset never repeats within a path
//! - Depth is bounded by `min(max_path_length, max_assets_per_path)`
//! - An asset reached with a strictly worse amount than one already seen at the
//!   same or a shallower depth is not expanded further
//! - Cancellation is checked before every hop expansion

mod engine;
mod hop;

use serde::{Deserialize, Serialize};
use types::{Amount, Asset, OfferId, PoolId};

use crate::errors::SearchError;

/// Upper bound accepted for either length limit
pub const MAX_SEARCH_DEPTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    /// Maximum number of hops
    pub max_path_length: usize,
    /// Maximum number of assets entered after the starting asset
    pub max_assets_per_path: usize,
    /// Consider liquidity pools as hop venues
    pub include_pools: bool,
}

impl SearchLimits {
    pub fn new(max_path_length: usize, max_assets_per_path: usize, include_pools: bool) -> Self {
        Self {
            max_path_length,
            max_assets_per_path,
            include_pools,
        }
    }

    /// Effective hop bound
    pub fn max_hops(&self) -> usize {
        self.max_path_length.min(self.max_assets_per_path)
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        for (name, value) in [
            ("max_path_length", self.max_path_length),
            ("max_assets_per_path", self.max_assets_per_path),
        ] {
            if value == 0 || value > MAX_SEARCH_DEPTH {
                return Err(SearchError::InvalidLimits {
                    reason: format!("{} must be within 1..={}, got {}", name, MAX_SEARCH_DEPTH, value),
                });
            }
        }
        Ok(())
    }
}

/// Fixed source amount, searching destination amounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedSourceRequest {
    pub source_asset: Asset,
    pub source_amount: Amount,
    pub destination_assets: Vec<Asset>,
    pub limits: SearchLimits,
}

/// Fixed destination amount, searching required source amounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedDestinationRequest {
    pub destination_asset: Asset,
    pub destination_amount: Amount,
    pub source_assets: Vec<Asset>,
    pub limits: SearchLimits,
}

/// Offer liquidity consumed by one hop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferFill {
    pub offer_id: OfferId,
    /// Units of the offer's selling asset taken
    pub amount_sold: Amount,
    /// Units of the offer's buying asset paid
    pub amount_bought: Amount,
}

/// Liquidity source used by a hop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Venue {
    Offers { fills: Vec<OfferFill> },
    Pool { pool_id: PoolId },
}

/// One conversion step of a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hop {
    pub from: Asset,
    pub to: Asset,
    pub amount_in: Amount,
    pub amount_out: Amount,
    pub venue: Venue,
}

/// Best conversion found between two assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    /// Source first, destination last
    pub assets: Vec<Asset>,
    pub source_amount: Amount,
    pub destination_amount: Amount,
    /// One entry per consecutive asset pair, in path order
    pub hops: Vec<Hop>,
}

impl Path {
    pub fn source_asset(&self) -> Option<&Asset> {
        self.assets.first()
    }

    pub fn destination_asset(&self) -> Option<&Asset> {
        self.assets.last()
    }

    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }
}

fn validate_amount(amount: Amount) -> Result<(), SearchError> {
    if amount <= 0 {
        return Err(SearchError::InvalidAmount(amount));
    }
    Ok(())
}
