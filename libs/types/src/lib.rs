//! # Pathfinder Types Library
//!
//! Shared vocabulary for the order book graph and the path search engine.
//!
//! ## Design Philosophy
//!
//! - **No Floating Point**: Amounts are `i64` in the smallest unit of each asset and
//!   prices are exact `u32` rationals compared by cross-multiplication
//! - **Tagged Variants**: Asset kinds and pool bodies are enums matched exhaustively
//! - **Validated Entries**: Ingested offers and pools are checked before they can be
//!   staged into a graph ([`EntryError`] is the MalformedEntry error)
//!
//! ## Quick Start
//!
//! ```rust
//! use types::{Asset, Offer, OfferId, Price};
//!
//! let usd: Asset = "USD:GISSUER".parse().unwrap();
//! let offer = Offer::new(OfferId::new(1), Asset::Native, usd, 100, Price::new(2, 1));
//! assert!(offer.validate().is_ok());
//! ```

pub mod common;
pub mod entries;

pub use common::asset::{Asset, CreditAsset, MAX_ASSET_CODE_LENGTH};
pub use common::errors::{EntryError, ValidationError};
pub use common::identifiers::{OfferId, PoolId};
pub use common::price::{Amount, Price, MAX_AMOUNT};

pub use entries::offer::Offer;
pub use entries::pool::{ConstantProductPool, LiquidityPool, PoolBody, MAX_FEE_BPS};
