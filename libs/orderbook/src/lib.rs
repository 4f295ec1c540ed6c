//! # Order Book Graph & Path Search
//!
//! ## Purpose
//!
//! In-memory trading graph built from a ledger's standing offers and liquidity
//! pools, plus a multi-hop path search answering two questions: what a fixed source
//! amount can become across N-hop conversions, and what source amount a fixed
//! destination amount requires.
//!
//! ## Integration Points
//!
//! - **Input Sources**: [`LedgerEntryChange`] events from ledger ingestion, or
//!   direct staging calls on [`OrderBookGraph`]
//! - **Output Destinations**: [`Path`] results for the request layer
//! - **Pool Math**: constant-product trades from the `amm` crate
//! - **Cancellation**: callers pass a `CancellationToken` and impose deadlines by
//!   cancelling it
//!
//! ## Architecture Role
//!
//! ```text
//! Ledger Changes → [ChangeSet] → apply(seq) → [GraphSnapshot vN] → Path Search
//!       ↓               ↓              ↓               ↓                 ↓
//!  Offer/Pool      Last-write-wins  Copy-on-write   Arc shared by     Forward and
//!  upserts and     staging per id   rebuild, then   readers, never    backward DFS
//!  removals                         pointer swap    mutated           per request
//! ```
//!
//! ## Concurrency
//!
//! Any number of searches may run against snapshots while one writer stages and
//! commits. A commit holds the reader-visible lock only for the pointer swap.

pub mod changeset;
pub mod errors;
pub mod graph;
pub mod ingest;
pub mod search;
pub mod trading_pair;
pub mod traits;

pub use changeset::{Change, ChangeSet};
pub use errors::{GraphError, SearchError};
pub use graph::{GraphCheckpoint, GraphSnapshot, OrderBookGraph};
pub use ingest::{add_liquidity_pools, apply_entries, synthetic_pool_id, LedgerEntryChange};
pub use search::{
    FixedDestinationRequest, FixedSourceRequest, Hop, OfferFill, Path, SearchLimits, Venue,
    MAX_SEARCH_DEPTH,
};
pub use trading_pair::{canonical_pair, compare_offers, TradingPair, TradingPairIndex};
pub use traits::{LedgerSequenceTracker, Stateful};

pub use tokio_util::sync::CancellationToken;
