//! # Pathfinder Service
//!
//! ## Purpose
//!
//! Command-line front end for the order book graph: replays a ledger event
//! stream into an [`OrderBookGraph`](orderbook::OrderBookGraph) and answers
//! fixed-source and fixed-destination path queries against the committed
//! version, printing JSON results.
//!
//! ## Integration Points
//!
//! - **Input**: JSON Lines file of `LedgerEntryChange` events ([`event_loader`])
//! - **Configuration**: `pathfinder.toml` plus `PATHFINDER_*` overrides via the
//!   `config` crate
//! - **Output**: [`QueryResponse`](query::QueryResponse) JSON on stdout, logs on stderr

pub mod event_loader;
pub mod logging;
pub mod query;

pub use event_loader::{load_events, parse_events, replay, ReplaySummary};
pub use query::{run_query, run_query_with_token, PathQuery, QueryResponse};
