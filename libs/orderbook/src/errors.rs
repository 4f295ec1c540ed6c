//! Error types for graph mutation and path search

use thiserror::Error;
use types::{Amount, EntryError};

/// Errors raised while staging or committing graph changes
#[derive(Debug, Error)]
pub enum GraphError {
    /// `apply` was called with a sequence not above the last applied one
    ///
    /// The pending changeset is kept. Callers should resynchronise from a fresh
    /// snapshot rather than retry with the same sequence.
    #[error("Ledger sequence out of order: last applied {last}, attempted {attempted}")]
    OutOfOrder { last: u32, attempted: u32 },

    #[error("Malformed entry rejected: {0}")]
    MalformedEntry(#[from] EntryError),

    #[error("Graph inconsistency: {reason}")]
    Inconsistent { reason: String },

    #[error("Checkpoint encoding failed: {0}")]
    Checkpoint(#[from] serde_json::Error),
}

/// Errors aborting a whole search request
///
/// An unreachable destination is not an error; it is simply missing from the
/// returned paths.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Search cancelled")]
    Cancelled,

    #[error("Search amount must be positive, got {0}")]
    InvalidAmount(Amount),

    #[error("Invalid search limits: {reason}")]
    InvalidLimits { reason: String },
}
