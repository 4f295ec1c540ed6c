//! State Management Traits
//!
//! Core trait for components driven by ledger events, and ledger sequence
//! tracking for commit ordering.

use crate::errors::GraphError;

/// Core trait for stateful components that can apply events
pub trait Stateful {
    /// Event type this component can handle
    type Event;

    /// Error type for failed operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Apply an event to update the state
    fn apply_event(&mut self, event: Self::Event) -> Result<(), Self::Error>;

    /// Serialize the committed state
    fn checkpoint(&self) -> Result<Vec<u8>, Self::Error>;

    /// Replace the state with a checkpoint
    fn restore(&mut self, checkpoint: &[u8]) -> Result<(), Self::Error>;
}

/// Ledger sequence tracking for commit ordering
///
/// Sequences must strictly increase. Gaps are allowed since a consumer may start
/// from any ledger and skip empty ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerSequenceTracker {
    last_applied: Option<u32>,
}

impl LedgerSequenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the last successfully applied sequence
    pub fn last_sequence(&self) -> Option<u32> {
        self.last_applied
    }

    /// Check a sequence without recording it
    pub fn check(&self, sequence: u32) -> Result<(), GraphError> {
        match self.last_applied {
            Some(last) if sequence <= last => Err(GraphError::OutOfOrder {
                last,
                attempted: sequence,
            }),
            _ => Ok(()),
        }
    }

    /// Record a sequence after a successful commit
    pub fn advance(&mut self, sequence: u32) -> Result<(), GraphError> {
        self.check(sequence)?;
        self.last_applied = Some(sequence);
        Ok(())
    }

    /// Forget all history (used when the graph is cleared)
    pub fn reset(&mut self) {
        self.last_applied = None;
    }
}
