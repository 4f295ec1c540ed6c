//! Ledger event replay from a JSON Lines file
//!
//! Each non-empty line holds one [`LedgerEntryChange`]. Lines that fail to parse
//! and entries the graph rejects as malformed are logged and skipped, so one bad
//! record never blocks a replay.

use std::path::Path;

use anyhow::{Context, Result};
use orderbook::{GraphError, LedgerEntryChange, OrderBookGraph, Stateful};
use tracing::debug;

use crate::log_warning;

/// Counters from one replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub ledgers_applied: usize,
    pub rejected_entries: usize,
    /// Ledger markers refused for being out of order; their staged changes are dropped
    pub skipped_ledgers: usize,
}

/// Parse every event in a JSONL file
pub fn load_events(path: &Path) -> Result<Vec<LedgerEntryChange>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read ledger events from {}", path.display()))?;
    Ok(parse_events(&content))
}

/// Parse events from JSONL text, skipping lines that are not valid changes
pub fn parse_events(content: &str) -> Vec<LedgerEntryChange> {
    let mut events = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match serde_json::from_str::<LedgerEntryChange>(line) {
            Ok(event) => events.push(event),
            Err(e) => log_warning!("Skipping line {}: {}", index + 1, e),
        }
    }
    events
}

/// Feed events into the graph through its [`Stateful`] interface
///
/// Changes after the last ledger marker stay staged; callers decide whether to
/// commit or discard them.
pub fn replay(graph: &mut OrderBookGraph, events: Vec<LedgerEntryChange>) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for event in events {
        summary.events += 1;
        let closes_ledger = matches!(event, LedgerEntryChange::LedgerClosed(_));
        match graph.apply_event(event) {
            Ok(()) if closes_ledger => summary.ledgers_applied += 1,
            Ok(()) => {}
            Err(GraphError::MalformedEntry(e)) => {
                log_warning!("Rejected malformed entry: {}", e);
                summary.rejected_entries += 1;
            }
            Err(GraphError::OutOfOrder { last, attempted }) => {
                log_warning!(
                    "Ledger {} arrived after {}, dropping its staged changes",
                    attempted, last
                );
                graph.discard();
                summary.skipped_ledgers += 1;
            }
            Err(e) => return Err(e).context("Graph rejected ledger event"),
        }
    }

    debug!(?summary, "replay finished");
    Ok(summary)
}
