//! Deadline-bounded path queries
//!
//! Searches are CPU bound, so they run on the blocking pool against one
//! committed snapshot. A deadline or Ctrl-C cancels the shared token and the
//! search returns [`SearchError::Cancelled`] at its next hop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use orderbook::{
    CancellationToken, FixedDestinationRequest, FixedSourceRequest, OrderBookGraph, Path,
    SearchError,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{log_search, log_timing};

/// One search against the current graph version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathQuery {
    FixedSource(FixedSourceRequest),
    FixedDestination(FixedDestinationRequest),
}

/// Query result as printed by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Ledger sequence of the snapshot the paths were computed on
    pub ledger_sequence: u32,
    pub paths: Vec<Path>,
    pub elapsed_ms: u64,
}

/// Run a query, cancelling it once `timeout` elapses
pub async fn run_query(
    graph: Arc<OrderBookGraph>,
    query: PathQuery,
    timeout: Duration,
) -> Result<QueryResponse, SearchError> {
    run_query_with_token(graph, query, timeout, CancellationToken::new()).await
}

/// Run a query with an externally owned token, e.g. one tied to shutdown
pub async fn run_query_with_token(
    graph: Arc<OrderBookGraph>,
    query: PathQuery,
    timeout: Duration,
    cancel: CancellationToken,
) -> Result<QueryResponse, SearchError> {
    let started = Instant::now();
    let snapshot = graph.snapshot();
    let token = cancel.clone();
    let mut search = tokio::task::spawn_blocking(move || match &query {
        PathQuery::FixedSource(request) => snapshot.find_fixed_paths(request, &token),
        PathQuery::FixedDestination(request) => snapshot.find_paths(request, &token),
    });

    let joined = tokio::select! {
        joined = &mut search => joined,
        _ = tokio::time::sleep(timeout) => {
            log_timing!("Search deadline of {:?} reached, cancelling", timeout);
            cancel.cancel();
            search.await
        }
    };

    // A panicking search is reported as cancelled; the graph itself is untouched
    let (paths, ledger_sequence) = joined.map_err(|e| {
        debug!("search task failed: {}", e);
        SearchError::Cancelled
    })??;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    log_search!(
        "Found {} path(s) on ledger {} in {}ms",
        paths.len(),
        ledger_sequence,
        elapsed_ms
    );
    Ok(QueryResponse {
        ledger_sequence,
        paths,
        elapsed_ms,
    })
}

/// Render a response as pretty JSON
pub fn to_json(response: &QueryResponse) -> Result<String> {
    serde_json::to_string_pretty(response).context("Failed to serialize query response")
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderbook::{apply_entries, SearchLimits};
    use types::{Asset, Offer, OfferId, Price};

    fn usd() -> Asset {
        Asset::credit("USD", "GISSUER").unwrap()
    }

    fn graph() -> Arc<OrderBookGraph> {
        let graph = OrderBookGraph::new();
        apply_entries(
            &graph,
            vec![Offer::new(OfferId::new(1), usd(), Asset::Native, 1_000, Price::new(1, 1))],
            vec![],
            9,
        )
        .unwrap();
        Arc::new(graph)
    }

    fn request() -> PathQuery {
        PathQuery::FixedSource(FixedSourceRequest {
            source_asset: Asset::Native,
            source_amount: 100,
            destination_assets: vec![usd()],
            limits: SearchLimits::new(4, 4, true),
        })
    }

    #[tokio::test]
    async fn test_query_completes_within_deadline() {
        let response = run_query(graph(), request(), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(response.ledger_sequence, 9);
        assert_eq!(response.paths.len(), 1);
        assert_eq!(response.paths[0].destination_amount, 100);
    }

    #[tokio::test]
    async fn test_pre_cancelled_token() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = run_query_with_token(graph(), request(), Duration::from_secs(5), cancel)
            .await
            .unwrap_err();
        assert_eq!(err, SearchError::Cancelled);
    }

    #[test]
    fn test_query_json_shape() {
        let json = serde_json::to_value(request()).unwrap();
        assert_eq!(json["kind"], "fixed_source");
        assert_eq!(json["source_asset"], "native");
    }
}
