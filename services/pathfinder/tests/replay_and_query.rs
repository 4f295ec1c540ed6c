//! End-to-end: JSONL replay into a graph, then deadline-bounded queries

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use orderbook::{FixedDestinationRequest, FixedSourceRequest, OrderBookGraph, SearchLimits, Venue};
use pathfinder::{load_events, replay, run_query, PathQuery};
use tempfile::NamedTempFile;
use types::Asset;

const EVENTS: &str = r#"
{"change":"offer_created","data":{"id":1,"selling":"EUR:GISSUER","buying":"native","amount":500,"price":{"n":1,"d":1}}}
{"change":"offer_created","data":{"id":2,"selling":"USD:GISSUER","buying":"EUR:GISSUER","amount":500,"price":{"n":1,"d":2}}}
{"change":"ledger_closed","data":40}
{"change":"offer_updated","data":{"id":1,"selling":"EUR:GISSUER","buying":"native","amount":300,"price":{"n":1,"d":1}}}
{"change":"ledger_closed","data":41}
"#;

fn asset(s: &str) -> Asset {
    s.parse().unwrap()
}

fn replayed_graph() -> Arc<OrderBookGraph> {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", EVENTS).unwrap();

    let mut graph = OrderBookGraph::new();
    let summary = replay(&mut graph, load_events(file.path()).unwrap()).unwrap();
    assert_eq!(summary.ledgers_applied, 2);
    assert_eq!(graph.current_version(), 41);
    Arc::new(graph)
}

#[tokio::test]
async fn test_fixed_source_query_over_replayed_ledgers() {
    let query = PathQuery::FixedSource(FixedSourceRequest {
        source_asset: Asset::Native,
        source_amount: 100,
        destination_assets: vec![asset("USD:GISSUER")],
        limits: SearchLimits::new(3, 3, false),
    });

    let response = run_query(replayed_graph(), query, Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(response.ledger_sequence, 41);
    let path = &response.paths[0];
    assert_eq!(
        path.assets,
        vec![Asset::Native, asset("EUR:GISSUER"), asset("USD:GISSUER")]
    );
    // 100 native -> 100 EUR -> 200 USD at half a EUR each
    assert_eq!(path.destination_amount, 200);
    assert!(matches!(path.hops[0].venue, Venue::Offers { .. }));
}

#[tokio::test]
async fn test_fixed_destination_respects_updated_offer() {
    // Only 300 EUR remain after the update, so 250 USD (125 EUR) is reachable
    // but 700 USD (350 EUR) is not
    let graph = replayed_graph();
    let request = |amount| {
        PathQuery::FixedDestination(FixedDestinationRequest {
            destination_asset: asset("USD:GISSUER"),
            destination_amount: amount,
            source_assets: vec![Asset::Native],
            limits: SearchLimits::new(3, 3, false),
        })
    };

    let response = run_query(graph.clone(), request(250), Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(response.paths[0].source_amount, 125);

    let response = run_query(graph, request(700), Duration::from_secs(5))
        .await
        .unwrap();
    assert!(response.paths.is_empty());
}
