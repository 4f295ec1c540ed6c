//! Graph staging, commit ordering, and concurrent reader behaviour

mod common;

use std::sync::Arc;

use common::*;
use orderbook::{
    CancellationToken, FixedSourceRequest, GraphError, LedgerEntryChange, OrderBookGraph,
    SearchLimits, Stateful,
};
use types::{OfferId, PoolId};

#[test]
fn test_repeated_apply_is_rejected_and_state_unchanged() {
    let graph = graph_with(
        vec![offer(1, native(), usd(), 100, 2, 1)],
        vec![pool(1, usd(), eur(), 1000, 1000)],
        10,
    );
    let before = graph.snapshot();

    let err = graph.apply(10).unwrap_err();
    assert!(matches!(err, GraphError::OutOfOrder { last: 10, attempted: 10 }));

    let after = graph.snapshot();
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(graph.current_version(), 10);
    assert_eq!(graph.offers().len(), 1);
    assert_eq!(graph.pools().len(), 1);
}

#[test]
fn test_same_changes_twice_leave_graph_unchanged() {
    let graph = OrderBookGraph::new();
    let offers = vec![
        offer(1, native(), usd(), 100, 2, 1),
        offer(2, native(), usd(), 50, 3, 1),
    ];

    graph.add_offers(offers.clone()).unwrap();
    graph.apply(1).unwrap();
    let first = graph.offers();

    graph.add_offers(offers).unwrap();
    graph.apply(2).unwrap();
    assert_eq!(graph.offers(), first);
    assert_eq!(graph.find_offers(&usd(), &native()).len(), 2);
    graph.verify().unwrap();
}

#[test]
fn test_malformed_entries_rejected() {
    let graph = OrderBookGraph::new();
    assert!(matches!(
        graph.add_offer(offer(1, native(), usd(), 10, 0, 1)),
        Err(GraphError::MalformedEntry(_))
    ));
    assert!(matches!(
        graph.add_offer(offer(2, usd(), usd(), 10, 1, 1)),
        Err(GraphError::MalformedEntry(_))
    ));

    let mut bad_pool = pool(1, usd(), eur(), 1000, 1000);
    if let types::PoolBody::ConstantProduct(cp) = &mut bad_pool.body {
        cp.fee_bps = 10_000;
    }
    assert!(matches!(graph.add_pool(bad_pool), Err(GraphError::MalformedEntry(_))));
    assert_eq!(graph.pending_changes(), 0);
}

#[test]
fn test_find_offers_returns_copies_in_price_order() {
    let graph = graph_with(
        vec![
            offer(5, native(), usd(), 10, 3, 1),
            offer(4, native(), usd(), 10, 1, 1),
            offer(3, native(), usd(), 10, 2, 1),
            offer(2, native(), usd(), 10, 2, 1),
        ],
        vec![],
        1,
    );
    let ids: Vec<i64> = graph
        .find_offers(&usd(), &native())
        .iter()
        .map(|offer| offer.id.inner())
        .collect();
    assert_eq!(ids, vec![4, 2, 3, 5]);
    assert!(graph.find_offers(&native(), &usd()).is_empty());
}

#[test]
fn test_event_stream_resync_after_out_of_order() {
    let mut graph = OrderBookGraph::new();
    let events = vec![
        LedgerEntryChange::OfferCreated(offer(1, native(), usd(), 100, 2, 1)),
        LedgerEntryChange::PoolCreated(pool(3, usd(), eur(), 500, 500)),
        LedgerEntryChange::LedgerClosed(20),
        LedgerEntryChange::OfferUpdated(offer(1, native(), usd(), 60, 2, 1)),
        LedgerEntryChange::PoolRemoved(PoolId::from([3u8; 32])),
        LedgerEntryChange::LedgerClosed(21),
    ];
    for event in events {
        graph.apply_event(event).unwrap();
    }
    assert_eq!(graph.find_offers(&usd(), &native())[0].amount, 60);
    assert!(graph.pools().is_empty());

    graph
        .apply_event(LedgerEntryChange::OfferRemoved(OfferId::new(1)))
        .unwrap();
    assert!(graph
        .apply_event(LedgerEntryChange::LedgerClosed(19))
        .is_err());

    // Resynchronise from a fresh dump
    graph.clear();
    orderbook::apply_entries(&graph, vec![offer(7, eur(), usd(), 5, 1, 1)], vec![], 19).unwrap();
    assert_eq!(graph.offers().len(), 1);
    assert_eq!(graph.current_version(), 19);
}

#[test]
fn test_concurrent_readers_see_whole_versions() {
    let graph = OrderBookGraph::new();
    let request = FixedSourceRequest {
        source_asset: usd(),
        source_amount: 1_000,
        destination_assets: vec![native(), eur()],
        limits: SearchLimits::new(3, 3, true),
    };

    std::thread::scope(|scope| {
        scope.spawn(|| {
            for ledger in 1..=40u32 {
                let id = i64::from(ledger);
                graph
                    .add_offers(vec![
                        offer(id, native(), usd(), 100 + id, 2, 1),
                        offer(1_000 + id, eur(), usd(), 100, 1, 1),
                    ])
                    .unwrap();
                if ledger > 1 {
                    graph.remove_offer(OfferId::new(id - 1));
                }
                if ledger % 10 == 0 {
                    graph.add_pool(pool(ledger as u8, native(), eur(), 10_000, 10_000)).unwrap();
                    graph.remove_pool(PoolId::from([(ledger - 10) as u8; 32]));
                }
                graph.apply(ledger).unwrap();
            }
        });

        for _ in 0..4 {
            scope.spawn(|| {
                let cancel = CancellationToken::new();
                let mut last_version = 0;
                for _ in 0..50 {
                    let snapshot = graph.snapshot();
                    assert!(snapshot.version() >= last_version);
                    last_version = snapshot.version();
                    snapshot.verify().unwrap();

                    let (paths, ledger) = snapshot.find_fixed_paths(&request, &cancel).unwrap();
                    assert_eq!(ledger, snapshot.ledger_sequence());
                    // Searching the same snapshot again gives the same answer
                    let (again, _) = snapshot.find_fixed_paths(&request, &cancel).unwrap();
                    assert_eq!(paths, again);
                }
            });
        }
    });

    assert_eq!(graph.current_version(), 40);
    graph.verify().unwrap();
}
