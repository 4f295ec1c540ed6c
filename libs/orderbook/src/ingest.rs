//! Ledger ingestion adapter
//!
//! Translates ledger entry changes into graph staging calls. A
//! [`LedgerEntryChange::LedgerClosed`] marker commits everything staged since the
//! previous marker.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use types::{Amount, Asset, LiquidityPool, Offer, OfferId, PoolId};

use crate::errors::GraphError;
use crate::graph::{GraphCheckpoint, OrderBookGraph};
use crate::traits::Stateful;

/// One change from the ledger ingestion stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", content = "data", rename_all = "snake_case")]
pub enum LedgerEntryChange {
    OfferCreated(Offer),
    OfferUpdated(Offer),
    OfferRemoved(OfferId),
    PoolCreated(LiquidityPool),
    PoolUpdated(LiquidityPool),
    PoolRemoved(PoolId),
    /// Consistent batch boundary at this ledger sequence
    LedgerClosed(u32),
}

impl Stateful for OrderBookGraph {
    type Event = LedgerEntryChange;
    type Error = GraphError;

    fn apply_event(&mut self, event: Self::Event) -> Result<(), Self::Error> {
        match event {
            LedgerEntryChange::OfferCreated(offer) | LedgerEntryChange::OfferUpdated(offer) => {
                self.add_offer(offer)?
            }
            LedgerEntryChange::OfferRemoved(id) => self.remove_offer(id),
            LedgerEntryChange::PoolCreated(pool) | LedgerEntryChange::PoolUpdated(pool) => {
                self.add_pool(pool)?
            }
            LedgerEntryChange::PoolRemoved(id) => self.remove_pool(id),
            LedgerEntryChange::LedgerClosed(sequence) => {
                self.apply(sequence)?;
            }
        }
        Ok(())
    }

    fn checkpoint(&self) -> Result<Vec<u8>, Self::Error> {
        Ok(serde_json::to_vec(&self.to_checkpoint())?)
    }

    fn restore(&mut self, checkpoint: &[u8]) -> Result<(), Self::Error> {
        let checkpoint: GraphCheckpoint = serde_json::from_slice(checkpoint)?;
        self.load_checkpoint(checkpoint)?;
        Ok(())
    }
}

/// Stage a full dump of entries and commit it as one ledger
pub fn apply_entries(
    graph: &OrderBookGraph,
    offers: Vec<Offer>,
    pools: Vec<LiquidityPool>,
    ledger_sequence: u32,
) -> Result<u64, GraphError> {
    let (offer_count, pool_count) = (offers.len(), pools.len());
    graph.add_offers(offers)?;
    for pool in pools {
        graph.add_pool(pool)?;
    }
    let version = graph.apply(ledger_sequence)?;
    info!(
        offers = offer_count,
        pools = pool_count,
        ledger_sequence,
        "entry dump applied"
    );
    Ok(version)
}

/// Deterministic pool id for a synthetic pool on an asset pair
pub fn synthetic_pool_id(a: &Asset, b: &Asset) -> PoolId {
    let (a, b) = crate::trading_pair::canonical_pair(a, b);
    let key = format!("{}|{}", a, b);
    let mut bytes = [0u8; 32];
    // FNV-1a spread over four lanes
    for (lane, chunk) in bytes.chunks_mut(8).enumerate() {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325 ^ lane as u64;
        for byte in key.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        chunk.copy_from_slice(&hash.to_be_bytes());
    }
    PoolId::from(bytes)
}

/// Add a constant-product pool to every offer pair that has none, and commit
///
/// Used to build benchmark and demo graphs where every market also has AMM
/// liquidity.
pub fn add_liquidity_pools(
    graph: &OrderBookGraph,
    reserve: Amount,
    fee_bps: u32,
    ledger_sequence: u32,
) -> Result<usize, GraphError> {
    let snapshot = graph.snapshot();
    let mut pairs: Vec<(Asset, Asset)> = snapshot
        .index()
        .pairs()
        .filter(|pair| snapshot.index().pool_for(&pair.buying, &pair.selling).is_none())
        .map(|pair| crate::trading_pair::canonical_pair(&pair.buying, &pair.selling))
        .collect();
    pairs.sort();
    pairs.dedup();

    for (a, b) in &pairs {
        let id = synthetic_pool_id(a, b);
        graph.add_pool(LiquidityPool::constant_product(
            id,
            a.clone(),
            b.clone(),
            reserve,
            reserve,
            fee_bps,
        ))?;
    }
    graph.apply(ledger_sequence)?;
    debug!(added = pairs.len(), reserve, fee_bps, "synthetic pools added");
    Ok(pairs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::Price;

    fn usd() -> Asset {
        Asset::credit("USD", "GISSUER").unwrap()
    }

    #[test]
    fn test_events_commit_on_ledger_close() {
        let mut graph = OrderBookGraph::new();
        let offer = Offer::new(OfferId::new(1), Asset::Native, usd(), 100, Price::new(2, 1));

        graph
            .apply_event(LedgerEntryChange::OfferCreated(offer.clone()))
            .unwrap();
        assert!(graph.offers().is_empty());

        graph.apply_event(LedgerEntryChange::LedgerClosed(3)).unwrap();
        assert_eq!(graph.offers(), vec![offer]);

        graph
            .apply_event(LedgerEntryChange::OfferRemoved(OfferId::new(1)))
            .unwrap();
        graph.apply_event(LedgerEntryChange::LedgerClosed(4)).unwrap();
        assert!(graph.offers().is_empty());
        assert_eq!(graph.current_version(), 4);
    }

    #[test]
    fn test_repeated_ledger_close_rejected() {
        let mut graph = OrderBookGraph::new();
        graph.apply_event(LedgerEntryChange::LedgerClosed(3)).unwrap();
        let err = graph
            .apply_event(LedgerEntryChange::LedgerClosed(3))
            .unwrap_err();
        assert!(matches!(err, GraphError::OutOfOrder { .. }));
    }

    #[test]
    fn test_event_json_shape() {
        let json = r#"{"change":"offer_removed","data":42}"#;
        let change: LedgerEntryChange = serde_json::from_str(json).unwrap();
        assert_eq!(change, LedgerEntryChange::OfferRemoved(OfferId::new(42)));

        let json = r#"{"change":"ledger_closed","data":7}"#;
        let change: LedgerEntryChange = serde_json::from_str(json).unwrap();
        assert_eq!(change, LedgerEntryChange::LedgerClosed(7));
    }

    #[test]
    fn test_checkpoint_restore() {
        let mut graph = OrderBookGraph::new();
        apply_entries(
            &graph,
            vec![Offer::new(OfferId::new(1), Asset::Native, usd(), 100, Price::new(2, 1))],
            vec![],
            12,
        )
        .unwrap();

        let bytes = graph.checkpoint().unwrap();
        graph.clear();
        graph.restore(&bytes).unwrap();
        assert_eq!(graph.current_version(), 12);
        assert_eq!(graph.offers().len(), 1);
    }

    #[test]
    fn test_add_liquidity_pools_once_per_pair() {
        let graph = OrderBookGraph::new();
        apply_entries(
            &graph,
            vec![
                Offer::new(OfferId::new(1), Asset::Native, usd(), 100, Price::new(2, 1)),
                Offer::new(OfferId::new(2), usd(), Asset::Native, 100, Price::new(1, 2)),
            ],
            vec![],
            1,
        )
        .unwrap();

        assert_eq!(add_liquidity_pools(&graph, 10_000, 30, 2).unwrap(), 1);
        assert_eq!(graph.pools().len(), 1);
        assert_eq!(add_liquidity_pools(&graph, 10_000, 30, 3).unwrap(), 0);
        graph.verify().unwrap();
    }
}
