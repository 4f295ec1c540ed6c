//! Order Book Graph
//!
//! Versioned aggregate holding every offer and pool plus the asset adjacency they
//! induce. Mutations are staged into a [`ChangeSet`] and committed by `apply` as a
//! new immutable [`GraphSnapshot`]. The new version is built on a working copy
//! outside any reader-visible lock; the commit itself is a pointer swap.
//!
//! Readers take an `Arc<GraphSnapshot>` and keep a consistent view for as long as
//! they hold it, regardless of later commits.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use types::{Asset, LiquidityPool, Offer, OfferId, PoolId};

use crate::changeset::{Change, ChangeSet};
use crate::errors::GraphError;
use crate::trading_pair::{compare_offers, TradingPair, TradingPairIndex};
use crate::traits::LedgerSequenceTracker;

type Adjacency = BTreeMap<Asset, BTreeSet<Asset>>;

/// One committed, immutable version of the graph
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    version: u64,
    ledger_sequence: u32,
    offers: HashMap<OfferId, Offer>,
    pools: HashMap<PoolId, LiquidityPool>,
    index: TradingPairIndex,
    /// asset -> assets reachable in one hop
    edges: Adjacency,
    /// asset -> assets that reach it in one hop
    reverse_edges: Adjacency,
}

impl GraphSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Commit counter, incremented on every successful apply
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Ledger sequence this version was applied at
    pub fn ledger_sequence(&self) -> u32 {
        self.ledger_sequence
    }

    pub fn offer(&self, id: OfferId) -> Option<&Offer> {
        self.offers.get(&id)
    }

    pub fn pool(&self, id: &PoolId) -> Option<&LiquidityPool> {
        self.pools.get(id)
    }

    pub fn offer_count(&self) -> usize {
        self.offers.len()
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    pub fn index(&self) -> &TradingPairIndex {
        &self.index
    }

    /// Offers selling `selling` for `buying`, cheapest first
    pub fn book(&self, buying: &Asset, selling: &Asset) -> impl Iterator<Item = &Offer> {
        self.index
            .book(&TradingPair::new(buying.clone(), selling.clone()))
            .iter()
            .filter_map(|id| self.offers.get(id))
    }

    /// Owned copy of a pair's offers, cheapest first
    pub fn find_offers(&self, buying: &Asset, selling: &Asset) -> Vec<Offer> {
        self.book(buying, selling).cloned().collect()
    }

    /// Pool connecting two assets, in either order
    pub fn find_pool(&self, a: &Asset, b: &Asset) -> Option<&LiquidityPool> {
        self.index.pool_for(a, b).and_then(|id| self.pools.get(&id))
    }

    /// All offers ordered by id
    pub fn offers(&self) -> Vec<&Offer> {
        let mut offers: Vec<&Offer> = self.offers.values().collect();
        offers.sort_by_key(|offer| offer.id);
        offers
    }

    /// All pools ordered by id
    pub fn pools(&self) -> Vec<&LiquidityPool> {
        let mut pools: Vec<&LiquidityPool> = self.pools.values().collect();
        pools.sort_by_key(|pool| pool.id);
        pools
    }

    /// Assets reachable from `asset` in one hop, ascending
    pub fn neighbours(&self, asset: &Asset) -> impl Iterator<Item = &Asset> {
        self.edges.get(asset).into_iter().flatten()
    }

    /// Assets that reach `asset` in one hop, ascending
    pub fn predecessors(&self, asset: &Asset) -> impl Iterator<Item = &Asset> {
        self.reverse_edges.get(asset).into_iter().flatten()
    }

    /// Build the next version from a changeset
    ///
    /// Pool removals run before pool upserts so a pool can be replaced by another
    /// id within one ledger. Only books and edges touched by the changeset are
    /// rebuilt; untouched books stay shared with `self`.
    pub(crate) fn with_changes(&self, changes: &ChangeSet, ledger_sequence: u32) -> Self {
        let mut next = self.clone();
        let mut touched_edges: BTreeSet<(Asset, Asset)> = BTreeSet::new();

        for (id, change) in changes.pools() {
            if let Change::Remove = change {
                next.detach_pool(id, &mut touched_edges);
            }
        }
        for (_, change) in changes.pools() {
            if let Change::Upsert(pool) = change {
                next.attach_pool(pool, &mut touched_edges);
            }
        }

        let mut touched_books: BTreeMap<TradingPair, Vec<OfferId>> = BTreeMap::new();
        for (id, change) in changes.offers() {
            if let Some(old) = next.offers.remove(id) {
                touched_books.entry(TradingPair::of(&old)).or_default();
            }
            if let Change::Upsert(offer) = change {
                touched_books
                    .entry(TradingPair::of(offer))
                    .or_default()
                    .push(offer.id);
                next.offers.insert(offer.id, offer.clone());
            }
        }

        for (pair, added) in touched_books {
            let mut ids: Vec<OfferId> = next
                .index
                .book(&pair)
                .iter()
                .copied()
                .filter(|id| next.offers.get(id).is_some_and(|offer| pair.matches(offer)))
                .collect();
            ids.extend(added);
            touched_edges.insert((pair.buying.clone(), pair.selling.clone()));
            next.index.set_book(pair, ids, &next.offers);
        }

        for (from, to) in &touched_edges {
            next.refresh_edge(from, to);
        }

        next.version = self.version + 1;
        next.ledger_sequence = ledger_sequence;
        next
    }

    fn detach_pool(&mut self, id: &PoolId, touched: &mut BTreeSet<(Asset, Asset)>) {
        let Some(pool) = self.pools.remove(id) else {
            debug!(pool = %id.short(), "removal of unknown pool ignored");
            return;
        };
        let (a, b) = pool.assets();
        if self.index.pool_for(a, b) == Some(*id) {
            self.index.remove_pool(a, b);
        }
        touched.insert((a.clone(), b.clone()));
        touched.insert((b.clone(), a.clone()));
    }

    fn attach_pool(&mut self, pool: &LiquidityPool, touched: &mut BTreeSet<(Asset, Asset)>) {
        let (a, b) = pool.assets();
        if let Some(existing) = self.index.pool_for(a, b) {
            if existing != pool.id {
                warn!(
                    pool = %pool.id.short(),
                    existing = %existing.short(),
                    pair = %format!("{}/{}", a, b),
                    "pair already has a pool, ignoring"
                );
                return;
            }
        }

        let moved = self
            .pools
            .get(&pool.id)
            .is_some_and(|old| old.assets() != pool.assets());
        if moved {
            self.detach_pool(&pool.id, touched);
        }

        self.index.set_pool(a, b, pool.id);
        self.pools.insert(pool.id, pool.clone());
        touched.insert((a.clone(), b.clone()));
        touched.insert((b.clone(), a.clone()));
    }

    fn is_linked(&self, from: &Asset, to: &Asset) -> bool {
        !self.index.book(&TradingPair::for_hop(from, to)).is_empty()
            || self.index.pool_for(from, to).is_some()
    }

    fn refresh_edge(&mut self, from: &Asset, to: &Asset) {
        if self.is_linked(from, to) {
            self.edges.entry(from.clone()).or_default().insert(to.clone());
            self.reverse_edges
                .entry(to.clone())
                .or_default()
                .insert(from.clone());
        } else {
            unlink(&mut self.edges, from, to);
            unlink(&mut self.reverse_edges, to, from);
        }
    }

    /// Recompute every cached structure from the offer and pool maps
    ///
    /// Reports the first difference found.
    pub fn verify(&self) -> Result<(), GraphError> {
        let mut indexed = 0usize;
        for (pair, ids) in self.index.books() {
            for id in ids {
                match self.offers.get(id) {
                    Some(offer) if pair.matches(offer) => {}
                    Some(_) => return inconsistent(format!("offer {} listed under wrong pair", id)),
                    None => return inconsistent(format!("book lists unknown offer {}", id)),
                }
            }
            for window in ids.windows(2) {
                if let (Some(a), Some(b)) = (self.offers.get(&window[0]), self.offers.get(&window[1])) {
                    if compare_offers(a, b) != std::cmp::Ordering::Less {
                        return inconsistent(format!(
                            "book {}/{} out of order at offers {} and {}",
                            pair.buying, pair.selling, a.id, b.id
                        ));
                    }
                }
            }
            indexed += ids.len();
        }
        if indexed != self.offers.len() {
            return inconsistent(format!(
                "{} offers stored but {} indexed",
                self.offers.len(),
                indexed
            ));
        }

        for pool in self.pools.values() {
            let (a, b) = pool.assets();
            if self.index.pool_for(a, b) != Some(pool.id) {
                return inconsistent(format!("pool {} not indexed", pool.id.short()));
            }
        }
        if self.index.pool_pairs().count() != self.pools.len() {
            return inconsistent("pool index has stale pairs".to_string());
        }

        let mut edges = Adjacency::new();
        let mut reverse_edges = Adjacency::new();
        let mut link = |from: &Asset, to: &Asset| {
            edges.entry(from.clone()).or_default().insert(to.clone());
            reverse_edges.entry(to.clone()).or_default().insert(from.clone());
        };
        for (pair, _) in self.index.books() {
            link(&pair.buying, &pair.selling);
        }
        for pool in self.pools.values() {
            let (a, b) = pool.assets();
            link(a, b);
            link(b, a);
        }
        if edges != self.edges {
            return inconsistent("adjacency differs from recomputed edges".to_string());
        }
        if reverse_edges != self.reverse_edges {
            return inconsistent("reverse adjacency differs from recomputed edges".to_string());
        }
        Ok(())
    }
}

fn unlink(adjacency: &mut Adjacency, from: &Asset, to: &Asset) {
    if let Some(targets) = adjacency.get_mut(from) {
        targets.remove(to);
        if targets.is_empty() {
            adjacency.remove(from);
        }
    }
}

fn inconsistent(reason: String) -> Result<(), GraphError> {
    Err(GraphError::Inconsistent { reason })
}

/// Serialized form of a committed version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphCheckpoint {
    pub ledger_sequence: u32,
    pub offers: Vec<Offer>,
    pub pools: Vec<LiquidityPool>,
}

#[derive(Debug, Default)]
struct WriterState {
    pending: ChangeSet,
    tracker: LedgerSequenceTracker,
}

/// Shared order book graph
///
/// All methods take `&self`; writers are serialized by an internal mutex and
/// never block readers beyond the commit pointer swap.
#[derive(Debug, Default)]
pub struct OrderBookGraph {
    committed: RwLock<Arc<GraphSnapshot>>,
    writer: Mutex<WriterState>,
}

impl OrderBookGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current committed version
    pub fn snapshot(&self) -> Arc<GraphSnapshot> {
        self.committed.read().clone()
    }

    /// Ledger sequence of the committed version
    pub fn current_version(&self) -> u32 {
        self.committed.read().ledger_sequence
    }

    pub fn add_offer(&self, offer: Offer) -> Result<(), GraphError> {
        offer.validate()?;
        self.writer.lock().pending.upsert_offer(offer);
        Ok(())
    }

    /// Stage several offers; a malformed entry rejects the whole call
    pub fn add_offers<I>(&self, offers: I) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = Offer>,
    {
        let offers: Vec<Offer> = offers.into_iter().collect();
        for offer in &offers {
            offer.validate()?;
        }
        let mut writer = self.writer.lock();
        for offer in offers {
            writer.pending.upsert_offer(offer);
        }
        Ok(())
    }

    pub fn remove_offer(&self, id: OfferId) {
        self.writer.lock().pending.remove_offer(id);
    }

    pub fn add_pool(&self, pool: LiquidityPool) -> Result<(), GraphError> {
        pool.validate()?;
        self.writer.lock().pending.upsert_pool(pool);
        Ok(())
    }

    pub fn remove_pool(&self, id: PoolId) {
        self.writer.lock().pending.remove_pool(id);
    }

    /// Number of entries with staged changes
    pub fn pending_changes(&self) -> usize {
        self.writer.lock().pending.len()
    }

    /// Commit the pending changeset as a new version
    ///
    /// Returns the new version counter. On [`GraphError::OutOfOrder`] nothing is
    /// committed and the changeset stays pending.
    pub fn apply(&self, ledger_sequence: u32) -> Result<u64, GraphError> {
        let mut writer = self.writer.lock();
        writer.tracker.check(ledger_sequence)?;

        let current = self.snapshot();
        let next = current.with_changes(&writer.pending, ledger_sequence);
        let version = next.version;
        let (offers, pools) = (next.offer_count(), next.pool_count());

        *self.committed.write() = Arc::new(next);
        writer.tracker.advance(ledger_sequence)?;

        debug!(
            ledger_sequence,
            version,
            changes = writer.pending.len(),
            offers,
            pools,
            "graph version committed"
        );
        writer.pending.clear();
        Ok(version)
    }

    /// Drop the pending changeset
    pub fn discard(&self) {
        let mut writer = self.writer.lock();
        if !writer.pending.is_empty() {
            debug!(changes = writer.pending.len(), "pending changes discarded");
        }
        writer.pending.clear();
    }

    /// Reset to an empty graph at version 0
    ///
    /// Used to resynchronise after an out-of-order ledger.
    pub fn clear(&self) {
        let mut writer = self.writer.lock();
        writer.pending.clear();
        writer.tracker.reset();
        *self.committed.write() = Arc::new(GraphSnapshot::empty());
        info!("order book graph cleared");
    }

    pub fn find_offers(&self, buying: &Asset, selling: &Asset) -> Vec<Offer> {
        self.snapshot().find_offers(buying, selling)
    }

    pub fn find_pool(&self, a: &Asset, b: &Asset) -> Option<LiquidityPool> {
        self.snapshot().find_pool(a, b).cloned()
    }

    /// All committed offers, ordered by id
    pub fn offers(&self) -> Vec<Offer> {
        self.snapshot().offers().into_iter().cloned().collect()
    }

    /// All committed pools, ordered by id
    pub fn pools(&self) -> Vec<LiquidityPool> {
        self.snapshot().pools().into_iter().cloned().collect()
    }

    pub fn verify(&self) -> Result<(), GraphError> {
        self.snapshot().verify()
    }

    /// Committed state as a checkpoint value
    pub fn to_checkpoint(&self) -> GraphCheckpoint {
        let snapshot = self.snapshot();
        GraphCheckpoint {
            ledger_sequence: snapshot.ledger_sequence(),
            offers: snapshot.offers().into_iter().cloned().collect(),
            pools: snapshot.pools().into_iter().cloned().collect(),
        }
    }

    /// Replace all state with a checkpoint, committed at its ledger sequence
    ///
    /// Entries are validated before the graph is touched. The restored version is
    /// built under the writer lock and published in one swap; pending changes and
    /// sequence history are dropped.
    pub fn load_checkpoint(&self, checkpoint: GraphCheckpoint) -> Result<u64, GraphError> {
        let mut changes = ChangeSet::new();
        for offer in checkpoint.offers {
            offer.validate()?;
            changes.upsert_offer(offer);
        }
        for pool in checkpoint.pools {
            pool.validate()?;
            changes.upsert_pool(pool);
        }

        let mut writer = self.writer.lock();
        let mut next = GraphSnapshot::empty().with_changes(&changes, checkpoint.ledger_sequence);
        next.version = self.committed.read().version + 1;
        let version = next.version;
        let (offers, pools) = (next.offer_count(), next.pool_count());

        *self.committed.write() = Arc::new(next);
        writer.pending.clear();
        writer.tracker.reset();
        writer.tracker.advance(checkpoint.ledger_sequence)?;

        info!(
            ledger_sequence = checkpoint.ledger_sequence,
            version, offers, pools, "checkpoint restored"
        );
        Ok(version)
    }
}
