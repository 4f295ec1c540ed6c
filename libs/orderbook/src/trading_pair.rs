//! Trading-pair index
//!
//! Offers are indexed by the `(buying, selling)` pair a taker crosses: paying the
//! offer's buying asset and receiving its selling asset. Each pair holds the ids of
//! its offers sorted cheapest first. Books are shared `Arc` slices, so a new graph
//! version only re-allocates the books it touched.
//!
//! Pools are indexed by their canonical unordered asset pair.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use types::{Asset, Offer, OfferId, PoolId};

/// Directed key for offers: a taker pays `buying` and receives `selling`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TradingPair {
    pub buying: Asset,
    pub selling: Asset,
}

impl TradingPair {
    pub fn new(buying: Asset, selling: Asset) -> Self {
        Self { buying, selling }
    }

    /// Pair an offer is listed under
    pub fn of(offer: &Offer) -> Self {
        Self::new(offer.buying.clone(), offer.selling.clone())
    }

    /// Pair a taker converting `from` into `to` crosses
    pub fn for_hop(from: &Asset, to: &Asset) -> Self {
        Self::new(from.clone(), to.clone())
    }

    pub fn matches(&self, offer: &Offer) -> bool {
        self.buying == offer.buying && self.selling == offer.selling
    }
}

/// Unordered asset pair in canonical order
pub fn canonical_pair(a: &Asset, b: &Asset) -> (Asset, Asset) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

/// Book order: price ascending by exact cross-multiplication, then offer id
pub fn compare_offers(a: &Offer, b: &Offer) -> Ordering {
    a.price.cmp(&b.price).then_with(|| a.id.cmp(&b.id))
}

/// Per-pair offer books and the pool connecting each asset pair
#[derive(Debug, Clone, Default)]
pub struct TradingPairIndex {
    books: HashMap<TradingPair, Arc<[OfferId]>>,
    pools: HashMap<(Asset, Asset), PoolId>,
}

impl TradingPairIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer ids of a pair, cheapest first
    pub fn book(&self, pair: &TradingPair) -> &[OfferId] {
        self.books.get(pair).map(|ids| ids.as_ref()).unwrap_or(&[])
    }

    /// Replace a pair's book, sorting by [`compare_offers`]
    ///
    /// Ids missing from `offers` are dropped. An empty book removes the pair.
    pub fn set_book(
        &mut self,
        pair: TradingPair,
        mut ids: Vec<OfferId>,
        offers: &HashMap<OfferId, Offer>,
    ) {
        ids.retain(|id| offers.contains_key(id));
        ids.sort_unstable_by(|a, b| match (offers.get(a), offers.get(b)) {
            (Some(a), Some(b)) => compare_offers(a, b),
            _ => a.cmp(b),
        });
        ids.dedup();

        if ids.is_empty() {
            self.books.remove(&pair);
        } else {
            self.books.insert(pair, Arc::from(ids));
        }
    }

    pub fn pairs(&self) -> impl Iterator<Item = &TradingPair> {
        self.books.keys()
    }

    pub fn books(&self) -> impl Iterator<Item = (&TradingPair, &[OfferId])> {
        self.books.iter().map(|(pair, ids)| (pair, ids.as_ref()))
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Pool connecting two assets, in either order
    pub fn pool_for(&self, a: &Asset, b: &Asset) -> Option<PoolId> {
        self.pools.get(&canonical_pair(a, b)).copied()
    }

    pub fn set_pool(&mut self, a: &Asset, b: &Asset, id: PoolId) {
        self.pools.insert(canonical_pair(a, b), id);
    }

    pub fn remove_pool(&mut self, a: &Asset, b: &Asset) -> Option<PoolId> {
        self.pools.remove(&canonical_pair(a, b))
    }

    pub fn pool_pairs(&self) -> impl Iterator<Item = (&(Asset, Asset), &PoolId)> {
        self.pools.iter()
    }

    /// Shared book pointer, for checking copy-on-write sharing
    pub fn shared_book(&self, pair: &TradingPair) -> Option<Arc<[OfferId]>> {
        self.books.get(pair).cloned()
    }
}
