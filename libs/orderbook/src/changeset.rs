//! Pending graph changes
//!
//! Changes are staged per entry id with last-write-wins semantics, so a
//! redelivered or superseded event never produces two changes for one entry.
//! Ordered maps keep commit order deterministic.

use std::collections::BTreeMap;

use types::{LiquidityPool, Offer, OfferId, PoolId};

/// Staged change to a single entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change<T> {
    Upsert(T),
    Remove,
}

#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    offers: BTreeMap<OfferId, Change<Offer>>,
    pools: BTreeMap<PoolId, Change<LiquidityPool>>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_offer(&mut self, offer: Offer) {
        self.offers.insert(offer.id, Change::Upsert(offer));
    }

    pub fn remove_offer(&mut self, id: OfferId) {
        self.offers.insert(id, Change::Remove);
    }

    pub fn upsert_pool(&mut self, pool: LiquidityPool) {
        self.pools.insert(pool.id, Change::Upsert(pool));
    }

    pub fn remove_pool(&mut self, id: PoolId) {
        self.pools.insert(id, Change::Remove);
    }

    pub fn offers(&self) -> impl Iterator<Item = (&OfferId, &Change<Offer>)> {
        self.offers.iter()
    }

    pub fn pools(&self) -> impl Iterator<Item = (&PoolId, &Change<LiquidityPool>)> {
        self.pools.iter()
    }

    /// Number of entries with a staged change
    pub fn len(&self) -> usize {
        self.offers.len() + self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty() && self.pools.is_empty()
    }

    pub fn clear(&mut self) {
        self.offers.clear();
        self.pools.clear();
    }
}
