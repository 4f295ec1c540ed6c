//! Shared fixtures for order book integration tests

#![allow(dead_code)]

use orderbook::OrderBookGraph;
use types::{Amount, Asset, LiquidityPool, Offer, OfferId, PoolId, Price};

pub fn usd() -> Asset {
    Asset::credit("USD", "GISSUERUSD").unwrap()
}

pub fn eur() -> Asset {
    Asset::credit("EUR", "GISSUEREUR").unwrap()
}

pub fn chf() -> Asset {
    Asset::credit("CHF", "GISSUERCHF").unwrap()
}

pub fn native() -> Asset {
    Asset::Native
}

/// Offer selling `amount` of `selling` for `buying` at `n/d` buying per selling
pub fn offer(id: i64, selling: Asset, buying: Asset, amount: Amount, n: u32, d: u32) -> Offer {
    Offer::new(OfferId::new(id), selling, buying, amount, Price::new(n, d))
}

pub fn pool(byte: u8, a: Asset, b: Asset, reserve_a: Amount, reserve_b: Amount) -> LiquidityPool {
    LiquidityPool::constant_product(PoolId::from([byte; 32]), a, b, reserve_a, reserve_b, 30)
}

pub fn graph_with(offers: Vec<Offer>, pools: Vec<LiquidityPool>, ledger: u32) -> OrderBookGraph {
    let graph = OrderBookGraph::new();
    orderbook::apply_entries(&graph, offers, pools, ledger).unwrap();
    graph
}
