//! Path search benchmarks
//!
//! Multi-destination fixed-source and fixed-destination searches over a synthetic
//! market, with and without a liquidity pool on every trading pair.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use orderbook::{
    add_liquidity_pools, apply_entries, CancellationToken, FixedDestinationRequest,
    FixedSourceRequest, OrderBookGraph, SearchLimits,
};
use types::{Asset, Offer, OfferId, Price};

const ASSET_COUNT: usize = 40;
const OFFERS_PER_ASSET: usize = 60;

const SEED: u64 = 0x5eed;

fn assets() -> Vec<Asset> {
    let mut assets = vec![Asset::Native];
    for i in 1..ASSET_COUNT {
        assets.push(Asset::credit(&format!("A{:03}", i), "GBENCHISSUER").expect("valid asset"));
    }
    assets
}

fn market(with_pools: bool) -> (OrderBookGraph, Vec<Asset>) {
    let assets = assets();
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut offers = Vec::new();
    let mut id = 1i64;

    for selling in &assets {
        for _ in 0..OFFERS_PER_ASSET {
            let buying = &assets[rng.gen_range(0..assets.len())];
            if buying == selling {
                continue;
            }
            offers.push(Offer::new(
                OfferId::new(id),
                selling.clone(),
                buying.clone(),
                rng.gen_range(1..=1_000_000),
                Price::new(rng.gen_range(1..=100), rng.gen_range(1..=100)),
            ));
            id += 1;
        }
    }

    let graph = OrderBookGraph::new();
    apply_entries(&graph, offers, Vec::new(), 1).expect("valid synthetic offers");
    if with_pools {
        add_liquidity_pools(&graph, 10_000, 30, 2).expect("valid synthetic pools");
    }
    (graph, assets)
}

fn bench_fixed_source(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_fixed_paths");
    group.sample_size(20);

    for with_pools in [false, true] {
        let (graph, assets) = market(with_pools);
        let cancel = CancellationToken::new();
        let request = FixedSourceRequest {
            source_asset: assets[0].clone(),
            source_amount: 5_000,
            destination_assets: assets[1..].to_vec(),
            limits: SearchLimits::new(3, 3, with_pools),
        };
        let label = if with_pools { "offers_and_pools" } else { "offers_only" };

        group.bench_with_input(BenchmarkId::new("multi_destination", label), &request, |b, request| {
            b.iter(|| criterion::black_box(graph.find_fixed_paths(request, &cancel)))
        });
    }
    group.finish();
}

fn bench_fixed_destination(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_paths");
    group.sample_size(20);

    for with_pools in [false, true] {
        let (graph, assets) = market(with_pools);
        let cancel = CancellationToken::new();
        let request = FixedDestinationRequest {
            destination_asset: assets[0].clone(),
            destination_amount: 5_000,
            source_assets: assets[1..].to_vec(),
            limits: SearchLimits::new(3, 3, with_pools),
        };
        let label = if with_pools { "offers_and_pools" } else { "offers_only" };

        group.bench_with_input(BenchmarkId::new("multi_source", label), &request, |b, request| {
            b.iter(|| criterion::black_box(graph.find_paths(request, &cancel)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fixed_source, bench_fixed_destination);
criterion_main!(benches);
