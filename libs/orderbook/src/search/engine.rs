//! Explicit-stack depth-first exploration shared by both search directions

use std::collections::{HashMap, HashSet};

use tokio_util::sync::CancellationToken;
use tracing::debug;
use types::{Amount, Asset};

use super::hop::{buy_exact, sell_exact};
use super::{validate_amount, FixedDestinationRequest, FixedSourceRequest, Hop, Path, SearchLimits};
use crate::errors::SearchError;
use crate::graph::{GraphSnapshot, OrderBookGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Walk edges from the source; amounts are held amounts, larger is better
    Forward,
    /// Walk edges back from the destination; amounts are required amounts,
    /// smaller is better
    Backward,
}

impl Direction {
    fn is_better(self, candidate: Amount, incumbent: Amount) -> bool {
        match self {
            Direction::Forward => candidate > incumbent,
            Direction::Backward => candidate < incumbent,
        }
    }
}

/// Counters from one search call
#[derive(Debug, Clone, Copy, Default)]
struct SearchStats {
    hops_evaluated: usize,
    branches_pruned: usize,
    candidates_recorded: usize,
}

struct Frame {
    asset: Asset,
    amount: Amount,
    /// Hop that reached this frame, `None` at the root
    hop: Option<Hop>,
    next: Vec<Asset>,
    cursor: usize,
}

/// A prefix that reached an asset and was expanded
#[derive(Debug, Clone)]
struct Reached {
    amount: Amount,
    /// Assets on the prefix, sorted, including the reached asset
    assets: Vec<Asset>,
}

#[derive(Debug, Clone)]
struct Candidate {
    amount: Amount,
    /// Path order, source first
    assets: Vec<Asset>,
    hops: Vec<Hop>,
}

struct Explorer<'a> {
    graph: &'a GraphSnapshot,
    direction: Direction,
    include_pools: bool,
    max_hops: usize,
    targets: HashSet<Asset>,
    best: HashMap<Asset, Candidate>,
    /// Expanded prefixes per asset, used for dominance pruning
    seen: HashMap<Asset, Vec<Reached>>,
    stats: SearchStats,
}

impl<'a> Explorer<'a> {
    fn new(
        graph: &'a GraphSnapshot,
        direction: Direction,
        limits: &SearchLimits,
        targets: HashSet<Asset>,
    ) -> Self {
        Self {
            graph,
            direction,
            include_pools: limits.include_pools,
            max_hops: limits.max_hops(),
            targets,
            best: HashMap::new(),
            seen: HashMap::new(),
            stats: SearchStats::default(),
        }
    }

    fn adjacent(&self, asset: &Asset) -> Vec<Asset> {
        match self.direction {
            Direction::Forward => self.graph.neighbours(asset).cloned().collect(),
            Direction::Backward => self.graph.predecessors(asset).cloned().collect(),
        }
    }

    fn price_hop(&self, current: &Asset, next: &Asset, amount: Amount) -> Option<(Hop, Amount)> {
        match self.direction {
            Direction::Forward => {
                let hop = sell_exact(self.graph, current, next, amount, self.include_pools)?;
                let reached = hop.amount_out;
                Some((hop, reached))
            }
            Direction::Backward => {
                let hop = buy_exact(self.graph, next, current, amount, self.include_pools)?;
                let reached = hop.amount_in;
                Some((hop, reached))
            }
        }
    }

    fn explore(
        &mut self,
        start: &Asset,
        amount: Amount,
        cancel: &CancellationToken,
    ) -> Result<(), SearchError> {
        let mut stack = vec![Frame {
            asset: start.clone(),
            amount,
            hop: None,
            next: self.adjacent(start),
            cursor: 0,
        }];

        while let Some(top) = stack.last_mut() {
            if top.cursor >= top.next.len() {
                stack.pop();
                continue;
            }
            let next = top.next[top.cursor].clone();
            top.cursor += 1;
            let (current, held) = (top.asset.clone(), top.amount);

            if stack.iter().any(|frame| frame.asset == next) {
                continue;
            }
            if cancel.is_cancelled() {
                return Err(SearchError::Cancelled);
            }

            self.stats.hops_evaluated += 1;
            let Some((hop, reached)) = self.price_hop(&current, &next, held) else {
                continue;
            };

            let depth = stack.len();
            if self.targets.contains(&next) {
                self.consider(&stack, &next, reached, &hop);
            }
            if depth >= self.max_hops {
                continue;
            }
            let prefix = prefix_assets(&stack, &next);
            if self.dominated(&next, &prefix, reached) {
                self.stats.branches_pruned += 1;
                continue;
            }
            self.remember(&next, prefix, reached);

            let adjacent = self.adjacent(&next);
            stack.push(Frame {
                asset: next,
                amount: reached,
                hop: Some(hop),
                next: adjacent,
                cursor: 0,
            });
        }
        Ok(())
    }

    /// Another expanded prefix reached `asset` with a strictly better amount
    /// while using only assets this prefix also uses
    ///
    /// Every continuation open to this prefix is then open to that one too, with
    /// at least as many hops left, so this branch cannot produce a better path.
    fn dominated(&self, asset: &Asset, prefix: &[Asset], amount: Amount) -> bool {
        self.seen.get(asset).is_some_and(|reached| {
            reached.iter().any(|other| {
                self.direction.is_better(other.amount, amount) && is_subset(&other.assets, prefix)
            })
        })
    }

    fn remember(&mut self, asset: &Asset, prefix: Vec<Asset>, amount: Amount) {
        let direction = self.direction;
        let reached = self.seen.entry(asset.clone()).or_default();
        // Drop entries the new prefix dominates
        reached.retain(|other| {
            !(direction.is_better(amount, other.amount) && is_subset(&prefix, &other.assets))
        });
        reached.push(Reached {
            amount,
            assets: prefix,
        });
    }

    fn consider(&mut self, stack: &[Frame], target: &Asset, amount: Amount, hop: &Hop) {
        let mut assets: Vec<Asset> = stack.iter().map(|frame| frame.asset.clone()).collect();
        assets.push(target.clone());
        if self.direction == Direction::Backward {
            assets.reverse();
        }

        let hop_count = stack.len();
        let improves = match self.best.get(target) {
            None => true,
            Some(best) if best.amount != amount => self.direction.is_better(amount, best.amount),
            Some(best) if best.hops.len() != hop_count => hop_count < best.hops.len(),
            Some(best) => assets < best.assets,
        };
        if !improves {
            return;
        }

        let mut hops: Vec<Hop> = stack.iter().filter_map(|frame| frame.hop.clone()).collect();
        hops.push(hop.clone());
        if self.direction == Direction::Backward {
            hops.reverse();
        }

        self.stats.candidates_recorded += 1;
        self.best.insert(
            target.clone(),
            Candidate {
                amount,
                assets,
                hops,
            },
        );
    }
}

/// Sorted assets of the stack plus `next`
fn prefix_assets(stack: &[Frame], next: &Asset) -> Vec<Asset> {
    let mut assets: Vec<Asset> = stack.iter().map(|frame| frame.asset.clone()).collect();
    assets.push(next.clone());
    assets.sort();
    assets
}

/// Both slices sorted
fn is_subset(small: &[Asset], large: &[Asset]) -> bool {
    small.len() <= large.len() && small.iter().all(|asset| large.binary_search(asset).is_ok())
}

/// Requested assets in order, without duplicates or the starting asset
fn distinct_targets<'r>(requested: &'r [Asset], start: &Asset) -> Vec<&'r Asset> {
    let mut seen = HashSet::new();
    requested
        .iter()
        .filter(|asset| *asset != start && seen.insert(*asset))
        .collect()
}

impl GraphSnapshot {
    /// Best destination amount per destination asset for a fixed source amount
    ///
    /// Returns the paths in request order, skipping unreachable destinations, and
    /// the ledger sequence of this snapshot.
    pub fn find_fixed_paths(
        &self,
        request: &FixedSourceRequest,
        cancel: &CancellationToken,
    ) -> Result<(Vec<Path>, u32), SearchError> {
        validate_amount(request.source_amount)?;
        request.limits.validate()?;

        let order = distinct_targets(&request.destination_assets, &request.source_asset);
        let targets: HashSet<Asset> = order.iter().map(|asset| (*asset).clone()).collect();
        let mut explorer = Explorer::new(self, Direction::Forward, &request.limits, targets);
        if !order.is_empty() {
            explorer.explore(&request.source_asset, request.source_amount, cancel)?;
        }

        let paths: Vec<Path> = order
            .into_iter()
            .filter_map(|asset| explorer.best.remove(asset))
            .map(|candidate| Path {
                assets: candidate.assets,
                source_amount: request.source_amount,
                destination_amount: candidate.amount,
                hops: candidate.hops,
            })
            .collect();

        debug!(
            source = %request.source_asset,
            amount = request.source_amount,
            destinations = request.destination_assets.len(),
            found = paths.len(),
            hops_evaluated = explorer.stats.hops_evaluated,
            pruned = explorer.stats.branches_pruned,
            candidates = explorer.stats.candidates_recorded,
            ledger = self.ledger_sequence(),
            "fixed source search finished"
        );
        Ok((paths, self.ledger_sequence()))
    }

    /// Minimal source amount per source asset for a fixed destination amount
    pub fn find_paths(
        &self,
        request: &FixedDestinationRequest,
        cancel: &CancellationToken,
    ) -> Result<(Vec<Path>, u32), SearchError> {
        validate_amount(request.destination_amount)?;
        request.limits.validate()?;

        let order = distinct_targets(&request.source_assets, &request.destination_asset);
        let targets: HashSet<Asset> = order.iter().map(|asset| (*asset).clone()).collect();
        let mut explorer = Explorer::new(self, Direction::Backward, &request.limits, targets);
        if !order.is_empty() {
            explorer.explore(&request.destination_asset, request.destination_amount, cancel)?;
        }

        let paths: Vec<Path> = order
            .into_iter()
            .filter_map(|asset| explorer.best.remove(asset))
            .map(|candidate| Path {
                assets: candidate.assets,
                source_amount: candidate.amount,
                destination_amount: request.destination_amount,
                hops: candidate.hops,
            })
            .collect();

        debug!(
            destination = %request.destination_asset,
            amount = request.destination_amount,
            sources = request.source_assets.len(),
            found = paths.len(),
            hops_evaluated = explorer.stats.hops_evaluated,
            pruned = explorer.stats.branches_pruned,
            candidates = explorer.stats.candidates_recorded,
            ledger = self.ledger_sequence(),
            "fixed destination search finished"
        );
        Ok((paths, self.ledger_sequence()))
    }
}

impl OrderBookGraph {
    /// Forward search against the current committed version
    pub fn find_fixed_paths(
        &self,
        request: &FixedSourceRequest,
        cancel: &CancellationToken,
    ) -> Result<(Vec<Path>, u32), SearchError> {
        self.snapshot().find_fixed_paths(request, cancel)
    }

    /// Backward search against the current committed version
    pub fn find_paths(
        &self,
        request: &FixedDestinationRequest,
        cancel: &CancellationToken,
    ) -> Result<(Vec<Path>, u32), SearchError> {
        self.snapshot().find_paths(request, cancel)
    }
}
