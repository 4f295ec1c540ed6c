//! Single-hop pricing against offer books and pools
//!
//! Every function here reads the snapshot only; consumed liquidity lives in the
//! returned [`Hop`].

use amm::{make_trade, TradeType};
use tracing::trace;
use types::{Amount, Asset};

use super::{Hop, OfferFill, Venue};
use crate::graph::GraphSnapshot;

/// Spend up to `amount_in` of `from` to receive `to`
///
/// Offers are taken whole, cheapest first, until the next one costs more than
/// what is left; that one is taken partially at the largest amount affordable.
/// Returns `None` when nothing positive can be received.
pub(crate) fn sell_exact(
    graph: &GraphSnapshot,
    from: &Asset,
    to: &Asset,
    amount_in: Amount,
    include_pools: bool,
) -> Option<Hop> {
    let via_offers = walk_book_selling(graph, from, to, amount_in);
    let via_pool = if include_pools {
        pool_deposit(graph, from, to, amount_in)
    } else {
        None
    };

    match (via_offers, via_pool) {
        (Some(offers), Some(pool)) if pool.amount_out > offers.amount_out => Some(pool),
        (Some(offers), _) => Some(offers),
        (None, pool) => pool,
    }
}

/// Pay as little `from` as possible to receive exactly `amount_out` of `to`
///
/// Returns `None` when neither venue can deliver the full amount.
pub(crate) fn buy_exact(
    graph: &GraphSnapshot,
    from: &Asset,
    to: &Asset,
    amount_out: Amount,
    include_pools: bool,
) -> Option<Hop> {
    let via_offers = walk_book_buying(graph, from, to, amount_out);
    let via_pool = if include_pools {
        pool_expectation(graph, from, to, amount_out)
    } else {
        None
    };

    match (via_offers, via_pool) {
        (Some(offers), Some(pool)) if pool.amount_in < offers.amount_in => Some(pool),
        (Some(offers), _) => Some(offers),
        (None, pool) => pool,
    }
}

fn walk_book_selling(graph: &GraphSnapshot, from: &Asset, to: &Asset, amount_in: Amount) -> Option<Hop> {
    let mut remaining = amount_in;
    let mut received: Amount = 0;
    let mut fills = Vec::new();

    for offer in graph.book(from, to) {
        if remaining == 0 {
            break;
        }
        let (sold, cost) = match offer.full_cost() {
            Some(cost) if cost <= remaining => (offer.amount, cost),
            _ => {
                let affordable = offer
                    .price
                    .div_floor(remaining)
                    .map_or(0, |units| units.min(offer.amount));
                match offer.price.mul_ceil(affordable) {
                    Some(cost) if affordable > 0 && cost <= remaining => (affordable, cost),
                    _ => break,
                }
            }
        };
        let Some(total) = received.checked_add(sold) else {
            break;
        };
        received = total;
        remaining -= cost;
        fills.push(OfferFill {
            offer_id: offer.id,
            amount_sold: sold,
            amount_bought: cost,
        });
        if sold < offer.amount {
            break;
        }
    }

    if received == 0 {
        return None;
    }
    Some(Hop {
        from: from.clone(),
        to: to.clone(),
        amount_in: amount_in - remaining,
        amount_out: received,
        venue: Venue::Offers { fills },
    })
}

fn walk_book_buying(graph: &GraphSnapshot, from: &Asset, to: &Asset, amount_out: Amount) -> Option<Hop> {
    let mut needed = amount_out;
    let mut cost: Amount = 0;
    let mut fills = Vec::new();

    for offer in graph.book(from, to) {
        let take = needed.min(offer.amount);
        let paid = offer.price.mul_ceil(take)?;
        cost = cost.checked_add(paid)?;
        needed -= take;
        fills.push(OfferFill {
            offer_id: offer.id,
            amount_sold: take,
            amount_bought: paid,
        });
        if needed == 0 {
            return Some(Hop {
                from: from.clone(),
                to: to.clone(),
                amount_in: cost,
                amount_out,
                venue: Venue::Offers { fills },
            });
        }
    }
    None
}

fn pool_deposit(graph: &GraphSnapshot, from: &Asset, to: &Asset, amount_in: Amount) -> Option<Hop> {
    let pool = graph.find_pool(from, to)?;
    match make_trade(pool, from, TradeType::Deposit, amount_in) {
        Ok(out) if out > 0 => Some(Hop {
            from: from.clone(),
            to: to.clone(),
            amount_in,
            amount_out: out,
            venue: Venue::Pool { pool_id: pool.id },
        }),
        Ok(_) => None,
        Err(err) => {
            trace!(pool = %pool.id.short(), %err, "pool deposit not traversable");
            None
        }
    }
}

fn pool_expectation(graph: &GraphSnapshot, from: &Asset, to: &Asset, amount_out: Amount) -> Option<Hop> {
    let pool = graph.find_pool(from, to)?;
    match make_trade(pool, from, TradeType::Expectation, amount_out) {
        Ok(required) => Some(Hop {
            from: from.clone(),
            to: to.clone(),
            amount_in: required,
            amount_out,
            venue: Venue::Pool { pool_id: pool.id },
        }),
        Err(err) => {
            trace!(pool = %pool.id.short(), %err, "pool expectation not traversable");
            None
        }
    }
}
