//! Pool trait definitions for a unified AMM interface

use types::{Amount, Asset, LiquidityPool};

use crate::constant_product::{ConstantProductMath, PoolReserves};
use crate::errors::AmmError;

/// Direction of the fixed amount in a pool trade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeType {
    /// Fixed amount paid in, compute the amount received
    Deposit,
    /// Fixed amount received, compute the amount to pay in
    Expectation,
}

/// Unified pool interface for path evaluation
pub trait AmmPool {
    /// Calculate output amount for given input
    fn get_amount_out(&self, amount_in: Amount) -> Result<Amount, AmmError>;

    /// Calculate required input for desired output
    fn get_amount_in(&self, amount_out: Amount) -> Result<Amount, AmmError>;

    /// Get current reserves as (in, out)
    fn get_liquidity(&self) -> (Amount, Amount);

    /// Get fee tier
    fn get_fee_bps(&self) -> u32;
}

impl AmmPool for PoolReserves {
    fn get_amount_out(&self, amount_in: Amount) -> Result<Amount, AmmError> {
        ConstantProductMath::calculate_output_amount(
            amount_in,
            self.reserve_in,
            self.reserve_out,
            self.fee_bps,
        )
    }

    fn get_amount_in(&self, amount_out: Amount) -> Result<Amount, AmmError> {
        ConstantProductMath::calculate_input_amount(
            amount_out,
            self.reserve_in,
            self.reserve_out,
            self.fee_bps,
        )
    }

    fn get_liquidity(&self) -> (Amount, Amount) {
        (self.reserve_in, self.reserve_out)
    }

    fn get_fee_bps(&self) -> u32 {
        self.fee_bps
    }
}

/// Trade against `pool` paying in `asset_in`
///
/// For [`TradeType::Deposit`] `amount` is the amount of `asset_in` paid and the
/// result is the amount of the other asset received. For
/// [`TradeType::Expectation`] `amount` is the amount of the other asset wanted and
/// the result is the amount of `asset_in` required.
pub fn make_trade(
    pool: &LiquidityPool,
    asset_in: &Asset,
    trade_type: TradeType,
    amount: Amount,
) -> Result<Amount, AmmError> {
    let reserves = PoolReserves::from_pool(pool, asset_in)?;
    match trade_type {
        TradeType::Deposit => reserves.get_amount_out(amount),
        TradeType::Expectation => reserves.get_amount_in(amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::PoolId;

    fn eur_usd_pool() -> (LiquidityPool, Asset, Asset) {
        let eur = Asset::credit("EUR", "GISSUER").unwrap();
        let usd = Asset::credit("USD", "GISSUER").unwrap();
        let pool = LiquidityPool::constant_product(PoolId::default(), eur.clone(), usd.clone(), 1000, 1000, 30);
        (pool, eur, usd)
    }

    #[test]
    fn test_make_trade_both_modes() {
        let (pool, eur, _usd) = eur_usd_pool();

        let received = make_trade(&pool, &eur, TradeType::Deposit, 100).unwrap();
        assert_eq!(received, 90);

        let required = make_trade(&pool, &eur, TradeType::Expectation, received).unwrap();
        assert!(required <= 100);
        assert!(make_trade(&pool, &eur, TradeType::Deposit, required).unwrap() >= received);
    }

    #[test]
    fn test_make_trade_is_deterministic() {
        let (pool, _eur, usd) = eur_usd_pool();
        let first = make_trade(&pool, &usd, TradeType::Deposit, 12_345);
        let second = make_trade(&pool, &usd, TradeType::Deposit, 12_345);
        assert_eq!(first, second);
    }

    #[test]
    fn test_reserves_trait_accessors() {
        let reserves = PoolReserves::new(5, 7, 30);
        assert_eq!(reserves.get_liquidity(), (5, 7));
        assert_eq!(reserves.get_fee_bps(), 30);
    }
}
