//! Liquidity pool entries
//!
//! Pools are tagged by body kind; the constant-product pool is the only kind the
//! ledger currently defines. Assets are held in canonical order (`asset_a < asset_b`)
//! so there is exactly one representation per unordered asset pair.

use serde::{Deserialize, Serialize};

use crate::common::asset::Asset;
use crate::common::errors::EntryError;
use crate::common::identifiers::PoolId;
use crate::common::price::Amount;

/// Fee denominator; a fee of `MAX_FEE_BPS` would keep the whole deposit
pub const MAX_FEE_BPS: u32 = 10_000;

/// Constant-product (x * y = k) pool parameters and reserves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantProductPool {
    pub asset_a: Asset,
    pub asset_b: Asset,
    pub reserve_a: Amount,
    pub reserve_b: Amount,
    pub fee_bps: u32,
    #[serde(default)]
    pub total_pool_shares: Amount,
}

/// Pool body, tagged by kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PoolBody {
    ConstantProduct(ConstantProductPool),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPool {
    pub id: PoolId,
    pub body: PoolBody,
    #[serde(default)]
    pub last_modified_ledger: u32,
}

impl LiquidityPool {
    /// Convenience constructor for a constant-product pool
    ///
    /// Assets may be passed in either order; they and their reserves are swapped
    /// into canonical order.
    pub fn constant_product(
        id: PoolId,
        asset_a: Asset,
        asset_b: Asset,
        reserve_a: Amount,
        reserve_b: Amount,
        fee_bps: u32,
    ) -> Self {
        let (asset_a, asset_b, reserve_a, reserve_b) = if asset_a <= asset_b {
            (asset_a, asset_b, reserve_a, reserve_b)
        } else {
            (asset_b, asset_a, reserve_b, reserve_a)
        };
        Self {
            id,
            body: PoolBody::ConstantProduct(ConstantProductPool {
                asset_a,
                asset_b,
                reserve_a,
                reserve_b,
                fee_bps,
                total_pool_shares: 0,
            }),
            last_modified_ledger: 0,
        }
    }

    /// The two assets held, in canonical order
    pub fn assets(&self) -> (&Asset, &Asset) {
        match &self.body {
            PoolBody::ConstantProduct(cp) => (&cp.asset_a, &cp.asset_b),
        }
    }

    pub fn contains(&self, asset: &Asset) -> bool {
        let (a, b) = self.assets();
        a == asset || b == asset
    }

    pub fn fee_bps(&self) -> u32 {
        match &self.body {
            PoolBody::ConstantProduct(cp) => cp.fee_bps,
        }
    }

    /// Reserve held of `asset`, `None` if the pool does not hold it
    pub fn reserve_of(&self, asset: &Asset) -> Option<Amount> {
        match &self.body {
            PoolBody::ConstantProduct(cp) if &cp.asset_a == asset => Some(cp.reserve_a),
            PoolBody::ConstantProduct(cp) if &cp.asset_b == asset => Some(cp.reserve_b),
            PoolBody::ConstantProduct(_) => None,
        }
    }

    pub fn validate(&self) -> Result<(), EntryError> {
        match &self.body {
            PoolBody::ConstantProduct(cp) => {
                if cp.asset_a >= cp.asset_b {
                    return Err(EntryError::NonCanonicalAssets { pool_id: self.id });
                }
                for reserve in [cp.reserve_a, cp.reserve_b] {
                    if reserve < 0 {
                        return Err(EntryError::NegativeReserve {
                            pool_id: self.id,
                            reserve,
                        });
                    }
                }
                if cp.fee_bps >= MAX_FEE_BPS {
                    return Err(EntryError::InvalidFee {
                        pool_id: self.id,
                        fee_bps: cp.fee_bps,
                        max: MAX_FEE_BPS,
                    });
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eur() -> Asset {
        Asset::credit("EUR", "GISSUER").unwrap()
    }

    #[test]
    fn test_constructor_canonicalizes_assets() {
        let pool = LiquidityPool::constant_product(PoolId::default(), eur(), Asset::Native, 10, 20, 30);
        let (a, b) = pool.assets();
        assert_eq!(a, &Asset::Native);
        assert_eq!(b, &eur());
        assert_eq!(pool.reserve_of(&Asset::Native), Some(20));
        assert_eq!(pool.reserve_of(&eur()), Some(10));
        assert!(pool.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_pools() {
        let mut pool = LiquidityPool::constant_product(PoolId::default(), Asset::Native, eur(), 10, 20, 10_000);
        assert!(matches!(pool.validate(), Err(EntryError::InvalidFee { fee_bps: 10_000, .. })));

        pool = LiquidityPool::constant_product(PoolId::default(), Asset::Native, eur(), -1, 20, 30);
        assert!(matches!(pool.validate(), Err(EntryError::NegativeReserve { reserve: -1, .. })));

        let same = LiquidityPool::constant_product(PoolId::default(), eur(), eur(), 1, 1, 30);
        assert!(matches!(same.validate(), Err(EntryError::NonCanonicalAssets { .. })));
    }

    #[test]
    fn test_body_is_tagged_in_json() {
        let pool = LiquidityPool::constant_product(PoolId::default(), Asset::Native, eur(), 1, 2, 30);
        let json = serde_json::to_value(&pool).unwrap();
        assert_eq!(json["body"]["type"], "constant_product");
        assert_eq!(json["body"]["asset_b"], "EUR:GISSUER");
    }
}
