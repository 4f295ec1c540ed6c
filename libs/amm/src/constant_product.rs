//! Constant-product AMM math with exact integer calculations
//!
//! Deposit mode:
//!
//! ```text
//! after_fee = floor(amount_in * (10000 - fee_bps) / 10000)
//! out       = floor(reserve_out * after_fee / (reserve_in + after_fee))
//! ```
//!
//! Expectation mode inverts the deposit formula, rounds up, and re-verifies the
//! candidate against the deposit formula so the returned input is the minimal one
//! that yields at least the desired output.

use tracing::trace;
use types::{Amount, Asset, LiquidityPool, PoolBody, MAX_AMOUNT, MAX_FEE_BPS};

use crate::errors::AmmError;

/// Denominator of the basis-point fee
pub const BPS_DENOMINATOR: u128 = MAX_FEE_BPS as u128;

/// Re-verification steps allowed after inverting the deposit formula
const MAX_ROUNDING_ADJUSTMENTS: usize = 4;

/// Pool reserves oriented for a single trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolReserves {
    pub reserve_in: Amount,
    pub reserve_out: Amount,
    pub fee_bps: u32,
}

impl PoolReserves {
    pub fn new(reserve_in: Amount, reserve_out: Amount, fee_bps: u32) -> Self {
        Self {
            reserve_in,
            reserve_out,
            fee_bps,
        }
    }

    /// Orient a pool so that `asset_in` is the asset paid into it
    pub fn from_pool(pool: &LiquidityPool, asset_in: &Asset) -> Result<Self, AmmError> {
        match &pool.body {
            PoolBody::ConstantProduct(cp) => {
                if asset_in == &cp.asset_a {
                    Ok(Self::new(cp.reserve_a, cp.reserve_b, cp.fee_bps))
                } else if asset_in == &cp.asset_b {
                    Ok(Self::new(cp.reserve_b, cp.reserve_a, cp.fee_bps))
                } else {
                    Err(AmmError::AssetNotInPool)
                }
            }
        }
    }

    /// Reserves after paying `amount_in` and receiving `amount_out`
    pub fn after_trade(&self, amount_in: Amount, amount_out: Amount) -> Option<Self> {
        Some(Self {
            reserve_in: self.reserve_in.checked_add(amount_in)?,
            reserve_out: self.reserve_out.checked_sub(amount_out)?,
            fee_bps: self.fee_bps,
        })
    }
}

/// Constant-product math functions with zero precision loss
pub struct ConstantProductMath;

impl ConstantProductMath {
    /// Input remaining after the fee is taken, with the fee rounded up
    pub fn amount_after_fee(amount_in: Amount, fee_bps: u32) -> Result<u128, AmmError> {
        Self::validate_fee(fee_bps)?;
        if amount_in <= 0 {
            return Err(AmmError::InvalidAmount(amount_in));
        }
        let kept = BPS_DENOMINATOR - u128::from(fee_bps);
        // floor(amount * kept / D) == amount - ceil(amount * fee / D)
        Ok(amount_in as u128 * kept / BPS_DENOMINATOR)
    }

    /// Calculate the exact output paid by the pool for a deposit of `amount_in`
    ///
    /// # Arguments
    /// * `amount_in` - Amount deposited, in the input asset's smallest unit
    /// * `reserve_in` - Pool reserve of the input asset
    /// * `reserve_out` - Pool reserve of the output asset
    /// * `fee_bps` - Fee in basis points (30 = 0.3%)
    ///
    /// # Returns
    /// Output amount, rounded down. May be zero for dust deposits.
    pub fn calculate_output_amount(
        amount_in: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
        fee_bps: u32,
    ) -> Result<Amount, AmmError> {
        let after_fee = Self::amount_after_fee(amount_in, fee_bps)?;
        if reserve_in <= 0 || reserve_out <= 0 {
            return Err(AmmError::InsufficientLiquidity);
        }
        // The deposited amount must fit in the pool's reserve
        if reserve_in.checked_add(amount_in).is_none() {
            return Err(AmmError::Overflow);
        }

        let numerator = (reserve_out as u128)
            .checked_mul(after_fee)
            .ok_or(AmmError::Overflow)?;
        let denominator = (reserve_in as u128)
            .checked_add(after_fee)
            .ok_or(AmmError::Overflow)?;
        let out = numerator / denominator;

        if out >= reserve_out as u128 {
            return Err(AmmError::InsufficientLiquidity);
        }
        Ok(out as Amount)
    }

    /// Calculate the minimal input that makes the pool pay at least `amount_out`
    pub fn calculate_input_amount(
        amount_out: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
        fee_bps: u32,
    ) -> Result<Amount, AmmError> {
        Self::validate_fee(fee_bps)?;
        if amount_out <= 0 {
            return Err(AmmError::InvalidAmount(amount_out));
        }
        if reserve_in <= 0 || reserve_out <= 0 || amount_out >= reserve_out {
            return Err(AmmError::InsufficientLiquidity);
        }

        // Smallest post-fee input: ceil(reserve_in * amount_out / (reserve_out - amount_out))
        let after_fee = (reserve_in as u128)
            .checked_mul(amount_out as u128)
            .ok_or(AmmError::Overflow)?
            .div_ceil((reserve_out - amount_out) as u128);

        // Smallest gross input whose post-fee remainder reaches it
        let kept = BPS_DENOMINATOR - u128::from(fee_bps);
        let gross = after_fee
            .checked_mul(BPS_DENOMINATOR)
            .ok_or(AmmError::Overflow)?
            .div_ceil(kept);
        if gross > MAX_AMOUNT as u128 {
            return Err(AmmError::Overflow);
        }

        let mut candidate = gross as Amount;
        for _ in 0..MAX_ROUNDING_ADJUSTMENTS {
            let out = Self::calculate_output_amount(candidate, reserve_in, reserve_out, fee_bps)?;
            if out >= amount_out {
                return Ok(candidate);
            }
            trace!(candidate, out, amount_out, "expectation candidate short, adjusting");
            candidate = candidate.checked_add(1).ok_or(AmmError::Overflow)?;
        }
        Err(AmmError::RoundingAdjustmentExhausted)
    }

    fn validate_fee(fee_bps: u32) -> Result<(), AmmError> {
        if fee_bps >= MAX_FEE_BPS {
            return Err(AmmError::InvalidFee(fee_bps));
        }
        Ok(())
    }
}

/// `after.reserve_in * after.reserve_out >= before.reserve_in * before.reserve_out`
pub fn constant_product_holds(before: &PoolReserves, after: &PoolReserves) -> bool {
    if after.reserve_in < 0 || after.reserve_out < 0 {
        return false;
    }
    let k_before = before.reserve_in as u128 * before.reserve_out as u128;
    let k_after = after.reserve_in as u128 * after.reserve_out as u128;
    k_after >= k_before
}
