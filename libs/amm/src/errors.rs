//! Error types for pool trade calculations

use thiserror::Error;

/// Reasons a pool trade cannot be computed
///
/// Search treats every variant as "this pool edge is not traversable for this
/// request".
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AmmError {
    /// An intermediate or final value exceeds the representable or transferable range
    #[error("Pool trade overflows")]
    Overflow,

    /// The trade would drain a reserve to zero or below, or a reserve is empty
    #[error("Insufficient pool liquidity")]
    InsufficientLiquidity,

    #[error("Trade amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("Invalid pool fee: {0} bps")]
    InvalidFee(u32),

    #[error("Asset is not held by the pool")]
    AssetNotInPool,

    /// Re-verification of an expectation result did not converge
    #[error("Expectation rounding did not converge")]
    RoundingAdjustmentExhausted,
}
