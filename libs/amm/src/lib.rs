//! # Pathfinder AMM Library - Exact Constant-Product Mathematics
//!
//! ## Purpose
//!
//! Pure functions computing constant-product (x * y = k) liquidity pool trades in
//! exact integer arithmetic. Two trade modes are supported:
//!
//! - **Deposit**: a fixed input amount, returning the output the pool pays out
//! - **Expectation**: a fixed desired output, returning the minimal input required
//!
//! ## Integration Points
//!
//! - **Input Sources**: Pool entries held by the order book graph
//! - **Output Destinations**: Path search hop evaluation (forward search uses deposit
//!   mode, backward search uses expectation mode)
//! - **Failure Handling**: [`AmmError`] marks a pool edge unusable for one request;
//!   it is never fatal to the graph
//!
//! ## Precision
//!
//! - Every product runs in `u128` with checked operations; `i64` amounts can never
//!   overflow a single multiplication, only chained ones are guarded
//! - The fee is rounded up and the payout rounded down, so rounding never moves value
//!   out of the pool
//! - Identical `(reserves, mode, amount)` inputs always give identical outputs

pub mod constant_product;
pub mod errors;
pub mod pool_traits;

pub use constant_product::{constant_product_holds, ConstantProductMath, PoolReserves, BPS_DENOMINATOR};
pub use errors::AmmError;
pub use pool_traits::{make_trade, AmmPool, TradeType};
