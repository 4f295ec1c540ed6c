//! Exact rational prices and integer amounts
//!
//! A price is the amount of the buying asset paid per unit of the selling asset,
//! stored as a `numerator/denominator` pair of positive `u32`s. Comparison is done by
//! cross-multiplication in `u64`, which cannot overflow for `u32` operands, so two
//! prices that denote the same rational (1/2 and 2/4) compare equal.
//!
//! Conversions between the two sides of an offer run in `u128` and round in the
//! direction that favours the offer owner: costs round up, purchasable amounts round
//! down.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Amount in the smallest indivisible unit of an asset
pub type Amount = i64;

/// Largest amount that can be transferred in a single operation
pub const MAX_AMOUNT: Amount = i64::MAX;

/// Rational price of the selling asset in units of the buying asset
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Price {
    #[serde(rename = "n")]
    pub numerator: u32,
    #[serde(rename = "d")]
    pub denominator: u32,
}

impl Price {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Both components strictly positive
    pub fn is_valid(&self) -> bool {
        self.numerator > 0 && self.denominator > 0
    }

    /// Buying-asset cost of `amount` selling units, rounded up
    ///
    /// Returns `None` for negative input, an invalid price, or a result above
    /// [`MAX_AMOUNT`].
    pub fn mul_ceil(&self, amount: Amount) -> Option<Amount> {
        if amount < 0 || !self.is_valid() {
            return None;
        }
        let numer = amount as u128 * u128::from(self.numerator);
        let denom = u128::from(self.denominator);
        to_amount(numer.div_ceil(denom))
    }

    /// Selling units purchasable with `budget` buying units, rounded down
    pub fn div_floor(&self, budget: Amount) -> Option<Amount> {
        if budget < 0 || !self.is_valid() {
            return None;
        }
        let numer = budget as u128 * u128::from(self.denominator);
        to_amount(numer / u128::from(self.numerator))
    }
}

fn to_amount(value: u128) -> Option<Amount> {
    if value > MAX_AMOUNT as u128 {
        None
    } else {
        Some(value as Amount)
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Price {}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = u64::from(self.numerator) * u64::from(other.denominator);
        let rhs = u64::from(other.numerator) * u64::from(self.denominator);
        lhs.cmp(&rhs)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
