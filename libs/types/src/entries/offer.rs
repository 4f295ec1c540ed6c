//! Standing exchange offers

use serde::{Deserialize, Serialize};

use crate::common::asset::Asset;
use crate::common::errors::EntryError;
use crate::common::identifiers::OfferId;
use crate::common::price::{Amount, Price};

/// A standing order selling `amount` of `selling` for `buying` at `price`
///
/// `price` is expressed in units of `buying` per unit of `selling`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    #[serde(default)]
    pub seller: String,
    pub selling: Asset,
    pub buying: Asset,
    pub amount: Amount,
    pub price: Price,
    #[serde(default)]
    pub last_modified_ledger: u32,
}

impl Offer {
    pub fn new(id: OfferId, selling: Asset, buying: Asset, amount: Amount, price: Price) -> Self {
        Self {
            id,
            seller: String::new(),
            selling,
            buying,
            amount,
            price,
            last_modified_ledger: 0,
        }
    }

    /// Reject offers that can never be live
    pub fn validate(&self) -> Result<(), EntryError> {
        if self.amount <= 0 {
            return Err(EntryError::NonPositiveAmount {
                offer_id: self.id,
                amount: self.amount,
            });
        }
        if !self.price.is_valid() {
            return Err(EntryError::InvalidPrice {
                offer_id: self.id,
                numerator: self.price.numerator,
                denominator: self.price.denominator,
            });
        }
        if self.selling == self.buying {
            return Err(EntryError::SameAssetOffer { offer_id: self.id });
        }
        Ok(())
    }

    /// Cost in the buying asset of taking the whole offer
    pub fn full_cost(&self) -> Option<Amount> {
        self.price.mul_ceil(self.amount)
    }
}
