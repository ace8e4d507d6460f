use super::cart::ProductId;
use super::money::{Money, Weight, round_half_up};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Electronics,
    Clothing,
    Food,
    Book,
    Furniture,
}

/// Package dimensions in centimetres.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy, Default)]
pub struct Dimensions {
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
}

impl Dimensions {
    pub fn new(length: Decimal, width: Decimal, height: Decimal) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// Volumetric weight, `length * width * height / divisor`, rounded half-up
    /// to two decimal places.
    ///
    /// `None` if the volume overflows or `divisor` is zero.
    pub fn cubic_weight(&self, divisor: Decimal) -> Option<Weight> {
        let volume = self
            .length
            .checked_mul(self.width)?
            .checked_mul(self.height)?;
        volume
            .checked_div(divisor)
            .map(|weight| Weight::kg(round_half_up(weight)))
    }
}

/// A catalog product as loaded for a single calculation.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Product {
    pub id: ProductId,
    pub price: Money,
    pub weight: Weight,
    pub dimensions: Dimensions,
    pub fragile: bool,
    pub category: ProductCategory,
}
