use super::catalog::Product;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type ProductId = u64;
pub type CustomerId = u64;
pub type CartId = u64;

/// One product in a cart together with the requested quantity.
///
/// The quantity is signed so that malformed input survives loading and is
/// rejected by the pricing engine rather than by the parser.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CartLine {
    pub product: Product,
    pub quantity: i64,
}

impl CartLine {
    pub fn new(product: Product, quantity: i64) -> Self {
        Self { product, quantity }
    }
}

/// A shopping cart owned by a single customer.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Cart {
    pub id: CartId,
    pub owner: CustomerId,
    pub lines: Vec<CartLine>,
    pub created_on: NaiveDate,
}

impl Cart {
    pub fn new(id: CartId, owner: CustomerId, lines: Vec<CartLine>, created_on: NaiveDate) -> Self {
        Self {
            id,
            owner,
            lines,
            created_on,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Product ids in line order.
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.lines.iter().map(|line| line.product.id).collect()
    }

    /// Quantities in line order, parallel to [`Cart::product_ids`].
    pub fn quantities(&self) -> Vec<i64> {
        self.lines.iter().map(|line| line.quantity).collect()
    }
}
