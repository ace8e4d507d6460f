use crate::domain::cart::{Cart, CartId, CartLine, CustomerId, ProductId};
use crate::domain::catalog::{Dimensions, Product, ProductCategory};
use crate::domain::money::{Money, Weight};
use crate::error::{CheckoutError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One CSV row: a product and the quantity requested.
#[derive(Debug, Deserialize)]
struct CartLineRecord {
    product: ProductId,
    #[serde(with = "rust_decimal::serde::str")]
    price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    weight: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    length: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    width: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    height: Decimal,
    fragile: bool,
    category: ProductCategory,
    quantity: i64,
}

impl From<CartLineRecord> for CartLine {
    fn from(record: CartLineRecord) -> Self {
        CartLine::new(
            Product {
                id: record.product,
                price: Money::new(record.price),
                weight: Weight::kg(record.weight),
                dimensions: Dimensions::new(record.length, record.width, record.height),
                fragile: record.fragile,
                category: record.category,
            },
            record.quantity,
        )
    }
}

/// Reads cart lines from a CSV source.
///
/// Expected header: `product, price, weight, length, width, height, fragile,
/// category, quantity`. Whitespace around fields is trimmed.
pub struct CartReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CartReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes cart lines in file order.
    pub fn lines(self) -> impl Iterator<Item = Result<CartLine>> {
        self.reader
            .into_deserialize::<CartLineRecord>()
            .map(|result| result.map(CartLine::from).map_err(CheckoutError::from))
    }

    /// Reads every line into a cart. The first malformed row aborts.
    pub fn into_cart(self, id: CartId, owner: CustomerId, created_on: NaiveDate) -> Result<Cart> {
        let lines = self.lines().collect::<Result<Vec<_>>>()?;
        Ok(Cart::new(id, owner, lines, created_on))
    }
}
