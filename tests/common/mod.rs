#![allow(dead_code)]

use checkout_engine::domain::cart::{Cart, CartLine};
use checkout_engine::domain::catalog::{Dimensions, Product, ProductCategory};
use checkout_engine::domain::money::{Money, Weight};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// A 10x10x10 electronics product; its cubic weight (0.17kg) never beats
/// the physical weights used in tests.
pub fn product(id: u64, price: Decimal, weight: Decimal, fragile: bool) -> Product {
    Product {
        id,
        price: Money::new(price),
        weight: Weight::kg(weight),
        dimensions: Dimensions::new(dec!(10), dec!(10), dec!(10)),
        fragile,
        category: ProductCategory::Electronics,
    }
}

/// A product whose dimensions give exactly `cubic` kg of volumetric weight.
pub fn bulky_product(id: u64, price: Decimal, weight: Decimal, cubic: Decimal) -> Product {
    Product {
        dimensions: Dimensions::new(dec!(100), dec!(100), cubic * dec!(6000) / dec!(10000)),
        ..product(id, price, weight, false)
    }
}

pub fn cart_of(id: u64, owner: u64, lines: Vec<CartLine>) -> Cart {
    Cart::new(id, owner, lines, NaiveDate::from_ymd_opt(2024, 5, 20).unwrap())
}

pub fn cart(lines: Vec<CartLine>) -> Cart {
    cart_of(1, 1, lines)
}

pub fn single(product: Product, quantity: i64) -> Cart {
    cart(vec![CartLine::new(product, quantity)])
}

pub const CART_HEADER: &str =
    "product, price, weight, length, width, height, fragile, category, quantity";
