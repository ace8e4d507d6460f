//! CSV codecs for carts and stock levels.

pub mod cart_reader;
pub mod stock_reader;
