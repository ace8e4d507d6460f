use crate::domain::cart::{CartId, CustomerId, ProductId};
use crate::domain::checkout::{CompensationOutcome, TransactionId};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Invalid cart line for product {product}: {reason}")]
    InvalidCartLine { product: ProductId, reason: String },
    #[error("Customer {0} not found")]
    CustomerNotFound(CustomerId),
    #[error("Cart {cart} not found for customer {customer}")]
    CartNotFound { cart: CartId, customer: CustomerId },
    #[error("Items out of stock: {unavailable:?}")]
    StockUnavailable { unavailable: Vec<ProductId> },
    #[error("Payment of {amount} not authorized for customer {customer}")]
    PaymentDenied { customer: CustomerId, amount: Decimal },
    #[error("Stock deduction failed after payment {transaction} (compensation: {compensation})")]
    StockDeductionFailed {
        transaction: TransactionId,
        compensation: CompensationOutcome,
    },
    #[error("Amount overflow while computing {0}")]
    AmountOverflow(&'static str),
    #[error("Invalid pricing table: {0}")]
    InvalidPricingTable(String),
    #[error("Collaborator error: {0}")]
    Collaborator(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Config error: {0}")]
    ConfigError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
