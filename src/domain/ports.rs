use super::cart::{Cart, CartId, CustomerId, ProductId};
use super::checkout::TransactionId;
use super::customer::Customer;
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reply of a stock availability check.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct AvailabilityReport {
    pub available: bool,
    pub unavailable_products: Vec<ProductId>,
}

impl AvailabilityReport {
    pub fn available() -> Self {
        Self {
            available: true,
            unavailable_products: Vec::new(),
        }
    }

    pub fn unavailable(products: Vec<ProductId>) -> Self {
        Self {
            available: false,
            unavailable_products: products,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
pub struct DeductionReport {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
pub struct PaymentAuthorizationReply {
    pub authorized: bool,
    pub transaction_id: Option<TransactionId>,
}

impl PaymentAuthorizationReply {
    pub fn approved(transaction_id: TransactionId) -> Self {
        Self {
            authorized: true,
            transaction_id: Some(transaction_id),
        }
    }

    pub fn denied() -> Self {
        Self {
            authorized: false,
            transaction_id: None,
        }
    }
}

#[async_trait]
pub trait CustomerLookup: Send + Sync {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>>;
}

#[async_trait]
pub trait CartLookup: Send + Sync {
    /// Returns the cart only if it exists and is owned by `customer`.
    async fn find_for_customer(&self, cart_id: CartId, customer: &Customer) -> Result<Option<Cart>>;
}

#[async_trait]
pub trait StockAvailability: Send + Sync {
    async fn check_availability(
        &self,
        products: &[ProductId],
        quantities: &[i64],
    ) -> Result<AvailabilityReport>;
}

#[async_trait]
pub trait StockDeduction: Send + Sync {
    async fn deduct(&self, products: &[ProductId], quantities: &[i64]) -> Result<DeductionReport>;
}

#[async_trait]
pub trait PaymentAuthorization: Send + Sync {
    async fn authorize(
        &self,
        customer: CustomerId,
        amount: Decimal,
    ) -> Result<PaymentAuthorizationReply>;
}

#[async_trait]
pub trait PaymentCancellation: Send + Sync {
    async fn cancel(&self, customer: CustomerId, transaction: TransactionId) -> Result<()>;
}

pub type CustomerLookupBox = Box<dyn CustomerLookup>;
pub type CartLookupBox = Box<dyn CartLookup>;
pub type StockAvailabilityBox = Box<dyn StockAvailability>;
pub type StockDeductionBox = Box<dyn StockDeduction>;
pub type PaymentAuthorizationBox = Box<dyn PaymentAuthorization>;
pub type PaymentCancellationBox = Box<dyn PaymentCancellation>;
