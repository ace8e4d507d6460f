//! Application layer containing the checkout business logic.
//!
//! `PricingEngine` turns a cart into a total cost and `CheckoutOrchestrator`
//! sequences the stock and payment collaborators around it.

pub mod checkout;
pub mod pricing;
