//! Domain layer: entities, value objects, pricing configuration and the
//! collaborator ports the checkout depends on.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod customer;
pub mod money;
pub mod ports;
pub mod pricing;
