use crate::application::pricing::PricingEngine;
use crate::domain::cart::{CartId, CustomerId};
use crate::domain::checkout::{CheckoutStage, CompensationOutcome, FinalizePurchaseResult};
use crate::domain::ports::{
    CartLookupBox, CustomerLookupBox, PaymentAuthorizationBox, PaymentCancellationBox,
    StockAvailabilityBox, StockDeductionBox,
};
use crate::error::{CheckoutError, Result};
use tracing::{debug, error, info, warn};

/// The external services a checkout talks to.
pub struct Collaborators {
    pub customers: CustomerLookupBox,
    pub carts: CartLookupBox,
    pub availability: StockAvailabilityBox,
    pub deduction: StockDeductionBox,
    pub authorization: PaymentAuthorizationBox,
    pub cancellation: PaymentCancellationBox,
}

/// Sequences a purchase across stock and payment services.
///
/// Each call is awaited before the next one starts and nothing is retried.
/// A failed stock deduction after an authorized payment triggers exactly one
/// compensating cancellation.
pub struct CheckoutOrchestrator {
    pricing: PricingEngine,
    collaborators: Collaborators,
}

impl CheckoutOrchestrator {
    pub fn new(pricing: PricingEngine, collaborators: Collaborators) -> Self {
        Self {
            pricing,
            collaborators,
        }
    }

    /// Finalizes the purchase of `cart_id` on behalf of `customer_id`.
    pub async fn finalize_purchase(
        &self,
        cart_id: CartId,
        customer_id: CustomerId,
    ) -> Result<FinalizePurchaseResult> {
        let c = &self.collaborators;
        let mut stage = CheckoutStage::Started;
        debug!(cart_id, customer_id, %stage, "Finalizing purchase");

        let customer = c
            .customers
            .find_by_id(customer_id)
            .await?
            .ok_or(CheckoutError::CustomerNotFound(customer_id))?;
        let cart = c
            .carts
            .find_for_customer(cart_id, &customer)
            .await?
            .ok_or(CheckoutError::CartNotFound {
                cart: cart_id,
                customer: customer_id,
            })?;

        let products = cart.product_ids();
        let quantities = cart.quantities();

        let availability = c
            .availability
            .check_availability(&products, &quantities)
            .await?;
        if !availability.available {
            warn!(
                cart_id,
                customer_id,
                unavailable = ?availability.unavailable_products,
                "Items out of stock"
            );
            return Err(CheckoutError::StockUnavailable {
                unavailable: availability.unavailable_products,
            });
        }
        stage = advance(stage, CheckoutStage::StockChecked, cart_id);

        let total = self
            .pricing
            .total_cost(Some(&cart), customer.region, customer.tier)?;
        stage = advance(stage, CheckoutStage::PriceComputed, cart_id);

        let payment = c
            .authorization
            .authorize(customer.id, total.value())
            .await?;
        if !payment.authorized {
            warn!(cart_id, customer_id, %total, "Payment not authorized");
            return Err(CheckoutError::PaymentDenied {
                customer: customer.id,
                amount: total.value(),
            });
        }
        let transaction = payment.transaction_id.ok_or_else(|| {
            CheckoutError::Collaborator("payment authorized without a transaction id".to_string())
        })?;
        stage = advance(stage, CheckoutStage::PaymentAuthorized, cart_id);

        let deduction = c.deduction.deduct(&products, &quantities).await?;
        if !deduction.success {
            warn!(
                cart_id,
                customer_id, transaction, "Stock deduction failed, cancelling payment"
            );
            let compensation = match c.cancellation.cancel(customer.id, transaction).await {
                Ok(()) => CompensationOutcome::Cancelled,
                Err(e) => {
                    error!(customer_id, transaction, error = %e, "Payment cancellation failed");
                    CompensationOutcome::Failed(e.to_string())
                }
            };
            return Err(CheckoutError::StockDeductionFailed {
                transaction,
                compensation,
            });
        }
        stage = advance(stage, CheckoutStage::StockDeducted, cart_id);

        advance(stage, CheckoutStage::Completed, cart_id);
        info!(cart_id, customer_id, transaction, %total, "Purchase completed");
        Ok(FinalizePurchaseResult::completed(transaction))
    }
}

fn advance(from: CheckoutStage, to: CheckoutStage, cart_id: CartId) -> CheckoutStage {
    debug_assert!(from < to);
    debug!(cart_id, %from, %to, "Checkout stage");
    to
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::{Cart, CartLine};
    use crate::domain::catalog::{Dimensions, Product, ProductCategory};
    use crate::domain::customer::{Customer, LoyaltyTier, Region};
    use crate::domain::money::{Money, Weight};
    use crate::infrastructure::in_memory::{
        InMemoryCartRepository, InMemoryCustomerDirectory, InMemoryPaymentGateway,
        InMemoryWarehouse,
    };
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    async fn setup(
        availability: InMemoryWarehouse,
        deduction: InMemoryWarehouse,
        gateway: InMemoryPaymentGateway,
    ) -> CheckoutOrchestrator {
        let customers = InMemoryCustomerDirectory::new();
        customers
            .store(Customer::new(1, Region::Southeast, LoyaltyTier::Bronze))
            .await;

        let carts = InMemoryCartRepository::new();
        let product = Product {
            id: 7,
            price: Money::new(dec!(40.00)),
            weight: Weight::kg(dec!(1.00)),
            dimensions: Dimensions::new(dec!(10), dec!(10), dec!(10)),
            fragile: false,
            category: ProductCategory::Food,
        };
        carts
            .store(Cart::new(
                1,
                1,
                vec![CartLine::new(product, 2)],
                NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
            ))
            .await;

        CheckoutOrchestrator::new(
            PricingEngine::default(),
            Collaborators {
                customers: Box::new(customers),
                carts: Box::new(carts),
                availability: Box::new(availability),
                deduction: Box::new(deduction),
                authorization: Box::new(gateway.clone()),
                cancellation: Box::new(gateway),
            },
        )
    }

    #[tokio::test]
    async fn test_purchase_deducts_stock_and_keeps_payment() {
        let warehouse = InMemoryWarehouse::new();
        warehouse.set_stock(7, 5).await;
        let gateway = InMemoryPaymentGateway::new();

        let orchestrator = setup(warehouse.clone(), warehouse.clone(), gateway.clone()).await;
        let result = orchestrator.finalize_purchase(1, 1).await.unwrap();

        assert_eq!(result.transaction_id, 1);
        assert_eq!(warehouse.stock(7).await, 3);
        assert_eq!(gateway.open_transactions().await, vec![(1, 1, dec!(80.00))]);
    }

    #[tokio::test]
    async fn test_credit_limit_denial_leaves_stock_untouched() {
        let warehouse = InMemoryWarehouse::new();
        warehouse.set_stock(7, 5).await;
        let gateway = InMemoryPaymentGateway::new().with_credit_limit(dec!(79.99));

        let orchestrator = setup(warehouse.clone(), warehouse.clone(), gateway.clone()).await;
        let err = orchestrator.finalize_purchase(1, 1).await.unwrap_err();

        assert!(matches!(err, CheckoutError::PaymentDenied { customer: 1, .. }));
        assert_eq!(warehouse.stock(7).await, 5);
        assert!(gateway.open_transactions().await.is_empty());
    }

    #[tokio::test]
    async fn test_lost_stock_between_check_and_deduction_refunds() {
        // Availability is answered by a stocked warehouse, deduction by an
        // empty one, as when a concurrent order drains the shelf.
        let stocked = InMemoryWarehouse::new();
        stocked.set_stock(7, 5).await;
        let drained = InMemoryWarehouse::new();
        let gateway = InMemoryPaymentGateway::new();

        let orchestrator = setup(stocked, drained, gateway.clone()).await;
        let err = orchestrator.finalize_purchase(1, 1).await.unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::StockDeductionFailed {
                transaction: 1,
                compensation: CompensationOutcome::Cancelled
            }
        ));
        assert_eq!(gateway.cancelled().await, vec![1]);
        assert!(gateway.open_transactions().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_refund_keeps_transaction_open() {
        let stocked = InMemoryWarehouse::new();
        stocked.set_stock(7, 5).await;
        let gateway = InMemoryPaymentGateway::new().with_failing_cancellations();

        let orchestrator = setup(stocked, InMemoryWarehouse::new(), gateway.clone()).await;
        let err = orchestrator.finalize_purchase(1, 1).await.unwrap_err();

        match err {
            CheckoutError::StockDeductionFailed {
                compensation: CompensationOutcome::Failed(reason),
                ..
            } => assert!(reason.contains("refused")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(gateway.open_transactions().await.len(), 1);
    }
}
