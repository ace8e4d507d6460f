use crate::domain::cart::{Cart, CartId, CustomerId, ProductId};
use crate::domain::checkout::TransactionId;
use crate::domain::customer::Customer;
use crate::domain::ports::{
    AvailabilityReport, CartLookup, CustomerLookup, DeductionReport, PaymentAuthorization,
    PaymentAuthorizationReply, PaymentCancellation, StockAvailability, StockDeduction,
};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory customer directory.
#[derive(Default, Clone)]
pub struct InMemoryCustomerDirectory {
    customers: Arc<RwLock<HashMap<CustomerId, Customer>>>,
}

impl InMemoryCustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn store(&self, customer: Customer) {
        let mut customers = self.customers.write().await;
        customers.insert(customer.id, customer);
    }
}

#[async_trait]
impl CustomerLookup for InMemoryCustomerDirectory {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>> {
        let customers = self.customers.read().await;
        Ok(customers.get(&id).cloned())
    }
}

/// A thread-safe in-memory cart repository.
///
/// Lookups only succeed for the customer that owns the cart.
#[derive(Default, Clone)]
pub struct InMemoryCartRepository {
    carts: Arc<RwLock<HashMap<CartId, Cart>>>,
}

impl InMemoryCartRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn store(&self, cart: Cart) {
        let mut carts = self.carts.write().await;
        carts.insert(cart.id, cart);
    }
}

#[async_trait]
impl CartLookup for InMemoryCartRepository {
    async fn find_for_customer(&self, cart_id: CartId, customer: &Customer) -> Result<Option<Cart>> {
        let carts = self.carts.read().await;
        Ok(carts
            .get(&cart_id)
            .filter(|cart| cart.owner == customer.id)
            .cloned())
    }
}

/// Stock levels per product, shared between availability checks and
/// deductions.
#[derive(Default, Clone)]
pub struct InMemoryWarehouse {
    levels: Arc<RwLock<HashMap<ProductId, i64>>>,
}

impl InMemoryWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_stock(&self, product: ProductId, quantity: i64) {
        let mut levels = self.levels.write().await;
        levels.insert(product, quantity);
    }

    pub async fn stock(&self, product: ProductId) -> i64 {
        let levels = self.levels.read().await;
        levels.get(&product).copied().unwrap_or(0)
    }
}

/// Sums requested quantities per product; a cart may list a product twice.
fn requested(products: &[ProductId], quantities: &[i64]) -> Result<BTreeMap<ProductId, i64>> {
    if products.len() != quantities.len() {
        return Err(CheckoutError::Collaborator(format!(
            "{} products but {} quantities",
            products.len(),
            quantities.len()
        )));
    }
    let mut totals = BTreeMap::new();
    for (product, quantity) in products.iter().zip(quantities) {
        *totals.entry(*product).or_insert(0) += quantity;
    }
    Ok(totals)
}

fn shortages(levels: &HashMap<ProductId, i64>, wanted: &BTreeMap<ProductId, i64>) -> Vec<ProductId> {
    wanted
        .iter()
        .filter(|(product, quantity)| levels.get(*product).copied().unwrap_or(0) < **quantity)
        .map(|(product, _)| *product)
        .collect()
}

#[async_trait]
impl StockAvailability for InMemoryWarehouse {
    async fn check_availability(
        &self,
        products: &[ProductId],
        quantities: &[i64],
    ) -> Result<AvailabilityReport> {
        let wanted = requested(products, quantities)?;
        let levels = self.levels.read().await;
        let missing = shortages(&levels, &wanted);
        if missing.is_empty() {
            Ok(AvailabilityReport::available())
        } else {
            Ok(AvailabilityReport::unavailable(missing))
        }
    }
}

#[async_trait]
impl StockDeduction for InMemoryWarehouse {
    /// Deducts every line or none of them.
    async fn deduct(&self, products: &[ProductId], quantities: &[i64]) -> Result<DeductionReport> {
        let wanted = requested(products, quantities)?;
        let mut levels = self.levels.write().await;
        if !shortages(&levels, &wanted).is_empty() {
            return Ok(DeductionReport { success: false });
        }
        for (product, quantity) in wanted {
            *levels.entry(product).or_insert(0) -= quantity;
        }
        Ok(DeductionReport { success: true })
    }
}

#[derive(Default)]
struct Ledger {
    next_id: TransactionId,
    authorized: HashMap<TransactionId, (CustomerId, Decimal)>,
    cancelled: Vec<TransactionId>,
}

/// A payment gateway that approves any amount up to an optional credit
/// limit and issues sequential transaction ids.
#[derive(Default, Clone)]
pub struct InMemoryPaymentGateway {
    credit_limit: Option<Decimal>,
    fail_cancellations: bool,
    ledger: Arc<RwLock<Ledger>>,
}

impl InMemoryPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credit_limit(mut self, limit: Decimal) -> Self {
        self.credit_limit = Some(limit);
        self
    }

    /// Makes every cancellation fail, to exercise the compensation path.
    pub fn with_failing_cancellations(mut self) -> Self {
        self.fail_cancellations = true;
        self
    }

    /// Open (authorized, not cancelled) transactions.
    pub async fn open_transactions(&self) -> Vec<(TransactionId, CustomerId, Decimal)> {
        let ledger = self.ledger.read().await;
        let mut open: Vec<_> = ledger
            .authorized
            .iter()
            .map(|(tx, (customer, amount))| (*tx, *customer, *amount))
            .collect();
        open.sort_by_key(|(tx, _, _)| *tx);
        open
    }

    pub async fn cancelled(&self) -> Vec<TransactionId> {
        self.ledger.read().await.cancelled.clone()
    }
}

#[async_trait]
impl PaymentAuthorization for InMemoryPaymentGateway {
    async fn authorize(
        &self,
        customer: CustomerId,
        amount: Decimal,
    ) -> Result<PaymentAuthorizationReply> {
        if self.credit_limit.is_some_and(|limit| amount > limit) {
            return Ok(PaymentAuthorizationReply::denied());
        }
        let mut ledger = self.ledger.write().await;
        ledger.next_id += 1;
        let tx = ledger.next_id;
        ledger.authorized.insert(tx, (customer, amount));
        Ok(PaymentAuthorizationReply::approved(tx))
    }
}

#[async_trait]
impl PaymentCancellation for InMemoryPaymentGateway {
    async fn cancel(&self, customer: CustomerId, transaction: TransactionId) -> Result<()> {
        if self.fail_cancellations {
            return Err(CheckoutError::Collaborator(format!(
                "payment gateway refused to cancel transaction {transaction}"
            )));
        }
        let mut ledger = self.ledger.write().await;
        let open = ledger
            .authorized
            .get(&transaction)
            .is_some_and(|(owner, _)| *owner == customer);
        if !open {
            return Err(CheckoutError::Collaborator(format!(
                "no open transaction {transaction} for customer {customer}"
            )));
        }
        ledger.authorized.remove(&transaction);
        ledger.cancelled.push(transaction);
        Ok(())
    }
}
