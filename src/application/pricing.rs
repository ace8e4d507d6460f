use crate::domain::cart::{Cart, CartLine};
use crate::domain::catalog::ProductCategory;
use crate::domain::customer::{LoyaltyTier, Region};
use crate::domain::money::{Money, Weight};
use crate::domain::pricing::{PricingTable, ThresholdRule};
use crate::error::{CheckoutError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Intermediate figures of a single price calculation.
///
/// Only `total` is rounded; every other figure keeps full precision.
#[derive(Debug, Serialize, PartialEq, Clone, Default)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub category_discount: Money,
    pub value_discount: Money,
    pub total_weight: Weight,
    pub base_freight: Money,
    pub fragile_surcharge: Money,
    pub freight: Money,
    pub total: Money,
}

impl PriceBreakdown {
    fn empty() -> Self {
        Self {
            total: Money::ZERO.rounded(),
            ..Self::default()
        }
    }
}

/// Computes the total cost of a cart.
///
/// `PricingEngine` is a pure calculator over an immutable [`PricingTable`]:
/// it performs no I/O and holds no mutable state, so one instance can be
/// shared between concurrent requests.
///
/// Two calculation profiles exist side by side:
///
/// * [`PricingEngine::total_cost`] is the full profile used at checkout
///   (category discounts, cubic weight, minimum freight fee, region and
///   loyalty tier).
/// * [`PricingEngine::simplified_total_cost`] is the legacy profile
///   (inclusive value thresholds, physical weight only, no minimum fee, no
///   region or tier).
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    table: PricingTable,
}

impl PricingEngine {
    pub fn new(table: PricingTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PricingTable {
        &self.table
    }

    /// Full-profile total, rounded half-up to two decimal places.
    ///
    /// An absent or empty cart costs `0.00`. Any line with a non-positive
    /// quantity or a negative price fails the whole calculation.
    pub fn total_cost(&self, cart: Option<&Cart>, region: Region, tier: LoyaltyTier) -> Result<Money> {
        Ok(self.quote(cart, region, tier)?.total)
    }

    /// Legacy-profile total, rounded half-up to two decimal places.
    pub fn simplified_total_cost(&self, cart: Option<&Cart>) -> Result<Money> {
        Ok(self.simplified_quote(cart)?.total)
    }

    /// Full-profile calculation returning every intermediate figure.
    pub fn quote(&self, cart: Option<&Cart>, region: Region, tier: LoyaltyTier) -> Result<PriceBreakdown> {
        let Some(lines) = non_empty_lines(cart) else {
            return Ok(PriceBreakdown::empty());
        };
        validate(lines)?;

        let subtotal = checked_sum(lines, Money::ZERO, Money::checked_add, line_total)?;
        let category_discount = self.category_discount(lines)?;
        let after_category = subtotal
            .checked_sub(category_discount)
            .ok_or(CheckoutError::AmountOverflow("category discount"))?;
        let value_discount = after_category
            .checked_mul(
                self.table
                    .value_discount_rate(after_category, ThresholdRule::Exclusive),
            )
            .ok_or(CheckoutError::AmountOverflow("value discount"))?;
        let discounted = after_category
            .checked_sub(value_discount)
            .ok_or(CheckoutError::AmountOverflow("value discount"))?;

        let total_weight = checked_sum(lines, Weight::ZERO, Weight::checked_add, |line| {
            self.taxable_weight(line)?.checked_times(line.quantity)
        })?;
        let rate = self.table.freight_rate(total_weight);
        let base_freight = if rate > Decimal::ZERO {
            total_weight
                .value()
                .checked_mul(rate)
                .and_then(|freight| Money::new(freight).checked_add(self.table.minimum_freight_fee))
                .ok_or(CheckoutError::AmountOverflow("base freight"))?
        } else {
            Money::ZERO
        };
        let fragile_surcharge = self.fragile_surcharge(lines)?;

        let freight = base_freight
            .checked_add(fragile_surcharge)
            .and_then(|freight| freight.checked_mul(self.table.region_multiplier(region)))
            .and_then(|freight| {
                freight.checked_mul(Decimal::ONE - self.table.tier_freight_discount(tier))
            })
            .ok_or(CheckoutError::AmountOverflow("freight"))?;
        let total = discounted
            .checked_add(freight)
            .ok_or(CheckoutError::AmountOverflow("total"))?;

        let breakdown = PriceBreakdown {
            subtotal,
            category_discount,
            value_discount,
            total_weight,
            base_freight,
            fragile_surcharge,
            freight,
            total: total.rounded(),
        };
        tracing::trace!(?region, ?tier, ?breakdown, "Priced cart");
        Ok(breakdown)
    }

    /// Legacy-profile calculation returning every intermediate figure.
    pub fn simplified_quote(&self, cart: Option<&Cart>) -> Result<PriceBreakdown> {
        let Some(lines) = non_empty_lines(cart) else {
            return Ok(PriceBreakdown::empty());
        };
        validate(lines)?;

        let subtotal = checked_sum(lines, Money::ZERO, Money::checked_add, line_total)?;
        let value_discount = subtotal
            .checked_mul(
                self.table
                    .value_discount_rate(subtotal, ThresholdRule::Inclusive),
            )
            .ok_or(CheckoutError::AmountOverflow("value discount"))?;

        let total_weight = checked_sum(lines, Weight::ZERO, Weight::checked_add, |line| {
            line.product.weight.checked_times(line.quantity)
        })?;
        let base_freight = total_weight
            .value()
            .checked_mul(self.table.freight_rate(total_weight))
            .map(Money::new)
            .ok_or(CheckoutError::AmountOverflow("base freight"))?;
        let fragile_surcharge = self.fragile_surcharge(lines)?;
        let freight = base_freight
            .checked_add(fragile_surcharge)
            .ok_or(CheckoutError::AmountOverflow("freight"))?;
        let total = subtotal
            .checked_sub(value_discount)
            .and_then(|discounted| discounted.checked_add(freight))
            .ok_or(CheckoutError::AmountOverflow("total"))?;

        let breakdown = PriceBreakdown {
            subtotal,
            category_discount: Money::ZERO,
            value_discount,
            total_weight,
            base_freight,
            fragile_surcharge,
            freight,
            total: total.rounded(),
        };
        tracing::trace!(?breakdown, "Priced cart (simplified)");
        Ok(breakdown)
    }

    /// Sum of the per-category quantity discounts.
    fn category_discount(&self, lines: &[CartLine]) -> Result<Money> {
        let mut per_category: BTreeMap<ProductCategory, (i64, Money)> = BTreeMap::new();
        for line in lines {
            let (quantity, subtotal) = per_category
                .entry(line.product.category)
                .or_insert((0, Money::ZERO));
            *quantity = quantity
                .checked_add(line.quantity)
                .ok_or_else(|| overflow(line))?;
            *subtotal = line_total(line)
                .and_then(|total| subtotal.checked_add(total))
                .ok_or_else(|| overflow(line))?;
        }

        per_category
            .into_iter()
            .try_fold(Money::ZERO, |acc, (category, (quantity, subtotal))| {
                subtotal
                    .checked_mul(self.table.category_discount_rate(category, quantity))
                    .and_then(|discount| acc.checked_add(discount))
            })
            .ok_or(CheckoutError::AmountOverflow("category discount"))
    }

    /// The greater of physical and cubic weight for one unit.
    fn taxable_weight(&self, line: &CartLine) -> Option<Weight> {
        let cubic = line
            .product
            .dimensions
            .cubic_weight(self.table.cubic_divisor)?;
        Some(line.product.weight.max(cubic))
    }

    fn fragile_surcharge(&self, lines: &[CartLine]) -> Result<Money> {
        let fragile = lines.iter().filter(|line| line.product.fragile);
        checked_sum(fragile, Money::ZERO, Money::checked_add, |line| {
            self.table.fragile_surcharge.checked_times(line.quantity)
        })
    }
}

fn non_empty_lines(cart: Option<&Cart>) -> Option<&[CartLine]> {
    cart.filter(|c| !c.is_empty()).map(|c| c.lines.as_slice())
}

fn line_total(line: &CartLine) -> Option<Money> {
    line.product.price.checked_times(line.quantity)
}

fn overflow(line: &CartLine) -> CheckoutError {
    CheckoutError::InvalidCartLine {
        product: line.product.id,
        reason: "amount overflow".to_string(),
    }
}

/// Adds up one figure per line. A line whose figure, or whose contribution
/// to the running total, leaves the decimal range is reported as invalid.
fn checked_sum<'a, T>(
    lines: impl IntoIterator<Item = &'a CartLine>,
    zero: T,
    add: impl Fn(T, T) -> Option<T>,
    figure: impl Fn(&CartLine) -> Option<T>,
) -> Result<T> {
    lines.into_iter().try_fold(zero, |acc, line| {
        figure(line)
            .and_then(|value| add(acc, value))
            .ok_or_else(|| overflow(line))
    })
}

fn validate(lines: &[CartLine]) -> Result<()> {
    for line in lines {
        if line.quantity <= 0 {
            return Err(CheckoutError::InvalidCartLine {
                product: line.product.id,
                reason: format!("quantity must be positive, got {}", line.quantity),
            });
        }
        if line.product.price.is_negative() {
            return Err(CheckoutError::InvalidCartLine {
                product: line.product.id,
                reason: format!("price must not be negative, got {}", line.product.price),
            });
        }
    }
    Ok(())
}
