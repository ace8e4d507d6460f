use super::catalog::ProductCategory;
use super::customer::{LoyaltyTier, Region};
use super::money::{Money, Weight};
use crate::error::{CheckoutError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Discount applied to a category once its summed quantity reaches
/// `min_quantity`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
pub struct QuantityDiscountTier {
    pub min_quantity: i64,
    pub rate: Decimal,
}

/// Discount applied to the whole order once it passes `threshold`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
pub struct ValueDiscountTier {
    pub threshold: Money,
    pub rate: Decimal,
}

/// A freight weight band. `up_to` is an inclusive upper bound; `None` is
/// the open-ended top band.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
pub struct FreightBand {
    pub up_to: Option<Weight>,
    pub rate_per_kg: Decimal,
}

/// How an order value is compared against a value-discount threshold.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ThresholdRule {
    /// The value must be strictly greater than the threshold.
    Exclusive,
    /// The value may equal the threshold.
    Inclusive,
}

impl ThresholdRule {
    fn passes(self, value: Money, threshold: Money) -> bool {
        match self {
            ThresholdRule::Exclusive => value > threshold,
            ThresholdRule::Inclusive => value >= threshold,
        }
    }
}

/// Immutable pricing figures owned by a `PricingEngine`.
///
/// Tier lists are expected in ascending order (`quantity tiers` by
/// `min_quantity`, `freight_bands` by `up_to`) and value tiers in
/// descending order of threshold. [`PricingTable::normalized`] restores that
/// order for tables loaded from configuration files.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PricingTable {
    pub category_discounts: BTreeMap<ProductCategory, Vec<QuantityDiscountTier>>,
    pub value_discounts: Vec<ValueDiscountTier>,
    pub freight_bands: Vec<FreightBand>,
    pub minimum_freight_fee: Money,
    pub fragile_surcharge: Money,
    pub cubic_divisor: Decimal,
    pub region_multipliers: BTreeMap<Region, Decimal>,
    pub tier_freight_discounts: BTreeMap<LoyaltyTier, Decimal>,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl PricingTable {
    /// The production price list.
    pub fn standard() -> Self {
        let quantity_tiers = vec![
            QuantityDiscountTier {
                min_quantity: 3,
                rate: dec!(0.05),
            },
            QuantityDiscountTier {
                min_quantity: 5,
                rate: dec!(0.10),
            },
            QuantityDiscountTier {
                min_quantity: 8,
                rate: dec!(0.15),
            },
        ];
        let category_discounts = [
            ProductCategory::Electronics,
            ProductCategory::Clothing,
            ProductCategory::Food,
            ProductCategory::Book,
            ProductCategory::Furniture,
        ]
        .into_iter()
        .map(|category| (category, quantity_tiers.clone()))
        .collect();

        Self {
            category_discounts,
            value_discounts: vec![
                ValueDiscountTier {
                    threshold: Money::new(dec!(1000.00)),
                    rate: dec!(0.20),
                },
                ValueDiscountTier {
                    threshold: Money::new(dec!(500.00)),
                    rate: dec!(0.10),
                },
            ],
            freight_bands: vec![
                FreightBand {
                    up_to: Some(Weight::kg(dec!(5.00))),
                    rate_per_kg: Decimal::ZERO,
                },
                FreightBand {
                    up_to: Some(Weight::kg(dec!(10.00))),
                    rate_per_kg: dec!(2.00),
                },
                FreightBand {
                    up_to: Some(Weight::kg(dec!(50.00))),
                    rate_per_kg: dec!(4.00),
                },
                FreightBand {
                    up_to: None,
                    rate_per_kg: dec!(7.00),
                },
            ],
            minimum_freight_fee: Money::new(dec!(12.00)),
            fragile_surcharge: Money::new(dec!(5.00)),
            cubic_divisor: dec!(6000),
            region_multipliers: BTreeMap::from([
                (Region::Southeast, dec!(1.00)),
                (Region::South, dec!(1.05)),
                (Region::Northeast, dec!(1.10)),
                (Region::CenterWest, dec!(1.20)),
                (Region::North, dec!(1.30)),
            ]),
            tier_freight_discounts: BTreeMap::from([
                (LoyaltyTier::Bronze, dec!(0.00)),
                (LoyaltyTier::Silver, dec!(0.50)),
                (LoyaltyTier::Gold, dec!(1.00)),
            ]),
        }
    }

    /// Sorts every tier list into the order the lookups rely on.
    pub fn normalized(mut self) -> Self {
        for tiers in self.category_discounts.values_mut() {
            tiers.sort_by_key(|tier| tier.min_quantity);
        }
        self.value_discounts
            .sort_by(|a, b| b.threshold.cmp(&a.threshold));
        // Open-ended band sorts last.
        self.freight_bands.sort_by(|a, b| match (a.up_to, b.up_to) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        self
    }

    /// Rejects figures the engine cannot price with: a non-positive cubic
    /// divisor, discount fractions outside `[0, 1]`, and negative rates,
    /// multipliers or fees.
    pub fn validate(&self) -> Result<()> {
        if self.cubic_divisor <= Decimal::ZERO {
            return Err(invalid(format!(
                "cubic divisor must be positive, got {}",
                self.cubic_divisor
            )));
        }

        let fractions = self
            .category_discounts
            .values()
            .flatten()
            .map(|tier| ("category discount", tier.rate))
            .chain(
                self.value_discounts
                    .iter()
                    .map(|tier| ("value discount", tier.rate)),
            )
            .chain(
                self.tier_freight_discounts
                    .values()
                    .map(|rate| ("tier freight discount", *rate)),
            );
        for (name, rate) in fractions {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(invalid(format!("{name} {rate} is outside [0, 1]")));
            }
        }

        let non_negative = self
            .freight_bands
            .iter()
            .map(|band| ("freight rate", band.rate_per_kg))
            .chain(
                self.region_multipliers
                    .values()
                    .map(|multiplier| ("region multiplier", *multiplier)),
            )
            .chain([
                ("minimum freight fee", self.minimum_freight_fee.value()),
                ("fragile surcharge", self.fragile_surcharge.value()),
            ]);
        for (name, value) in non_negative {
            if value < Decimal::ZERO {
                return Err(invalid(format!("{name} must not be negative, got {value}")));
            }
        }
        Ok(())
    }

    /// Discount rate for a category given the total quantity bought in it.
    pub fn category_discount_rate(&self, category: ProductCategory, quantity: i64) -> Decimal {
        self.category_discounts
            .get(&category)
            .and_then(|tiers| tiers.iter().rev().find(|t| quantity >= t.min_quantity))
            .map(|t| t.rate)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn value_discount_rate(&self, value: Money, rule: ThresholdRule) -> Decimal {
        self.value_discounts
            .iter()
            .find(|t| rule.passes(value, t.threshold))
            .map(|t| t.rate)
            .unwrap_or(Decimal::ZERO)
    }

    /// Per-kilogram freight rate for a total weight. Zero means exempt.
    pub fn freight_rate(&self, weight: Weight) -> Decimal {
        self.freight_bands
            .iter()
            .find(|band| band.up_to.is_none_or(|limit| weight <= limit))
            .map(|band| band.rate_per_kg)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn region_multiplier(&self, region: Region) -> Decimal {
        self.region_multipliers
            .get(&region)
            .copied()
            .unwrap_or(Decimal::ONE)
    }

    /// Fraction of the freight waived for a loyalty tier.
    pub fn tier_freight_discount(&self, tier: LoyaltyTier) -> Decimal {
        self.tier_freight_discounts
            .get(&tier)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

fn invalid(reason: String) -> CheckoutError {
    CheckoutError::InvalidPricingTable(reason)
}
