use super::cart::CustomerId;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Geographic delivery region. Each region has a freight multiplier in the
/// pricing table.
#[derive(
    Debug, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy,
)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    Southeast,
    South,
    Northeast,
    CenterWest,
    North,
}

#[derive(
    Debug, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy,
)]
#[serde(rename_all = "lowercase")]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Customer {
    pub id: CustomerId,
    pub region: Region,
    pub tier: LoyaltyTier,
}

impl Customer {
    pub fn new(id: CustomerId, region: Region, tier: LoyaltyTier) -> Self {
        Self { id, region, tier }
    }
}
