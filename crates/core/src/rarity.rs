//! Item rarity tiers.
//!
//! Rarity is a property of an item *instance* (an inventory line), not of
//! the catalog entry. The seven tiers are strictly ordered; matching for
//! dedup and buy-order fulfilment is always exact-tier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Ordered item rarity, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Heroic,
    Epic,
    Legendary,
    Artifact,
}

/// All tiers in ascending order.
pub const ALL_RARITIES: [Rarity; 7] = [
    Rarity::Common,
    Rarity::Uncommon,
    Rarity::Rare,
    Rarity::Heroic,
    Rarity::Epic,
    Rarity::Legendary,
    Rarity::Artifact,
];

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Heroic => "Heroic",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Artifact => "Artifact",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Common" => Ok(Rarity::Common),
            "Uncommon" => Ok(Rarity::Uncommon),
            "Rare" => Ok(Rarity::Rare),
            "Heroic" => Ok(Rarity::Heroic),
            "Epic" => Ok(Rarity::Epic),
            "Legendary" => Ok(Rarity::Legendary),
            "Artifact" => Ok(Rarity::Artifact),
            other => Err(CoreError::Validation(format!("unknown rarity: {other}"))),
        }
    }
}
