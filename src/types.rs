//! Shared primitive quantities and small enums.

use serde::{Deserialize, Serialize};

/// Count of one resource in a bundle.
pub type Quantity = u8;
/// Value redeemed by a single exchange rate.
pub type RateValue = u8;
/// Accumulated value of a multi-leg trade.
pub type TradeValue = u32;
/// Injective integer encoding of a resource bundle.
pub type Fingerprint = u32;

/// The four resource kinds a hand is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Shells.
    Shells,
    /// Tools.
    Tools,
    /// Demons.
    Demons,
    /// Crystals.
    Crystals,
}

impl Resource {
    /// All resources in fingerprint order.
    pub const ALL: [Resource; 4] = [
        Resource::Shells,
        Resource::Tools,
        Resource::Demons,
        Resource::Crystals,
    ];
}

/// Runtime toggles that alter the effective rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    /// Boosts the three-shell rate.
    Shell,
    /// Adds a three-tool rate.
    Tool,
}
