//! Decomposition results produced by the engine.

use serde::{Deserialize, Serialize};

use crate::{
    resource::{ResourceAlloc, canonical_hash},
    types::TradeValue,
};

/// A hand decomposed into rate costs, with the total value redeemed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trade {
    legs: Vec<ResourceAlloc>,
    value: TradeValue,
}

impl Trade {
    pub(crate) fn single(cost: ResourceAlloc, value: TradeValue) -> Self {
        Self {
            legs: vec![cost],
            value,
        }
    }

    pub(crate) fn prepend(&self, cost: ResourceAlloc, value: TradeValue) -> Self {
        let mut legs = Vec::with_capacity(self.legs.len() + 1);
        legs.push(cost);
        legs.extend_from_slice(&self.legs);
        Self {
            legs,
            value: self.value + value,
        }
    }

    /// Legs in the order they were chosen.
    pub fn legs(&self) -> &[ResourceAlloc] {
        &self.legs
    }

    /// Sum of the values of the rates used.
    pub fn value(&self) -> TradeValue {
        self.value
    }

    /// Order-insensitive key of the leg multiset.
    pub fn canonical_hash(&self) -> String {
        canonical_hash(&self.legs)
    }

    /// Sum of all legs, i.e. the hand this trade decomposes.
    pub fn consumed(&self) -> ResourceAlloc {
        self.legs.iter().fold(ResourceAlloc::EMPTY, |acc, leg| {
            ResourceAlloc::new(
                acc.shells + leg.shells,
                acc.tools + leg.tools,
                acc.demons + leg.demons,
                acc.crystals + leg.crystals,
            )
        })
    }

    /// Serializable copy of this trade.
    pub fn export(&self) -> TradeExport {
        TradeExport {
            legs: self.legs.clone(),
            value: self.value,
        }
    }
}

/// Winning leg list plus value, in the shape handed to outer layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeExport {
    /// Legs of the trade.
    #[serde(rename = "r")]
    pub legs: Vec<ResourceAlloc>,
    /// Total value.
    #[serde(rename = "v")]
    pub value: TradeValue,
}

impl From<&Trade> for TradeExport {
    fn from(trade: &Trade) -> Self {
        trade.export()
    }
}
