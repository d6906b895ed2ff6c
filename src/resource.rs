//! Resource bundle value type, fingerprinting, and canonical hashing.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Fingerprint, Quantity, Resource};

/// Returned when a bundle cannot cover the cost being subtracted from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient resources: have {have}, need {need}")]
pub struct InsufficientResources {
    /// Bundle that was subtracted from.
    pub have: ResourceAlloc,
    /// Cost that exceeded it in at least one field.
    pub need: ResourceAlloc,
}

/// Immutable bundle of four resource quantities.
///
/// Serializes as `{"s":..,"t":..,"d":..,"c":..}` with zero fields omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResourceAlloc {
    /// Number of shells.
    #[serde(rename = "s", default, skip_serializing_if = "is_zero")]
    pub shells: Quantity,
    /// Number of tools.
    #[serde(rename = "t", default, skip_serializing_if = "is_zero")]
    pub tools: Quantity,
    /// Number of demons.
    #[serde(rename = "d", default, skip_serializing_if = "is_zero")]
    pub demons: Quantity,
    /// Number of crystals.
    #[serde(rename = "c", default, skip_serializing_if = "is_zero")]
    pub crystals: Quantity,
}

fn is_zero(q: &Quantity) -> bool {
    *q == 0
}

impl ResourceAlloc {
    /// The empty bundle.
    pub const EMPTY: ResourceAlloc = ResourceAlloc::new(0, 0, 0, 0);

    /// Builds a bundle from shells, tools, demons and crystals.
    pub const fn new(shells: Quantity, tools: Quantity, demons: Quantity, crystals: Quantity) -> Self {
        Self {
            shells,
            tools,
            demons,
            crystals,
        }
    }

    /// Bundle holding only `n` shells.
    pub const fn shells(n: Quantity) -> Self {
        Self::new(n, 0, 0, 0)
    }

    /// Bundle holding only `n` tools.
    pub const fn tools(n: Quantity) -> Self {
        Self::new(0, n, 0, 0)
    }

    /// Bundle holding only `n` demons.
    pub const fn demons(n: Quantity) -> Self {
        Self::new(0, 0, n, 0)
    }

    /// Bundle holding only `n` crystals.
    pub const fn crystals(n: Quantity) -> Self {
        Self::new(0, 0, 0, n)
    }

    /// Quantity of a single resource.
    pub fn get(&self, resource: Resource) -> Quantity {
        match resource {
            Resource::Shells => self.shells,
            Resource::Tools => self.tools,
            Resource::Demons => self.demons,
            Resource::Crystals => self.crystals,
        }
    }

    /// Sum of all four quantities.
    pub fn total(&self) -> u32 {
        u32::from(self.shells) + u32::from(self.tools) + u32::from(self.demons) + u32::from(self.crystals)
    }

    /// True when every quantity is zero.
    pub fn is_empty(&self) -> bool {
        self.shells == 0 && self.tools == 0 && self.demons == 0 && self.crystals == 0
    }

    /// True when every field of `self` is at least the matching field of `cost`.
    pub fn covers(&self, cost: &ResourceAlloc) -> bool {
        self.shells >= cost.shells
            && self.tools >= cost.tools
            && self.demons >= cost.demons
            && self.crystals >= cost.crystals
    }

    /// Removes `cost` from this bundle, or `None` if any field would underflow.
    ///
    /// This is the search hot path; [`Self::checked_sub`] is the same
    /// operation with a descriptive error.
    pub fn try_sub(&self, cost: &ResourceAlloc) -> Option<ResourceAlloc> {
        if !self.covers(cost) {
            return None;
        }

        Some(Self {
            shells: self.shells - cost.shells,
            tools: self.tools - cost.tools,
            demons: self.demons - cost.demons,
            crystals: self.crystals - cost.crystals,
        })
    }

    /// Removes `cost` from this bundle. The receiver is never modified.
    pub fn checked_sub(&self, cost: &ResourceAlloc) -> Result<ResourceAlloc, InsufficientResources> {
        self.try_sub(cost).ok_or(InsufficientResources {
            have: *self,
            need: *cost,
        })
    }

    /// Base-256 packing of the four quantities; injective over the full byte range.
    pub fn fingerprint(&self) -> Fingerprint {
        (u32::from(self.shells) << 24)
            | (u32::from(self.tools) << 16)
            | (u32::from(self.demons) << 8)
            | u32::from(self.crystals)
    }

    /// Inverse of [`Self::fingerprint`].
    pub fn from_fingerprint(fp: Fingerprint) -> Self {
        let [shells, tools, demons, crystals] = fp.to_be_bytes();
        Self::new(shells, tools, demons, crystals)
    }
}

impl fmt::Display for ResourceAlloc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "s:{} t:{} d:{} c:{}",
            self.shells, self.tools, self.demons, self.crystals
        )
    }
}

/// Order-insensitive text key for a multiset of bundles.
///
/// Elements are sorted by descending fingerprint and joined with `|`, so any
/// permutation of the same legs produces the same key.
pub fn canonical_hash(legs: &[ResourceAlloc]) -> String {
    let mut sorted = legs.to_vec();
    sorted.sort_unstable_by_key(|leg| std::cmp::Reverse(leg.fingerprint()));

    let mut out = String::with_capacity(sorted.len() * 20);
    for (i, leg) in sorted.iter().enumerate() {
        if i > 0 {
            out.push('|');
        }
        out.push_str(&leg.to_string());
    }
    out
}
