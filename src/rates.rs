//! Exchange rates, modifier flags, and the validated rate table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    resource::ResourceAlloc,
    types::{Modifier, RateValue},
};

/// Cost of the rate boosted by [`Modifier::Shell`].
pub const SHELL_MODIFIER_COST: ResourceAlloc = ResourceAlloc::shells(3);
/// Value of the three-shell rate while the shell modifier is enabled.
pub const SHELL_MODIFIER_VALUE: RateValue = 8;
/// Cost of the rate appended by [`Modifier::Tool`].
pub const TOOL_MODIFIER_COST: ResourceAlloc = ResourceAlloc::tools(3);
/// Value of the rate appended by [`Modifier::Tool`].
pub const TOOL_MODIFIER_VALUE: RateValue = 10;

/// Redeeming exactly `cost` yields `value` points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Resources consumed.
    #[serde(rename = "r")]
    pub cost: ResourceAlloc,
    /// Points redeemed.
    #[serde(rename = "v")]
    pub value: RateValue,
}

impl ExchangeRate {
    /// Builds a rate.
    pub const fn new(cost: ResourceAlloc, value: RateValue) -> Self {
        Self { cost, value }
    }
}

/// Invalid rate table configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateTableError {
    /// A rate with an empty cost would make the search non-terminating.
    #[error("rate at index {index} has an empty cost")]
    EmptyCost {
        /// Position of the offending rate in the base table.
        index: usize,
    },
}

/// Which modifiers are currently applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierSet {
    /// Three shells redeem for [`SHELL_MODIFIER_VALUE`].
    pub shell: bool,
    /// A three-tool rate is available.
    pub tool: bool,
}

impl ModifierSet {
    /// Whether `modifier` is enabled.
    pub fn is_enabled(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Shell => self.shell,
            Modifier::Tool => self.tool,
        }
    }

    /// Sets `modifier`, returning true if the flag changed.
    pub fn set(&mut self, modifier: Modifier, enable: bool) -> bool {
        let flag = match modifier {
            Modifier::Shell => &mut self.shell,
            Modifier::Tool => &mut self.tool,
        };
        if *flag == enable {
            return false;
        }
        *flag = enable;
        true
    }
}

const DEFAULT_RATES: [ExchangeRate; 11] = [
    ExchangeRate::new(ResourceAlloc::new(0, 0, 2, 2), 14),
    ExchangeRate::new(ResourceAlloc::new(1, 1, 1, 1), 12),
    ExchangeRate::new(ResourceAlloc::crystals(3), 11),
    ExchangeRate::new(ResourceAlloc::new(1, 1, 1, 0), 9),
    ExchangeRate::new(ResourceAlloc::new(0, 1, 2, 0), 9),
    ExchangeRate::new(ResourceAlloc::new(1, 2, 0, 0), 7),
    ExchangeRate::new(ResourceAlloc::shells(3), 5),
    ExchangeRate::new(ResourceAlloc::crystals(1), 2),
    ExchangeRate::new(ResourceAlloc::demons(1), 2),
    ExchangeRate::new(ResourceAlloc::tools(1), 2),
    ExchangeRate::new(ResourceAlloc::shells(1), 1),
];

/// The unmodified default rates, in search order.
pub fn default_rates() -> Vec<ExchangeRate> {
    DEFAULT_RATES.to_vec()
}

/// Derives the effective rate sequence from a base sequence and modifier set.
pub fn apply_modifiers(base: &[ExchangeRate], modifiers: ModifierSet) -> Vec<ExchangeRate> {
    let mut rates: Vec<ExchangeRate> = base
        .iter()
        .map(|rate| {
            if modifiers.shell && rate.cost == SHELL_MODIFIER_COST {
                ExchangeRate::new(rate.cost, SHELL_MODIFIER_VALUE)
            } else {
                *rate
            }
        })
        .collect();

    if modifiers.tool {
        rates.push(ExchangeRate::new(TOOL_MODIFIER_COST, TOOL_MODIFIER_VALUE));
    }

    rates
}

/// Validated base rates plus modifier flags.
///
/// The effective sequence is always `apply_modifiers(base, modifiers)`, so
/// toggling a modifier on and off restores the previous rates exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    base: Vec<ExchangeRate>,
    modifiers: ModifierSet,
    effective: Vec<ExchangeRate>,
}

impl Default for RateTable {
    fn default() -> Self {
        let base = default_rates();
        let effective = base.clone();
        Self {
            base,
            modifiers: ModifierSet::default(),
            effective,
        }
    }
}

impl RateTable {
    /// Validates `base` and builds a table with no modifiers applied.
    pub fn new(base: Vec<ExchangeRate>) -> Result<Self, RateTableError> {
        Self::with_modifiers(base, ModifierSet::default())
    }

    /// Validates `base` and builds a table with `modifiers` applied.
    pub fn with_modifiers(base: Vec<ExchangeRate>, modifiers: ModifierSet) -> Result<Self, RateTableError> {
        if let Some(index) = base.iter().position(|rate| rate.cost.is_empty()) {
            return Err(RateTableError::EmptyCost { index });
        }

        let effective = apply_modifiers(&base, modifiers);
        Ok(Self {
            base,
            modifiers,
            effective,
        })
    }

    /// Effective rates in search order.
    pub fn rates(&self) -> &[ExchangeRate] {
        &self.effective
    }

    /// Rates before modifiers.
    pub fn base(&self) -> &[ExchangeRate] {
        &self.base
    }

    /// Currently applied modifiers.
    pub fn modifiers(&self) -> ModifierSet {
        self.modifiers
    }

    /// Enables or disables `modifier`. Returns true only if the effective
    /// rates changed.
    ///
    /// The flag always records the requested state, even when the base table
    /// has nothing for the modifier to act on (e.g. no three-shell rate).
    pub fn set_modifier(&mut self, modifier: Modifier, enable: bool) -> bool {
        if !self.modifiers.set(modifier, enable) {
            return false;
        }
        let previous = std::mem::replace(&mut self.effective, apply_modifiers(&self.base, self.modifiers));
        self.effective != previous
    }

    /// Effective rates keyed by the JSON rendering of their cost.
    pub fn value_map(&self) -> serde_json::Result<BTreeMap<String, RateValue>> {
        let mut out = BTreeMap::new();
        for rate in &self.effective {
            out.insert(serde_json::to_string(&rate.cost)?, rate.value);
        }
        Ok(out)
    }

    /// [`Self::value_map`] as a JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.value_map()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_cost() {
        let base = vec![
            ExchangeRate::new(ResourceAlloc::shells(1), 1),
            ExchangeRate::new(ResourceAlloc::EMPTY, 4),
        ];
        assert_eq!(
            RateTable::new(base),
            Err(RateTableError::EmptyCost { index: 1 })
        );
    }

    #[test]
    fn shell_modifier_follows_cost_not_position() {
        let mut base = default_rates();
        base.reverse();
        let mut table = RateTable::new(base).unwrap();

        assert!(table.set_modifier(Modifier::Shell, true));
        let boosted: Vec<_> = table
            .rates()
            .iter()
            .filter(|r| r.cost == SHELL_MODIFIER_COST)
            .collect();
        assert_eq!(boosted.len(), 1);
        assert_eq!(boosted[0].value, SHELL_MODIFIER_VALUE);
        assert_eq!(table.rates().len(), 11);
    }

    #[test]
    fn shell_modifier_without_three_shell_rate_changes_nothing() {
        let base = vec![ExchangeRate::new(ResourceAlloc::shells(1), 1)];
        let mut table = RateTable::new(base.clone()).unwrap();

        assert!(!table.set_modifier(Modifier::Shell, true));
        assert!(table.modifiers().is_enabled(Modifier::Shell));
        assert_eq!(table.rates(), base.as_slice());

        assert!(!table.set_modifier(Modifier::Shell, false));
        assert!(!table.modifiers().is_enabled(Modifier::Shell));

        // The tool modifier always appends a rate.
        assert!(table.set_modifier(Modifier::Tool, true));
        assert_eq!(table.rates().len(), 2);
    }

    #[test]
    fn value_map_uses_sparse_json_keys() {
        let map = RateTable::default().value_map().unwrap();
        assert_eq!(map.len(), 11);
        assert_eq!(map.get(r#"{"d":2,"c":2}"#), Some(&14));
        assert_eq!(map.get(r#"{"s":1,"t":1,"d":1,"c":1}"#), Some(&12));
        assert_eq!(map.get(r#"{"s":1}"#), Some(&1));
    }
}
