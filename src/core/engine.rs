use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    rates::{ModifierSet, RateTable},
    resource::ResourceAlloc,
    trade::{Trade, TradeExport},
    types::{Modifier, RateValue, TradeValue},
};

use super::{
    cache::{CacheStats, CachedSolution, TradeCache},
    rank::{dedup_equivalent, rank, top_run_len},
};

/// Startup configuration for an [`ExchangeEngine`] over the default rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Modifiers applied before the first solve.
    pub modifiers: ModifierSet,
    /// Initial memo table capacity, in hands.
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            modifiers: ModifierSet::default(),
            cache_capacity: 128,
        }
    }
}

/// Rate table plus the memo table derived from it.
///
/// Cached results are only valid for the table they were computed against,
/// so every modifier change that alters the table clears the whole cache.
/// Callers sharing one engine across threads must serialize access to it;
/// see [`crate::runtime::handle::spawn_exchange`].
#[derive(Debug)]
pub struct ExchangeEngine {
    table: RateTable,
    cache: TradeCache,
}

impl Default for ExchangeEngine {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl ExchangeEngine {
    /// Engine over `table` with an empty cache.
    pub fn new(table: RateTable) -> Self {
        Self {
            table,
            cache: TradeCache::with_capacity(EngineConfig::default().cache_capacity),
        }
    }

    /// Engine over the default rates with `config` applied.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut table = RateTable::default();
        table.set_modifier(Modifier::Shell, config.modifiers.shell);
        table.set_modifier(Modifier::Tool, config.modifiers.tool);
        Self {
            table,
            cache: TradeCache::with_capacity(config.cache_capacity),
        }
    }

    /// Effective table, modifiers included.
    pub fn rate_table(&self) -> &RateTable {
        &self.table
    }

    /// Effective rates keyed by the JSON rendering of their cost.
    pub fn rate_values(&self) -> serde_json::Result<BTreeMap<String, RateValue>> {
        self.table.value_map()
    }

    /// Every distinct decomposition reachable from the best choice of each
    /// first leg, ranked best first. Empty when nothing decomposes `hand`.
    pub fn solve(&mut self, hand: ResourceAlloc) -> Vec<Trade> {
        let fp = hand.fingerprint();
        if let Some(hit) = self.cache.lookup(fp) {
            trace!(%hand, "cache hit");
            return hit.ranked().to_vec();
        }

        let solution = self.search(hand);
        let ranked = solution.ranked().to_vec();
        self.cache.insert(fp, solution);
        debug!(
            %hand,
            candidates = ranked.len(),
            best = ?ranked.first().map(Trade::value),
            cached = self.cache.len(),
            "solved hand"
        );
        ranked
    }

    /// Highest-ranked decomposition of `hand`.
    pub fn best(&mut self, hand: ResourceAlloc) -> Option<Trade> {
        self.solve(hand).into_iter().next()
    }

    /// All decompositions tied for the highest value.
    pub fn best_run(&mut self, hand: ResourceAlloc) -> Vec<Trade> {
        let mut ranked = self.solve(hand);
        ranked.truncate(top_run_len(&ranked));
        ranked
    }

    /// [`Self::best`] in its serializable form.
    pub fn export_best(&mut self, hand: ResourceAlloc) -> Option<TradeExport> {
        self.best(hand).as_ref().map(Trade::export)
    }

    /// Returns true if the effective rates changed, in which case the cache
    /// is cleared. The flag is recorded either way.
    pub fn set_modifier(&mut self, modifier: Modifier, enable: bool) -> bool {
        let changed = self.table.set_modifier(modifier, enable);
        if changed {
            debug!(?modifier, enable, "rate table modifier changed");
            self.invalidate_cache();
        }
        changed
    }

    /// Three shells redeem for 8 while enabled.
    pub fn set_shell_modifier(&mut self, enable: bool) -> bool {
        self.set_modifier(Modifier::Shell, enable)
    }

    /// Adds a three-tool rate worth 10 while enabled.
    pub fn set_tool_modifier(&mut self, enable: bool) -> bool {
        self.set_modifier(Modifier::Tool, enable)
    }

    /// Drops every cached hand.
    pub fn invalidate_cache(&mut self) {
        debug!(dropped = self.cache.len(), "invalidating trade cache");
        self.cache.clear();
    }

    /// Hit, miss and invalidation counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Number of hands currently cached.
    pub fn cached_hands(&self) -> usize {
        self.cache.len()
    }

    fn top_run(&mut self, hand: ResourceAlloc) -> Vec<Trade> {
        let fp = hand.fingerprint();
        if let Some(hit) = self.cache.lookup(fp) {
            return hit.top_run().to_vec();
        }

        let solution = self.search(hand);
        let top = solution.top_run().to_vec();
        self.cache.insert(fp, solution);
        top
    }

    fn search(&mut self, hand: ResourceAlloc) -> CachedSolution {
        let mut candidates = Vec::new();

        // Rate costs are never empty, so every recursive hand is strictly smaller.
        for idx in 0..self.table.rates().len() {
            let rate = self.table.rates()[idx];
            let Some(remaining) = hand.try_sub(&rate.cost) else {
                continue;
            };

            let value = TradeValue::from(rate.value);
            if remaining.is_empty() {
                candidates.push(Trade::single(rate.cost, value));
                continue;
            }

            for child in self.top_run(remaining) {
                candidates.push(child.prepend(rate.cost, value));
            }
        }

        let mut ranked = dedup_equivalent(candidates);
        rank(&mut ranked);
        let top_len = top_run_len(&ranked);
        CachedSolution::new(ranked, top_len)
    }
}

/// One-shot solve against the default rates with a fresh cache.
pub fn exchange(hand: ResourceAlloc) -> Vec<Trade> {
    ExchangeEngine::default().solve(hand)
}
