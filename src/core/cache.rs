use hashbrown::HashMap;

use crate::{trade::Trade, types::Fingerprint};

/// Ranked result for one hand under one rate table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSolution {
    ranked: Vec<Trade>,
    top_len: usize,
}

impl CachedSolution {
    pub(crate) fn new(ranked: Vec<Trade>, top_len: usize) -> Self {
        Self { ranked, top_len }
    }

    /// Full deduplicated ranking, best first.
    pub fn ranked(&self) -> &[Trade] {
        &self.ranked
    }

    /// Leading entries tied for the highest value.
    pub fn top_run(&self) -> &[Trade] {
        &self.ranked[..self.top_len]
    }
}

/// Counters describing cache behaviour since the engine was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to search.
    pub misses: u64,
    /// Times the cache was cleared.
    pub invalidations: u64,
    /// Hands currently cached.
    pub entries: usize,
}

/// Memo table keyed by hand fingerprint.
#[derive(Debug, Default)]
pub struct TradeCache {
    entries: HashMap<Fingerprint, CachedSolution>,
    hits: u64,
    misses: u64,
    invalidations: u64,
}

impl TradeCache {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Counts a hit or a miss for `fp`.
    pub(crate) fn lookup(&mut self, fp: Fingerprint) -> Option<&CachedSolution> {
        match self.entries.get(&fp) {
            Some(hit) => {
                self.hits += 1;
                Some(hit)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub(crate) fn insert(&mut self, fp: Fingerprint, solution: CachedSolution) {
        self.entries.insert(fp, solution);
    }

    /// Drops every entry. Idempotent apart from the invalidation counter.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.invalidations += 1;
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            invalidations: self.invalidations,
            entries: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceAlloc;

    #[test]
    fn counters_track_lookups_and_clears() {
        let mut cache = TradeCache::with_capacity(4);
        let hand = ResourceAlloc::shells(1);
        let fp = hand.fingerprint();

        assert!(cache.lookup(fp).is_none());
        cache.insert(fp, CachedSolution::new(vec![Trade::single(hand, 1)], 1));
        assert_eq!(cache.lookup(fp).map(|s| s.top_run().len()), Some(1));

        cache.clear();
        cache.clear();
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                invalidations: 2,
                entries: 0,
            }
        );
    }
}
