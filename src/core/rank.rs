use hashbrown::HashSet;

use crate::trade::Trade;

/// Keeps the first candidate for each distinct leg multiset, preserving order.
pub fn dedup_equivalent(candidates: Vec<Trade>) -> Vec<Trade> {
    let mut seen: HashSet<String> = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|trade| seen.insert(trade.canonical_hash()))
        .collect()
}

/// Value descending, then fewer legs, then insertion order (stable sort).
pub fn rank(trades: &mut [Trade]) {
    trades.sort_by(|a, b| {
        b.value()
            .cmp(&a.value())
            .then_with(|| a.legs().len().cmp(&b.legs().len()))
    });
}

/// Length of the leading run sharing the highest value of a ranked list.
pub fn top_run_len(ranked: &[Trade]) -> usize {
    let Some(first) = ranked.first() else {
        return 0;
    };
    ranked
        .iter()
        .take_while(|trade| trade.value() == first.value())
        .count()
}
