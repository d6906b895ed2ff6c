//! Exchange search engine and its memo table.

/// Fingerprint-keyed memo table.
pub mod cache;
/// Memoized decomposition search and modifier handling.
pub mod engine;
/// Deduplication and ranking of candidate trades.
pub mod rank;
