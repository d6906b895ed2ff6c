//! Runtime event stream payloads.

use crate::types::{Fingerprint, Modifier};

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeEvent {
    /// A hand was solved.
    Solved {
        /// Fingerprint of the solved hand.
        fingerprint: Fingerprint,
        /// Number of ranked decompositions returned.
        candidates: usize,
    },
    /// A modifier toggle changed the rate table.
    ModifierChanged {
        /// Modifier that was toggled.
        modifier: Modifier,
        /// New state.
        enabled: bool,
    },
    /// All cached results were dropped.
    CacheInvalidated,
}
