//! Memoized search for the highest-value way to redeem a resource hand
//! against a table of exchange rates.
//!
//! # Examples
//!
//! Direct usage with [`core::engine::ExchangeEngine`]:
//! ```
//! use hand_exchange::{core::engine::ExchangeEngine, resource::ResourceAlloc};
//!
//! let mut engine = ExchangeEngine::default();
//! let best = engine.best(ResourceAlloc::new(3, 2, 0, 0)).expect("solvable");
//! assert_eq!(best.value(), 9);
//! assert_eq!(
//!     best.legs(),
//!     &[
//!         ResourceAlloc::new(1, 2, 0, 0),
//!         ResourceAlloc::shells(1),
//!         ResourceAlloc::shells(1),
//!     ]
//! );
//!
//! // Modifier toggles clear the cache and change the answer.
//! assert!(engine.set_shell_modifier(true));
//! assert_eq!(engine.best(ResourceAlloc::shells(3)).map(|t| t.value()), Some(8));
//! ```
//!
//! Runtime usage from async code:
//! ```no_run
//! use hand_exchange::{
//!     core::engine::ExchangeEngine,
//!     resource::ResourceAlloc,
//!     runtime::handle::{spawn_exchange, RuntimeConfig},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let handle = spawn_exchange(ExchangeEngine::default(), RuntimeConfig::default());
//! let best = handle.best(ResourceAlloc::new(2, 2, 2, 2)).await.expect("best");
//! assert_eq!(best.value, 24);
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Exchange engine, memo table, and ranking.
pub mod core;
/// Exchange rates, modifiers, and the rate table.
pub mod rates;
/// Resource bundle value type and canonical hashing.
pub mod resource;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Decomposition results.
pub mod trade;
/// Shared primitive types and enums.
pub mod types;
