use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, warn};

use crate::{
    core::{cache::CacheStats, engine::ExchangeEngine},
    resource::ResourceAlloc,
    trade::{Trade, TradeExport},
    types::{Modifier, RateValue},
};

use super::events::ExchangeEvent;

/// Failures reported by [`ExchangeHandle`].
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The rate table cannot fully consume `hand`.
    #[error("no decomposition exists for {hand} under the current rate table")]
    NoDecomposition {
        /// Hand that was solved.
        hand: ResourceAlloc,
    },
    /// Rendering the rate table as JSON failed.
    #[error("rate table export failed: {0}")]
    Export(#[from] serde_json::Error),
    /// The runtime task has stopped.
    #[error("exchange runtime channel closed")]
    ChannelClosed,
}

/// Channel sizes for [`spawn_exchange`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Pending commands before callers wait.
    pub command_queue_bound: usize,
    /// Events buffered per subscriber before it lags.
    pub event_queue_bound: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_queue_bound: 1024,
        }
    }
}

/// Cloneable front end to an engine owned by the runtime task.
pub struct ExchangeHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<ExchangeEvent>,
}

impl Clone for ExchangeHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    Solve {
        hand: ResourceAlloc,
        resp: oneshot::Sender<Vec<Trade>>,
    },
    SetModifier {
        modifier: Modifier,
        enable: bool,
        resp: oneshot::Sender<bool>,
    },
    InvalidateCache {
        resp: oneshot::Sender<()>,
    },
    RateTable {
        resp: oneshot::Sender<serde_json::Result<BTreeMap<String, RateValue>>>,
    },
    CacheStats {
        resp: oneshot::Sender<CacheStats>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `engine` into a task that serves commands one at a time.
///
/// Solves and modifier toggles never overlap, so the rate table cannot change
/// under an in-flight search.
///
/// Searches run inline on the runtime task. A cold solve of a large hand
/// occupies its worker thread until it finishes, so on a current-thread
/// runtime it also stalls every other task. Use a multi-thread runtime when
/// hands are large or the host has latency-sensitive tasks.
pub fn spawn_exchange(engine: ExchangeEngine, config: RuntimeConfig) -> ExchangeHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<ExchangeEvent>(config.event_queue_bound.max(1));

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut engine = engine;

        while let Some(cmd) = cmd_rx.recv().await {
            if handle_command(cmd, &mut engine, &events_tx_loop) {
                break;
            }
        }
        debug!("exchange runtime stopped");
    });

    ExchangeHandle { cmd_tx, events_tx }
}

impl ExchangeHandle {
    /// Receives every event emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ExchangeEvent> {
        self.events_tx.subscribe()
    }

    /// Full ranked list for `hand`; empty when nothing decomposes it.
    pub async fn solve(&self, hand: ResourceAlloc) -> Result<Vec<Trade>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Solve { hand, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Highest-ranked decomposition, or [`RuntimeError::NoDecomposition`].
    pub async fn best(&self, hand: ResourceAlloc) -> Result<TradeExport, RuntimeError> {
        self.solve(hand)
            .await?
            .first()
            .map(Trade::export)
            .ok_or(RuntimeError::NoDecomposition { hand })
    }

    /// Returns true if the effective rates changed.
    pub async fn set_modifier(&self, modifier: Modifier, enable: bool) -> Result<bool, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::SetModifier {
                modifier,
                enable,
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// See [`ExchangeEngine::set_shell_modifier`].
    pub async fn set_shell_modifier(&self, enable: bool) -> Result<bool, RuntimeError> {
        self.set_modifier(Modifier::Shell, enable).await
    }

    /// See [`ExchangeEngine::set_tool_modifier`].
    pub async fn set_tool_modifier(&self, enable: bool) -> Result<bool, RuntimeError> {
        self.set_modifier(Modifier::Tool, enable).await
    }

    /// Drops every cached hand.
    pub async fn invalidate_cache(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::InvalidateCache { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Effective rates keyed by the JSON rendering of their cost.
    pub async fn rate_table(&self) -> Result<BTreeMap<String, RateValue>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::RateTable { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        Ok(rx.await.map_err(|_| RuntimeError::ChannelClosed)??)
    }

    /// Current cache counters.
    pub async fn cache_stats(&self) -> Result<CacheStats, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::CacheStats { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Stops the runtime task once earlier commands are served.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

fn handle_command(
    cmd: Command,
    engine: &mut ExchangeEngine,
    events_tx: &broadcast::Sender<ExchangeEvent>,
) -> bool {
    match cmd {
        Command::Solve { hand, resp } => {
            let ranked = engine.solve(hand);
            let _ = events_tx.send(ExchangeEvent::Solved {
                fingerprint: hand.fingerprint(),
                candidates: ranked.len(),
            });
            if resp.send(ranked).is_err() {
                warn!(%hand, "solve caller went away before the result was ready");
            }
        }
        Command::SetModifier {
            modifier,
            enable,
            resp,
        } => {
            let changed = engine.set_modifier(modifier, enable);
            if changed {
                let _ = events_tx.send(ExchangeEvent::ModifierChanged {
                    modifier,
                    enabled: enable,
                });
                let _ = events_tx.send(ExchangeEvent::CacheInvalidated);
            }
            let _ = resp.send(changed);
        }
        Command::InvalidateCache { resp } => {
            engine.invalidate_cache();
            let _ = events_tx.send(ExchangeEvent::CacheInvalidated);
            let _ = resp.send(());
        }
        Command::RateTable { resp } => {
            let _ = resp.send(engine.rate_values());
        }
        Command::CacheStats { resp } => {
            let _ = resp.send(engine.cache_stats());
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}
