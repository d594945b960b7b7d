use dashmap::DashMap;
use log::{debug, warn};
use spot_core::{Symbol, TickUpdate};
use spot_ports::TickSink;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::error::{Result, SpotError};

/// Broadcast-based tick publisher
///
/// Uses tokio broadcast channels so publishing never waits on subscribers.
/// Supports both global subscriptions and per-instrument subscriptions. A
/// subscriber that falls more than `capacity` ticks behind skips ahead.
pub struct BroadcastTickPublisher {
    /// Global broadcast channel for all ticks
    global_tx: broadcast::Sender<TickUpdate>,
    /// Per-instrument broadcast channels
    symbol_channels: Arc<DashMap<Symbol, broadcast::Sender<TickUpdate>>>,
    /// Channel capacity
    capacity: usize,
}

impl BroadcastTickPublisher {
    pub fn new(capacity: usize) -> Self {
        let (global_tx, _) = broadcast::channel(capacity.max(1));

        BroadcastTickPublisher {
            global_tx,
            symbol_channels: Arc::new(DashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to all ticks
    pub fn subscribe(&self) -> broadcast::Receiver<TickUpdate> {
        self.global_tx.subscribe()
    }

    /// Subscribe to ticks for a specific instrument
    pub fn subscribe_instrument(&self, symbol: &str) -> broadcast::Receiver<TickUpdate> {
        let entry = self
            .symbol_channels
            .entry(symbol.to_string())
            .or_insert_with(|| {
                let (tx, _) = broadcast::channel(self.capacity);
                tx
            });

        entry.value().subscribe()
    }

    /// Run `handler` for every tick on its own task.
    ///
    /// A worker task drains a global subscription and spawns one task per
    /// tick, so a slow or panicking handler neither delays the publisher nor
    /// the following ticks. Fails outside a Tokio runtime.
    pub fn spawn_handler<F, Fut>(&self, handler: F) -> Result<JoinHandle<()>>
    where
        F: Fn(TickUpdate) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| SpotError::RuntimeUnavailable)?;
        let mut rx = self.subscribe();
        let handler = Arc::new(handler);

        Ok(runtime.spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(tick) => {
                        let handler = Arc::clone(&handler);
                        tokio::spawn(async move { handler(tick).await });
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Tick handler lagged behind, skipped {} ticks", skipped);
                    }
                    Err(RecvError::Closed) => {
                        debug!("Tick channel closed, stopping handler");
                        break;
                    }
                }
            }
        }))
    }
}

/// Non-blocking fan-out, usable from inside synchronous update code
impl TickSink for BroadcastTickPublisher {
    fn publish(&self, tick: TickUpdate) {
        // Publish to symbol-specific channel if exists
        if let Some(tx) = self.symbol_channels.get(&tick.symbol) {
            let _ = tx.send(tick.clone());
        }

        // Ignore send errors (no subscribers)
        let _ = self.global_tx.send(tick);
    }

    fn subscriber_count(&self) -> usize {
        let per_symbol: usize = self
            .symbol_channels
            .iter()
            .map(|entry| entry.value().receiver_count())
            .sum();
        self.global_tx.receiver_count() + per_symbol
    }
}

impl Default for BroadcastTickPublisher {
    fn default() -> Self {
        Self::new(10000)
    }
}

impl Clone for BroadcastTickPublisher {
    fn clone(&self) -> Self {
        BroadcastTickPublisher {
            global_tx: self.global_tx.clone(),
            symbol_channels: Arc::clone(&self.symbol_channels),
            capacity: self.capacity,
        }
    }
}
