use log::{debug, info};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::publish::PublishCycle;
use crate::error::{Result, SpotError};

/// One periodic task for one effective interval
struct Trigger {
    /// `false` while paused
    active: watch::Sender<bool>,
    cancel: CancellationToken,
    /// Set by the trigger task while its cycle runs; read-only here
    in_flight: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Owns the triggers of a running session, one per effective interval
///
/// Triggers are independent: each runs its own timer and never waits on
/// another interval's publish cycle. A trigger awaits its own cycle before
/// the next tick, so a slow cycle delays that interval's next firing.
pub struct FrequencyScheduler {
    triggers: BTreeMap<u64, Trigger>,
}

impl FrequencyScheduler {
    /// Spawn and start one trigger per interval of `cycle`.
    ///
    /// A cycle with no groups yields an empty scheduler and needs no
    /// runtime; otherwise the caller must be inside a Tokio runtime.
    pub fn start(cycle: Arc<PublishCycle>) -> Result<Self> {
        let intervals = cycle.intervals();
        let mut triggers = BTreeMap::new();
        if intervals.is_empty() {
            return Ok(Self { triggers });
        }

        let runtime = Handle::try_current().map_err(|_| SpotError::RuntimeUnavailable)?;

        for interval_ms in intervals {
            let (active, active_rx) = watch::channel(true);
            let cancel = CancellationToken::new();
            let in_flight = Arc::new(AtomicBool::new(false));

            let handle = runtime.spawn(run_trigger(
                Arc::clone(&cycle),
                interval_ms,
                active_rx,
                cancel.clone(),
                Arc::clone(&in_flight),
            ));

            triggers.insert(
                interval_ms,
                Trigger {
                    active,
                    cancel,
                    in_flight,
                    handle,
                },
            );
        }

        info!("Started {} triggers", triggers.len());
        Ok(Self { triggers })
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    pub fn intervals(&self) -> Vec<u64> {
        self.triggers.keys().copied().collect()
    }

    /// Stop periodic firing without tearing the triggers down
    pub fn pause(&self) {
        self.set_active(false);
    }

    /// Restart periodic firing; each trigger waits a full interval first
    pub fn resume(&self) {
        self.set_active(true);
    }

    /// Only real transitions notify the triggers
    fn set_active(&self, on: bool) {
        for trigger in self.triggers.values() {
            trigger.active.send_if_modified(|active| {
                let modified = *active != on;
                *active = on;
                modified
            });
        }
    }

    /// True while the publish cycle of `interval_ms` is running
    pub fn is_firing(&self, interval_ms: u64) -> bool {
        self.triggers
            .get(&interval_ms)
            .is_some_and(|t| t.in_flight.load(Ordering::Acquire))
    }

    /// Cancel every trigger. A cycle already in flight finishes its batch;
    /// no new one starts.
    pub fn stop(&mut self) {
        for (interval_ms, trigger) in std::mem::take(&mut self.triggers) {
            trigger.cancel.cancel();
            debug!(
                "Cancelled {}ms trigger (finished={})",
                interval_ms,
                trigger.handle.is_finished()
            );
        }
    }
}

impl Drop for FrequencyScheduler {
    fn drop(&mut self) {
        for trigger in self.triggers.values() {
            trigger.cancel.cancel();
        }
    }
}

async fn wait_until_active(active: &mut watch::Receiver<bool>) -> bool {
    active.wait_for(|on| *on).await.is_ok()
}

async fn run_trigger(
    cycle: Arc<PublishCycle>,
    interval_ms: u64,
    mut active: watch::Receiver<bool>,
    cancel: CancellationToken,
    in_flight: Arc<AtomicBool>,
) {
    let period = Duration::from_millis(interval_ms);
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let is_active = *active.borrow_and_update();
        if !is_active {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                resumed = wait_until_active(&mut active) => {
                    if !resumed {
                        break;
                    }
                    ticker.reset();
                }
            }
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            changed = active.changed() => {
                if changed.is_err() {
                    break;
                }
                // pause and resume may both land before this task runs
                ticker.reset();
                continue;
            }
            _ = ticker.tick() => {}
        }

        if cancel.is_cancelled() || !*active.borrow() {
            continue;
        }
        in_flight.store(true, Ordering::Release);
        let outcome = cycle.fire(interval_ms).await;
        in_flight.store(false, Ordering::Release);

        if outcome.failed > 0 {
            debug!(
                "{}ms cycle: {} published, {} failed",
                interval_ms, outcome.published, outcome.failed
            );
        }
    }

    debug!("{}ms trigger exited", interval_ms);
}
