//! Cache Sweeper Task
//!
//! Background task that periodically expires TTL entries and trims the store
//! back to capacity.

use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Entries removed because their TTL elapsed
    pub expired: usize,
    /// Entries removed by the capacity policy
    pub evicted: usize,
}

impl SweepReport {
    /// Total entries removed by both passes.
    pub fn removed(&self) -> usize {
        self.expired + self.evicted
    }
}

/// Runs one sweep: the expiry pass, then the capacity pass.
///
/// Each pass takes the store lock separately, so callers waiting on the lock
/// can interleave between them.
pub fn run_sweep<V>(store: &Mutex<CacheStore<V>>) -> SweepReport {
    let expired = store.lock().purge_expired();

    let mut guard = store.lock();
    let evicted = guard.evict_overflow();
    guard.mark_swept(Utc::now());

    SweepReport { expired, evicted }
}

/// Spawns a background task that sweeps the store every `interval`.
///
/// The task holds only a weak reference to the store. It stops when `true` is
/// sent on `shutdown`, when the sender is dropped, or when the store itself
/// has been dropped.
///
/// # Example
/// ```ignore
/// let store = Arc::new(Mutex::new(CacheStore::<String>::new(1024, EvictionPolicy::Lru)));
/// let (shutdown_tx, shutdown_rx) = watch::channel(false);
/// let handle = spawn_sweeper_task(Arc::downgrade(&store), Duration::from_secs(1), shutdown_rx);
/// // Later:
/// shutdown_tx.send(true).ok();
/// handle.await.ok();
/// ```
pub fn spawn_sweeper_task<V>(
    store: Weak<Mutex<CacheStore<V>>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    V: Send + 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting cache sweeper with interval of {} ms",
            interval.as_millis()
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                changed = shutdown.changed() => {
                    // A dropped sender means every cache handle is gone
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }

            let Some(store) = store.upgrade() else {
                break;
            };
            let report = run_sweep(&store);
            let remaining = store.lock().len();
            drop(store);

            if report.removed() > 0 {
                info!(
                    expired = report.expired,
                    evicted = report.evicted,
                    remaining,
                    "Cache sweep removed entries"
                );
            } else {
                debug!(remaining, "Cache sweep: nothing to remove");
            }
        }

        info!("Cache sweeper stopped");
    })
}

/// Creates the shutdown channel and spawns the sweeper for `store`.
///
/// Sending `true` on the returned sender (or dropping it) stops the task.
pub fn spawn_sweeper(
    store: &Arc<Mutex<CacheStore<impl Send + 'static>>>,
    interval: Duration,
) -> (watch::Sender<bool>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(false);
    let handle = spawn_sweeper_task(Arc::downgrade(store), interval, rx);
    (tx, handle)
}
