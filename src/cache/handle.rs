//! Cache Handle Module
//!
//! The public, cloneable cache type. It owns the locked store and the
//! background sweeper that keeps it within capacity and free of expired
//! entries.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::{CacheStats, CacheStore, EvictionPolicy};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::tasks::{run_sweep, spawn_sweeper, SweepReport};

// == Cache ==
/// A bounded in-memory cache with TTL expiry and LRU/LFU eviction.
///
/// Cloning yields another handle to the same cache. The sweeper stops when
/// [`Cache::shutdown`] is awaited or when the last handle is dropped.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use memo_cache::{Cache, Config, EvictionPolicy};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> memo_cache::error::Result<()> {
/// let cache: Cache<String> = Cache::new(Config::new(2, EvictionPolicy::Lru))?;
///
/// cache.set("name", "alice".to_string(), None);
/// cache.set("session", "token".to_string(), Some(Duration::from_secs(60)));
///
/// assert_eq!(cache.get("name"), Some("alice".to_string()));
/// assert_eq!(cache.get("missing"), None);
///
/// cache.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct Cache<V> {
    store: Arc<Mutex<CacheStore<V>>>,
    sweeper: Arc<Sweeper>,
}

/// Shutdown side of the background sweeper.
///
/// Dropping it drops the sender, which ends the task on its own. The join
/// handle sits behind an async lock so every `shutdown` caller waits for the
/// same join to finish.
struct Sweeper {
    shutdown: watch::Sender<bool>,
    task: AsyncMutex<Option<JoinHandle<()>>>,
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            sweeper: Arc::clone(&self.sweeper),
        }
    }
}

impl<V> std::fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let store = self.store.lock();
        f.debug_struct("Cache")
            .field("capacity", &store.capacity())
            .field("policy", &store.policy())
            .field("len", &store.len())
            .field("running", &self.is_running())
            .finish()
    }
}

impl<V: Send + 'static> Cache<V> {
    // == Constructor ==
    /// Creates an empty cache and starts its sweeper.
    ///
    /// Must be called from within a tokio runtime, which hosts the sweeper.
    pub fn new(config: Config) -> Result<Self> {
        Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        let store = Arc::new(Mutex::new(CacheStore::from_config(&config)));
        let (shutdown, task) = spawn_sweeper(&store, config.sweep_interval);
        debug!(
            capacity = config.capacity,
            policy = %config.policy,
            "Cache created"
        );

        Ok(Self {
            store,
            sweeper: Arc::new(Sweeper {
                shutdown,
                task: AsyncMutex::new(Some(task)),
            }),
        })
    }

    // == With Capacity ==
    /// Creates a cache with the default sweep interval.
    pub fn with_capacity(capacity: usize, policy: EvictionPolicy) -> Result<Self> {
        Self::new(Config::new(capacity, policy))
    }
}

impl<V> Cache<V> {
    // == Set ==
    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// A non-zero `ttl` makes the entry expire after that long. Overflow past
    /// capacity is trimmed by the next sweep.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        self.store.lock().set(key.into(), value, ttl);
    }

    // == Delete ==
    /// Removes `key`. Returns whether it was present; missing keys are a no-op.
    pub fn delete(&self, key: &str) -> bool {
        self.store.lock().delete(key)
    }

    // == Sweep ==
    /// Runs the expiry and capacity passes now instead of waiting for the
    /// next tick.
    pub fn sweep(&self) -> SweepReport {
        run_sweep(&self.store)
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    // == Length ==
    /// Returns the current number of entries, including overflow not yet swept.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    // == Capacity ==
    /// Returns the number of entries kept after each sweep.
    pub fn capacity(&self) -> usize {
        self.store.lock().capacity()
    }

    // == Policy ==
    /// Returns the eviction policy chosen at construction.
    pub fn policy(&self) -> EvictionPolicy {
        self.store.lock().policy()
    }

    // == Shutdown ==
    /// Stops the sweeper and waits for it to finish.
    ///
    /// Values stay readable and writable afterwards, but nothing expires or
    /// gets evicted except through lazy expiry on `get` and explicit
    /// [`Cache::sweep`] calls. Concurrent callers on other clones return only
    /// once the task has finished; calling it again is a no-op.
    pub async fn shutdown(&self) {
        // Fails only if the task is already gone
        let _ = self.sweeper.shutdown.send(true);

        let mut task = self.sweeper.task.lock().await;
        if let Some(handle) = task.as_mut() {
            if let Err(err) = handle.await {
                warn!(error = %err, "Cache sweeper ended abnormally");
            }
            *task = None;
        }
    }

    // == Is Running ==
    /// Returns true while the background sweeper is alive.
    ///
    /// A shutdown still joining the task counts as running.
    pub fn is_running(&self) -> bool {
        match self.sweeper.task.try_lock() {
            Ok(task) => task
                .as_ref()
                .map(|handle| !handle.is_finished())
                .unwrap_or(false),
            Err(_) => true,
        }
    }

    #[cfg(test)]
    fn take_sweeper_task(&self) -> Option<JoinHandle<()>> {
        self.sweeper.task.try_lock().ok()?.take()
    }
}

impl<V: Clone> Cache<V> {
    // == Get ==
    /// Returns a clone of the value under `key` and records the access.
    ///
    /// Missing and expired keys both yield `None`.
    pub fn get(&self, key: &str) -> Option<V> {
        self.store.lock().get(key)
    }
}
