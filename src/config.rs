//! Configuration Module
//!
//! Construction-time settings for a cache instance. Nothing here can change
//! once the cache is built.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::cache::EvictionPolicy;

/// Capacity used when none (or zero) is given
pub const DEFAULT_CAPACITY: usize = 1024;

/// Interval between sweeps when none (or zero) is given
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Cache configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries kept after each sweep
    pub capacity: usize,
    /// Ranking used to choose eviction victims
    pub policy: EvictionPolicy,
    /// How often the background sweeper runs
    pub sweep_interval: Duration,
}

impl Config {
    /// Creates a config with the given capacity and policy.
    ///
    /// A zero capacity is replaced by [`DEFAULT_CAPACITY`].
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Self {
        Self {
            capacity: normalize_capacity(capacity),
            policy,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    /// Overrides the sweep interval. Zero keeps the default.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = if interval.is_zero() {
            warn!("Sweep interval of zero is not allowed, using default");
            DEFAULT_SWEEP_INTERVAL
        } else {
            interval
        };
        self
    }

    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1024)
    /// - `CACHE_POLICY` - `lru` or `lfu` (default: lru)
    /// - `CACHE_SWEEP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 1000)
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let capacity = env::var("CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CAPACITY);
        let policy = env::var("CACHE_POLICY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        let sweep_interval = env::var("CACHE_SWEEP_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SWEEP_INTERVAL);

        Self::new(capacity, policy).with_sweep_interval(sweep_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, EvictionPolicy::default())
    }
}

/// Replaces a zero capacity with the default.
pub(crate) fn normalize_capacity(capacity: usize) -> usize {
    if capacity == 0 {
        warn!(
            "Cache capacity must be positive, using default of {}",
            DEFAULT_CAPACITY
        );
        DEFAULT_CAPACITY
    } else {
        capacity
    }
}
