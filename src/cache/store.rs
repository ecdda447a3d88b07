//! Cache Store Module
//!
//! Main cache engine: HashMap storage with TTL expiry and policy-ranked
//! capacity eviction. The store itself is not synchronized; `Cache` wraps it
//! in a single mutex shared with the sweeper.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::cache::{current_timestamp_ms, CacheEntry, CacheStats, EvictionPolicy};
use crate::config::{normalize_capacity, Config};

// == Cache Store ==
/// Main cache storage with TTL support and LRU/LFU eviction.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Number of entries kept after a sweep
    capacity: usize,
    /// Ranking used to pick eviction victims
    policy: EvictionPolicy,
    /// Set when a TTL-bearing entry may exist; lets the expiry pass skip
    has_ttl: bool,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store. A zero capacity falls back to the default.
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            capacity: normalize_capacity(capacity),
            policy,
            has_ttl: false,
        }
    }

    // == From Config ==
    /// Creates an empty store from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.capacity, config.policy)
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// Overwriting keeps the cumulative hit count and counts the write as one
    /// more hit. Capacity is not enforced here; the next sweep trims overflow.
    pub fn set(&mut self, key: String, value: V, ttl: Option<Duration>) {
        self.set_at(key, value, ttl, current_timestamp_ms());
    }

    pub(crate) fn set_at(&mut self, key: String, value: V, ttl: Option<Duration>, now: u64) {
        let entry = match self.entries.entry(key) {
            Entry::Occupied(occupied) => {
                let entry = occupied.into_mut();
                entry.overwrite(value, ttl, now);
                entry
            }
            Entry::Vacant(vacant) => vacant.insert(CacheEntry::new(value, ttl, now)),
        };

        if entry.expires_at.is_some() {
            self.has_ttl = true;
        }
        self.stats.set_total_entries(self.entries.len());
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Purge Expired ==
    /// Expiry pass: removes every entry whose TTL has elapsed.
    ///
    /// Skipped when no TTL entry is known. Clears the TTL flag once no live
    /// TTL entry remains. Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(current_timestamp_ms())
    }

    pub(crate) fn purge_expired_at(&mut self, now: u64) -> usize {
        if !self.has_ttl {
            return 0;
        }

        let before = self.entries.len();
        let mut live_ttl = false;
        self.entries.retain(|_, entry| {
            if entry.is_expired_at(now) {
                return false;
            }
            live_ttl |= entry.has_live_ttl_at(now);
            true
        });
        self.has_ttl = live_ttl;

        let removed = before - self.entries.len();
        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Evict Overflow ==
    /// Capacity pass: ranks all entries by policy and removes the lowest
    /// `len - capacity` of them. Returns the number evicted.
    pub fn evict_overflow(&mut self) -> usize {
        let over = self.entries.len().saturating_sub(self.capacity);
        if over == 0 {
            return 0;
        }

        let ranks = self
            .entries
            .iter()
            .map(|(key, entry)| entry.rank(key))
            .collect();
        let victims = self.policy.select_victims(ranks, over);

        for key in &victims {
            self.entries.remove(key);
        }

        self.stats.record_evictions(victims.len());
        self.stats.set_total_entries(self.entries.len());
        victims.len()
    }

    // == Mark Swept ==
    /// Records the completion time of a sweep in the statistics.
    pub fn mark_swept(&mut self, at: DateTime<Utc>) {
        self.stats.record_sweep(at);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Has TTL Entries ==
    /// Returns true while the expiry pass still has work to check.
    pub fn has_ttl_entries(&self) -> bool {
        self.has_ttl
    }

    // == Capacity ==
    /// Returns the number of entries kept after a capacity pass.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Policy ==
    /// Returns the ranking used to choose eviction victims.
    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn entry(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }
}

impl<V: Clone> CacheStore<V> {
    // == Get ==
    /// Retrieves a value by key and records the access.
    ///
    /// An entry whose TTL has elapsed but has not been swept yet is removed
    /// here and reported as missing.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_at(key, current_timestamp_ms())
    }

    pub(crate) fn get_at(&mut self, key: &str, now: u64) -> Option<V> {
        let expired = match self.entries.get_mut(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                entry.touch(now);
                let value = entry.value.clone();
                self.stats.record_hit();
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
        }
        self.stats.record_miss();
        None
    }
}
