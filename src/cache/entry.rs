//! Cache Entry Module
//!
//! Defines a single cached value with its access and expiry metadata.

use std::time::Duration;

use chrono::Utc;

use crate::cache::Rank;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Number of reads and writes this key has seen
    pub hits: u64,
    /// Last read or write (Unix milliseconds)
    pub last_used: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a fresh entry written at `now`, counting the write as its first hit.
    pub fn new(value: V, ttl: Option<Duration>, now: u64) -> Self {
        Self {
            value,
            hits: 1,
            last_used: now,
            expires_at: expiry_from(ttl, now),
        }
    }

    // == Overwrite ==
    /// Replaces the value and TTL in place. The hit count carries over.
    pub fn overwrite(&mut self, value: V, ttl: Option<Duration>, now: u64) {
        self.value = value;
        self.expires_at = expiry_from(ttl, now);
        self.touch(now);
    }

    // == Touch ==
    /// Records an access at `now`.
    pub fn touch(&mut self, now: u64) {
        self.hits = self.hits.saturating_add(1);
        self.last_used = now;
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is expired once `now` reaches `expires_at`; entries without a
    /// TTL never expire.
    pub fn is_expired_at(&self, now: u64) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    /// Returns true while the entry carries a TTL that has not yet elapsed.
    pub fn has_live_ttl_at(&self, now: u64) -> bool {
        self.expires_at.is_some() && !self.is_expired_at(now)
    }

    /// Ranking snapshot of this entry under `key`.
    pub fn rank<'a>(&self, key: &'a str) -> Rank<'a> {
        Rank {
            key,
            last_used: self.last_used,
            hits: self.hits,
        }
    }
}

/// A zero TTL means "no expiry", matching an absent TTL.
///
/// Rounds up to whole milliseconds so any non-zero TTL outlives the write.
fn expiry_from(ttl: Option<Duration>, now: u64) -> Option<u64> {
    ttl.filter(|ttl| !ttl.is_zero()).map(|ttl| {
        let ttl_ms = u64::try_from(ttl.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX);
        now.saturating_add(ttl_ms)
    })
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
}
