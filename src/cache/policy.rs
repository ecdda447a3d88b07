//! Eviction Policy Module
//!
//! Ranks cache entries for capacity eviction under LRU or LFU.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

// == Eviction Policy ==
/// Strategy used to pick victims when the cache holds more entries than its
/// capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// Least recently used entries go first
    #[default]
    Lru,
    /// Least frequently used entries go first
    Lfu,
}

impl EvictionPolicy {
    // == Compare ==
    /// Orders two candidates so that the one to evict first sorts lower.
    ///
    /// Ties on the policy's own metadata fall back to the other field and then
    /// to the key, so the order is total and victim selection is repeatable.
    pub fn compare(&self, a: &Rank<'_>, b: &Rank<'_>) -> Ordering {
        match self {
            EvictionPolicy::Lru => a
                .last_used
                .cmp(&b.last_used)
                .then(a.hits.cmp(&b.hits))
                .then_with(|| a.key.cmp(b.key)),
            EvictionPolicy::Lfu => a
                .hits
                .cmp(&b.hits)
                .then(a.last_used.cmp(&b.last_used))
                .then_with(|| a.key.cmp(b.key)),
        }
    }

    // == Select Victims ==
    /// Returns the `count` lowest-ranked keys, lowest first.
    pub fn select_victims(&self, mut ranks: Vec<Rank<'_>>, count: usize) -> Vec<String> {
        if count == 0 {
            return Vec::new();
        }
        ranks.sort_unstable_by(|a, b| self.compare(a, b));
        ranks
            .into_iter()
            .take(count)
            .map(|rank| rank.key.to_string())
            .collect()
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionPolicy::Lru => write!(f, "lru"),
            EvictionPolicy::Lfu => write!(f, "lfu"),
        }
    }
}

impl FromStr for EvictionPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(EvictionPolicy::Lru),
            "lfu" => Ok(EvictionPolicy::Lfu),
            other => Err(CacheError::InvalidPolicy(other.to_string())),
        }
    }
}

// == Rank ==
/// Snapshot of the metadata an eviction pass ranks on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rank<'a> {
    pub key: &'a str,
    pub last_used: u64,
    pub hits: u64,
}
