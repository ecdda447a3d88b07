//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU/LFU eviction.

mod entry;
mod handle;
mod policy;
mod stats;
mod store;
mod value;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use handle::Cache;
pub use policy::{EvictionPolicy, Rank};
pub use stats::CacheStats;
pub use store::CacheStore;
pub use value::Value;
