//! Memo Cache - an in-process key-value cache
//!
//! Bounded capacity, TTL expiration, and LRU or LFU eviction, enforced by a
//! background sweeper running on tokio.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats, EvictionPolicy, Value};
pub use config::Config;
pub use error::CacheError;
pub use tasks::SweepReport;
