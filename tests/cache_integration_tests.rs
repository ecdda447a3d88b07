//! Integration Tests for the Cache Handle
//!
//! Exercises the public API together with the background sweeper.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use memo_cache::{Cache, CacheError, Config, EvictionPolicy, SweepReport};

// == Helper Functions ==

const SWEEP: Duration = Duration::from_millis(100);

fn fast_cache<V: Send + 'static>(capacity: usize, policy: EvictionPolicy) -> Cache<V> {
    Cache::new(Config::new(capacity, policy).with_sweep_interval(SWEEP)).unwrap()
}

/// Long enough for at least one full sweep to have run.
async fn wait_for_sweep() {
    tokio::time::sleep(SWEEP * 3).await;
}

// == Store Contract ==

#[tokio::test]
async fn test_overwrite_returns_latest_value() {
    let cache = fast_cache(16, EvictionPolicy::Lru);

    cache.set("name", "zhangsan".to_string(), None);
    assert_eq!(cache.get("name"), Some("zhangsan".to_string()));

    cache.set("name", "lisi".to_string(), None);
    assert_eq!(cache.get("name"), Some("lisi".to_string()));
    assert_eq!(cache.len(), 1);

    cache.shutdown().await;
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let cache = fast_cache(16, EvictionPolicy::Lru);

    assert!(!cache.delete("missing"));

    cache.set("k", 1, None);
    assert!(cache.delete("k"));
    assert!(!cache.delete("k"));
    assert_eq!(cache.get("k"), None);

    cache.shutdown().await;
}

#[test]
fn test_construction_requires_runtime() {
    let result = Cache::<String>::with_capacity(16, EvictionPolicy::Lru);
    assert_eq!(result.err(), Some(CacheError::NoRuntime));
}

// == Expiry ==

#[tokio::test]
async fn test_entry_expires_after_ttl_and_one_sweep() {
    let cache = fast_cache(16, EvictionPolicy::Lru);
    let ttl = Duration::from_millis(200);

    cache.set("key1", "zhangsan".to_string(), Some(ttl));
    assert_eq!(cache.get("key1"), Some("zhangsan".to_string()));

    tokio::time::sleep(ttl).await;
    wait_for_sweep().await;

    // Gone before any read could lazily remove it
    assert_eq!(cache.len(), 0);
    assert_eq!(cache.get("key1"), None);
    assert_eq!(cache.stats().expirations, 1);

    cache.shutdown().await;
}

#[tokio::test]
async fn test_expiry_with_default_sweep_interval() {
    let cache: Cache<&str> = Cache::new(Config::default()).unwrap();

    cache.set("key1", "zhangsan", Some(Duration::from_secs(1)));
    assert_eq!(cache.get("key1"), Some("zhangsan"));

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert!(cache.is_empty());
    assert_eq!(cache.get("key1"), None);

    cache.shutdown().await;
}

#[tokio::test]
async fn test_entry_without_ttl_persists() {
    let cache = fast_cache(16, EvictionPolicy::Lru);

    cache.set("forever", 42u64, None);
    cache.set("zero_ttl", 7u64, Some(Duration::ZERO));
    wait_for_sweep().await;
    wait_for_sweep().await;

    assert_eq!(cache.get("forever"), Some(42));
    assert_eq!(cache.get("zero_ttl"), Some(7));

    cache.shutdown().await;
}

// == Capacity Eviction ==

#[tokio::test]
async fn test_capacity_lru_evicts_untouched_entry() {
    let cache = fast_cache(2, EvictionPolicy::Lru);

    cache.set("key1", "value1", None);
    cache.set("key2", "value2", None);
    assert!(cache.get("key1").is_some());
    cache.set("key3", "value3", None);

    wait_for_sweep().await;

    assert!(cache.get("key2").is_none(), "key2 should have been evicted");
    assert!(cache.get("key1").is_some());
    assert!(cache.get("key3").is_some());

    cache.shutdown().await;
}

#[tokio::test]
async fn test_capacity_lfu_evicts_least_used_entry() {
    let cache = fast_cache(2, EvictionPolicy::Lfu);

    cache.set("hot", "v", None);
    for _ in 0..5 {
        cache.get("hot");
    }
    tokio::time::sleep(Duration::from_millis(5)).await;
    cache.set("warm", "v", None);
    cache.get("warm");
    // Newest, but used only once
    cache.set("cold", "v", None);

    wait_for_sweep().await;

    assert!(cache.get("cold").is_none(), "cold should have been evicted");
    assert!(cache.get("hot").is_some());
    assert!(cache.get("warm").is_some());

    cache.shutdown().await;
}

#[tokio::test]
async fn test_ties_evicted_in_key_order() {
    let cache = fast_cache(2, EvictionPolicy::Lru);
    cache.shutdown().await;

    // Manual sweeps only; retry until all writes land in one millisecond
    loop {
        for key in ["delta", "alpha", "charlie", "bravo"] {
            cache.delete(key);
        }
        let before = chrono::Utc::now().timestamp_millis();
        for key in ["delta", "alpha", "charlie", "bravo"] {
            cache.set(key, 0u8, None);
        }
        if chrono::Utc::now().timestamp_millis() == before {
            break;
        }
    }

    assert_eq!(cache.sweep(), SweepReport { expired: 0, evicted: 2 });
    assert!(cache.get("alpha").is_none());
    assert!(cache.get("bravo").is_none());
    assert!(cache.get("charlie").is_some());
    assert!(cache.get("delta").is_some());
}

#[tokio::test]
async fn test_expired_entries_leave_before_eviction() {
    let cache = fast_cache(2, EvictionPolicy::Lru);
    cache.shutdown().await;

    cache.set("a", 1, Some(Duration::from_millis(20)));
    cache.set("b", 2, Some(Duration::from_millis(20)));
    cache.set("c", 3, None);
    cache.set("d", 4, None);
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Expiry alone brings the cache back under capacity
    assert_eq!(cache.sweep(), SweepReport { expired: 2, evicted: 0 });
    assert_eq!(cache.get("c"), Some(3));
    assert_eq!(cache.get("d"), Some(4));
}

// == Lifecycle ==

#[tokio::test]
async fn test_shutdown_stops_sweeper() {
    let cache = fast_cache(1, EvictionPolicy::Lru);
    assert!(cache.is_running());

    cache.shutdown().await;
    assert!(!cache.is_running());

    cache.set("a", 1, None);
    cache.set("b", 2, None);
    wait_for_sweep().await;
    assert_eq!(cache.len(), 2, "no sweep should run after shutdown");
}

#[tokio::test]
async fn test_independent_instances() {
    let lru = fast_cache(1, EvictionPolicy::Lru);
    let lfu = fast_cache(1, EvictionPolicy::Lfu);

    lru.set("k", "lru", None);
    lfu.set("k", "lfu", None);
    lru.shutdown().await;

    assert_eq!(lru.get("k"), Some("lru"));
    assert_eq!(lfu.get("k"), Some("lfu"));
    assert!(lfu.is_running());

    lfu.shutdown().await;
}

// == Concurrency ==

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_access_with_running_sweeper() {
    let cache = Arc::new(fast_cache::<usize>(64, EvictionPolicy::Lfu));

    let workers: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..500 {
                    let key = format!("key{}", (t * 31 + i) % 128);
                    cache.set(key.clone(), i, None);
                    if let Some(value) = cache.get(&key) {
                        assert!(value < 500);
                    }
                    if i % 7 == 0 {
                        cache.delete(&key);
                    }
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    wait_for_sweep().await;
    assert!(cache.len() <= 64);

    cache.shutdown().await;
}
