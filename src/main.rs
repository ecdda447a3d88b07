//! Memo Cache demo
//!
//! Stores a value with a short TTL, reads it back, waits for the sweeper to
//! expire it, and prints the resulting statistics.

use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memo_cache::{Cache, Config, Value};

const DEMO_KEY: &str = "key1";
const DEMO_TTL: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memo_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, policy={}, sweep_interval={}ms",
        config.capacity,
        config.policy,
        config.sweep_interval.as_millis()
    );
    let wait = DEMO_TTL + config.sweep_interval * 2;

    let cache: Cache<Value> = Cache::new(config).context("failed to start cache")?;

    info!("Setting {} = zhangsan with a {:?} TTL", DEMO_KEY, DEMO_TTL);
    cache.set(DEMO_KEY, "zhangsan".into(), Some(DEMO_TTL));
    report(&cache);

    info!("Sleeping {:?}", wait);
    tokio::time::sleep(wait).await;
    report(&cache);

    let stats = serde_json::to_string_pretty(&cache.stats()).context("failed to encode stats")?;
    println!("{stats}");

    cache.shutdown().await;
    Ok(())
}

fn report(cache: &Cache<Value>) {
    match cache.get_string(DEMO_KEY) {
        Some(value) => println!("{DEMO_KEY} = {value}"),
        None => println!("{DEMO_KEY} not found"),
    }
}
