//! Basic Usage Demo
//!
//! Demonstrates the core cache operations: set, get, cache-aside, stats.
//! Runs memory-only unless REDIS_URL points at a reachable Redis.
//!
//! Run with: cargo run --example basic_usage

use dual_tier_cache::{CacheService, Ttl};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
    email: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("=== Dual-Tier Cache: Basic Usage ===\n");

    // 1. Initialize (REDIS_URL absent or unreachable -> memory-only mode)
    let cache = CacheService::new().await;

    // 2. Store a record
    let user = User {
        id: 42,
        name: "Ann".into(),
        email: "ann@example.com".into(),
    };
    cache.set("user:42", &user, Ttl::Medium).await;
    println!("Stored user:42 with a 5 minute TTL");

    // 3. Read it back
    if let Some(cached) = cache.get::<User>("user:42").await {
        println!("Retrieved from cache: {cached:?}");
    }

    // 4. Cache-aside: the producer runs only on a miss
    let page: Vec<String> = cache
        .get_or_set("posts:page:1", Ttl::Short, || async {
            println!("(producer running - simulating an expensive query)");
            Ok(vec!["post:7".to_string(), "post:9".to_string()])
        })
        .await?;
    println!("First page of posts: {page:?}");

    let page_again: Vec<String> = cache
        .get_or_set("posts:page:1", Ttl::Short, || async {
            unreachable!("warm key, producer skipped")
        })
        .await?;
    println!("Second read served from cache: {page_again:?}");

    // 5. Statistics
    let stats = cache.stats();
    println!("\n=== Cache Statistics ===");
    println!("Remote connected: {}", stats.remote_connected);
    println!("Memory entries:   {}", stats.memory_entries);
    println!("Requests:         {}", stats.requests);
    println!("Remote hits:      {}", stats.remote_hits);
    println!("Memory hits:      {}", stats.memory_hits);
    println!("Misses:           {}", stats.misses);
    println!("Hit rate:         {:.2}%", stats.hit_rate);

    Ok(())
}
