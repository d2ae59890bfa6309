//! Tag Invalidation Demo
//!
//! Registers related keys under a tag and drops the whole group at once,
//! the way a write path invalidates every listing page that embeds the
//! changed record.
//!
//! Run with: cargo run --example tag_invalidation

use dual_tier_cache::{CacheService, Ttl};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("=== Dual-Tier Cache: Tag Invalidation ===\n");

    let cache = CacheService::new().await;

    // Cache a post and the listing pages that embed it, all tagged "posts"
    let post = serde_json::json!({"id": 7, "title": "Cache invalidation", "author": "Ann"});
    cache
        .set_with_tags("post:7", &post, &["posts"], Ttl::Long)
        .await;

    for page in 1..=3 {
        let listing = serde_json::json!({"page": page, "post_ids": [7]});
        cache
            .set_with_tags(&format!("posts:page:{page}"), &listing, &["posts"], Ttl::Medium)
            .await;
    }

    println!("Cached post:7 and three listing pages under tag 'posts'");
    if let Some(members) = cache.get::<Vec<String>>("tag:posts").await {
        println!("Tag index now lists: {members:?}");
    }

    // The post changes: drop everything that embeds it in one call
    println!("\nInvalidating tag 'posts'...");
    cache.invalidate_tag("posts").await;

    let post_after: Option<serde_json::Value> = cache.get("post:7").await;
    let page_after: Option<serde_json::Value> = cache.get("posts:page:1").await;
    println!("post:7 after invalidation:        {post_after:?}");
    println!("posts:page:1 after invalidation:  {page_after:?}");

    // Settings cached under a different tag were untouched
    cache
        .set_with_tags("settings:global", &serde_json::json!({"theme": "dark"}), &["settings"], Ttl::Week)
        .await;
    cache.invalidate_tag("posts").await; // no-op, the tag is gone
    let settings: Option<serde_json::Value> = cache.get("settings:global").await;
    println!("settings:global survives:         {settings:?}");

    Ok(())
}
