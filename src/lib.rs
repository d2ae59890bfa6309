//! Dual-Tier Cache
//!
//! A dual-tier key/value caching layer that sits in front of expensive
//! computations and database reads:
//! - **Remote tier**: shared Redis cache for cross-process reuse, optional
//! - **Memory tier**: in-process fallback with lazy TTL expiry, always on
//! - **Cache-aside helper**: `get_or_set` memoizes a producer on miss
//! - **Tag index**: bulk invalidation of logically related keys
//!
//! A cache outage degrades performance (reads recompute), never callers:
//! storage faults are logged and absorbed by tier fallback, and only
//! producer errors from `get_or_set` propagate.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dual_tier_cache::{CacheService, Ttl};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Reads REDIS_URL; absent or unreachable means memory-only mode
//!     let cache = CacheService::new().await;
//!
//!     // Cache-aside: compute once, serve from cache until the TTL lapses
//!     let user: User = cache
//!         .get_or_set("user:42", Ttl::Medium, || async {
//!             Ok(User { id: 42, name: "Ann".into() })
//!         })
//!         .await?;
//!
//!     // Group invalidation via tags
//!     cache.set_with_tags("post:7", &user.name, &["posts"], Ttl::Long).await;
//!     cache.invalidate_tag("posts").await;
//!
//!     let stats = cache.stats();
//!     tracing::info!(remote = stats.remote_connected, entries = stats.memory_entries, "cache ready");
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Caller → CacheService → Remote tier (Redis, optional)
//!                       ↘ fault / miss
//!                         Memory tier (DashMap, lazy expiry)
//! ```
//!
//! Expiration is entirely lazy - no background threads, timers, or
//! sweepers. Concurrent `get_or_set` misses on one key are deliberately
//! not coalesced; this is cache-aside, not singleflight.

pub mod backends;
pub mod builder;
pub mod service;
pub mod traits;
pub mod ttl;

pub use backends::{MemoryTier, RedisTier};
pub use builder::CacheServiceBuilder;
pub use service::{CacheService, CacheStats};
pub use traits::CacheTier;
pub use ttl::{Ttl, DEFAULT_TTL_SECS};

// Re-export async_trait for custom tier implementations
pub use async_trait::async_trait;
