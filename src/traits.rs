//! Storage Tier Trait
//!
//! This module defines the trait abstraction behind which both storage
//! tiers (remote and in-process memory) sit, and which custom tiers can
//! implement to plug into the service.
//!
//! # Fault vs. miss
//!
//! `get` returns `Result<Option<Value>>` rather than a bare `Option`:
//! a clean miss (`Ok(None)`) falls through to the next tier, while a tier
//! fault (`Err`) is logged by the service and triggers fallback for that
//! single call. The distinction is what lets the memory tier act as a
//! safety net during remote blips without masking real misses.
//!
//! # Example: Custom Tier
//!
//! ```rust,ignore
//! use dual_tier_cache::{CacheTier, async_trait};
//! use std::time::Duration;
//! use anyhow::Result;
//!
//! struct MyTier {
//!     // Your implementation
//! }
//!
//! #[async_trait]
//! impl CacheTier for MyTier {
//!     async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
//!         // Your implementation
//!     }
//!
//!     async fn set_with_ttl(&self, key: &str, value: serde_json::Value, ttl: Duration) -> Result<()> {
//!         // Your implementation
//!     }
//!
//!     // ... remove, clear, health_check
//! }
//! ```

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Storage tier abstraction for the dual-tier cache
///
/// Implemented by the built-in tiers (`MemoryTier`, `RedisTier`) and by
/// any custom tier injected through the builder.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; a single tier instance is shared
/// by every concurrent cache user in the process.
#[async_trait]
pub trait CacheTier: Send + Sync {
    /// Get value from this tier by key
    ///
    /// # Returns
    ///
    /// * `Ok(Some(value))` - live entry found
    /// * `Ok(None)` - key absent or expired (clean miss)
    /// * `Err(e)` - the tier itself failed; the caller falls back
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>>;

    /// Store value in this tier with a time-to-live
    ///
    /// The TTL is converted to an absolute expiry at write time; entries
    /// past it are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store rejects the write.
    async fn set_with_ttl(&self, key: &str, value: serde_json::Value, ttl: Duration) -> Result<()>;

    /// Remove value from this tier
    ///
    /// Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the tier itself fails.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Drop every entry held by this tier
    ///
    /// Whole-namespace operation; unrelated entries go with it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the tier itself fails.
    async fn clear(&self) -> Result<()>;

    /// Check that this tier is operational
    ///
    /// For remote tiers this involves a network round-trip.
    async fn health_check(&self) -> bool;

    /// Name of this tier, for logging
    fn name(&self) -> &'static str {
        "unknown"
    }
}
