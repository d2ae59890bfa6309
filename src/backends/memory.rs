//! Memory Tier - In-Process Fallback Store
//!
//! Concurrent in-process store used as the sole tier in memory-only mode
//! and as the safety net while the remote tier is unreachable. Expiry is
//! lazy: entries are purged on the read that finds them stale, never by a
//! background sweeper.

use anyhow::Result;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Cache entry with its absolute expiry
///
/// The TTL is resolved to an `Instant` once, at write time; reads compare
/// against the clock rather than re-basing a stored duration.
#[derive(Debug, Clone)]
struct MemoryEntry {
    value: serde_json::Value,
    expires_at: Instant,
}

impl MemoryEntry {
    fn new(value: serde_json::Value, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// In-process memory tier backed by `DashMap`
///
/// **Limitations**: no eviction policy beyond TTL, and expired-but-unread
/// entries occupy memory until the next read of their key (or an explicit
/// [`purge_expired`](Self::purge_expired) call). Acceptable for
/// request-scoped caching; high-key-churn workloads want something with
/// real eviction.
pub struct MemoryTier {
    /// Concurrent key -> entry map
    map: DashMap<String, MemoryEntry>,
}

impl MemoryTier {
    /// Create new empty memory tier
    #[must_use]
    pub fn new() -> Self {
        info!("Initializing memory tier (in-process, lazy expiry)");
        Self { map: DashMap::new() }
    }

    /// Remove every expired entry right now
    ///
    /// The service never calls this; expiry stays lazy. It exists for
    /// long-lived processes that want to reclaim memory on their own
    /// schedule. Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let mut removed = 0;
        self.map.retain(|_, entry| {
            if entry.is_expired() {
                removed += 1;
                false
            } else {
                true
            }
        });
        if removed > 0 {
            debug!(count = removed, "[memory] Purged expired entries");
        }
        removed
    }

    /// Number of entries currently held, expired-but-unread included
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the tier holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for MemoryTier {
    fn default() -> Self {
        Self::new()
    }
}

// ===== Trait Implementation =====

use crate::traits::CacheTier;
use async_trait::async_trait;

#[async_trait]
impl CacheTier for MemoryTier {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        if let Some(entry) = self.map.get(key) {
            if entry.is_expired() {
                // Purge as part of the read
                drop(entry); // Release read lock
                self.map.remove(key);
                Ok(None)
            } else {
                Ok(Some(entry.value.clone()))
            }
        } else {
            Ok(None)
        }
    }

    async fn set_with_ttl(&self, key: &str, value: serde_json::Value, ttl: Duration) -> Result<()> {
        let entry = MemoryEntry::new(value, ttl);
        self.map.insert(key.to_string(), entry);
        debug!(key = %key, ttl_secs = %ttl.as_secs(), "[memory] Cached key with TTL");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.map.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let count = self.map.len();
        self.map.clear();
        debug!(count = count, "[memory] Cleared all entries");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let test_key = "health_check_memory";
        let test_value = serde_json::json!({"test": true});

        match self
            .set_with_ttl(test_key, test_value.clone(), Duration::from_secs(10))
            .await
        {
            Ok(()) => match self.get(test_key).await {
                Ok(Some(retrieved)) => {
                    let _ = self.remove(test_key).await;
                    retrieved == test_value
                }
                _ => false,
            },
            Err(_) => false,
        }
    }

    fn name(&self) -> &'static str {
        "Memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn expired_entry_is_purged_on_read() {
        let tier = MemoryTier::new();
        tier.set_with_ttl("k", serde_json::json!(1), Duration::from_millis(20))
            .await
            .unwrap();
        assert_eq!(tier.len(), 1);

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(tier.get("k").await.unwrap(), None);
        // The read removed the stale entry
        assert!(tier.is_empty());
    }

    #[tokio::test]
    async fn purge_expired_only_drops_stale_entries() {
        let tier = MemoryTier::new();
        tier.set_with_ttl("stale", serde_json::json!(1), Duration::from_millis(10))
            .await
            .unwrap();
        tier.set_with_ttl("live", serde_json::json!(2), Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(tier.purge_expired(), 1);
        assert_eq!(tier.len(), 1);
        assert_eq!(tier.get("live").await.unwrap(), Some(serde_json::json!(2)));
    }
}
