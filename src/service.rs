//! Cache Service - Tier Selection and Public Surface
//!
//! All cache access goes through [`CacheService`]: the remote tier is
//! attempted first when one was activated at startup, and any remote
//! fault falls back to the in-process memory tier for that single call.
//! Callers get a best-effort value, never a storage error; only producer
//! failures from [`get_or_set`](CacheService::get_or_set) propagate.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::backends::MemoryTier;
use crate::builder::CacheServiceBuilder;
use crate::traits::CacheTier;
use crate::ttl::Ttl;

/// Reserved key namespace for tag index entries
const TAG_PREFIX: &str = "tag:";

fn tag_key(tag: &str) -> String {
    format!("{TAG_PREFIX}{tag}")
}

/// Dual-tier cache service
///
/// Constructed once at process start and shared by reference (or `Arc`)
/// with every consumer. There is no teardown beyond dropping the service;
/// the remote connection closes with it.
///
/// # Tier selection
///
/// - **get**: remote first (a remote fault logs and falls back, a clean
///   remote miss still consults memory), then memory with lazy expiry.
/// - **set**: a successful remote write ends the operation; memory is the
///   fallback store, not a write-through mirror.
/// - **delete/clear**: best-effort on both tiers.
pub struct CacheService {
    /// Remote tier, `None` in memory-only mode
    remote: Option<Arc<dyn CacheTier>>,
    /// In-process fallback tier, always present
    memory: Arc<MemoryTier>,
    requests: AtomicU64,
    remote_hits: AtomicU64,
    memory_hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheService {
    /// Create a cache service configured from the environment
    ///
    /// Reads `REDIS_URL`; when the variable is absent or the address is
    /// unreachable the service runs memory-only. Never fails.
    pub async fn new() -> Self {
        CacheServiceBuilder::new().build().await
    }

    /// Create a cache service with an explicit remote address
    ///
    /// An unreachable address degrades to memory-only mode, logged as an
    /// informational notice rather than raised.
    pub async fn with_remote_url(redis_url: &str) -> Self {
        CacheServiceBuilder::new().remote_url(redis_url).build().await
    }

    /// Create a memory-only cache service
    #[must_use]
    pub fn memory_only() -> Self {
        Self::from_parts(None, Arc::new(MemoryTier::new()))
    }

    pub(crate) fn from_parts(remote: Option<Arc<dyn CacheTier>>, memory: Arc<MemoryTier>) -> Self {
        Self {
            remote,
            memory,
            requests: AtomicU64::new(0),
            remote_hits: AtomicU64::new(0),
            memory_hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Get a typed value from the cache
    ///
    /// Returns `None` on a miss: key absent in both tiers, entry expired,
    /// remote tier unreachable with no memory fallback entry, or the
    /// cached value no longer deserializing as `T`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_raw(key).await?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                warn!(key = %key, error = %e, "Cached value does not match requested type, treating as miss");
                None
            }
        }
    }

    /// Store a typed value with the given TTL
    ///
    /// The write path never raises: remote faults fall back to memory, and
    /// a value that cannot be encoded as JSON is dropped with a warning.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Ttl) {
        match serde_json::to_value(value) {
            Ok(json) => self.set_raw(key, json, ttl.to_duration()).await,
            Err(e) => {
                warn!(key = %key, error = %e, "Value is not JSON-representable, dropping write");
            }
        }
    }

    /// Remove a key from both tiers
    ///
    /// Absence of the key is not an error. The memory tier is always
    /// consulted because an entry written during a remote blip lives there.
    pub async fn delete(&self, key: &str) {
        if let Some(remote) = &self.remote {
            if let Err(e) = remote.remove(key).await {
                warn!(key = %key, tier = remote.name(), error = %e, "Remote delete failed");
            }
        }
        let _ = self.memory.remove(key).await;
    }

    /// Drop every cached entry
    ///
    /// Blunt whole-namespace operation: the memory map is emptied and, if
    /// the remote tier is active, a full flush is issued there. Unrelated
    /// cached data is collateral.
    pub async fn clear(&self) {
        if let Some(remote) = &self.remote {
            match remote.clear().await {
                Ok(()) => debug!(tier = remote.name(), "Flushed remote tier"),
                Err(e) => warn!(tier = remote.name(), error = %e, "Remote flush failed"),
            }
        }
        let _ = self.memory.clear().await;
    }

    /// Get a value, or compute and cache it on a miss (cache-aside)
    ///
    /// On a hit the producer is never invoked. On a miss the producer runs,
    /// its result is stored (store faults absorbed by tier fallback) and
    /// returned. Producer errors propagate unchanged and nothing is cached.
    ///
    /// Concurrent misses on the same key are NOT coalesced; two racing
    /// callers may both invoke the producer, last write wins.
    ///
    /// # Errors
    ///
    /// Returns an error only when the producer itself fails.
    pub async fn get_or_set<T, F, Fut>(&self, key: &str, ttl: Ttl, producer: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        if let Some(cached) = self.get::<T>(key).await {
            return Ok(cached);
        }

        debug!(key = %key, "Cache miss, invoking producer");
        let produced = producer().await?;
        self.set(key, &produced, ttl).await;
        Ok(produced)
    }

    /// Store a value and register it under the given tags
    ///
    /// Each tag's key list lives at `tag:<name>` as an ordinary cache entry
    /// sharing this write's TTL, so the index expires with its members.
    /// Lists are appended without deduplication or pruning of stale keys.
    pub async fn set_with_tags<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        tags: &[&str],
        ttl: Ttl,
    ) {
        self.set(key, value, ttl).await;

        for tag in tags {
            let tag_entry = tag_key(tag);
            let mut keys: Vec<String> = self.get(&tag_entry).await.unwrap_or_default();
            keys.push(key.to_string());
            self.set(&tag_entry, &keys, ttl).await;
        }
    }

    /// Delete every key registered under a tag, then the tag itself
    ///
    /// Keys that already expired or were deleted are silently skipped
    /// (delete is idempotent). Cost is linear in the number of keys ever
    /// associated with the tag. An unknown tag is a no-op.
    pub async fn invalidate_tag(&self, tag: &str) {
        let tag_entry = tag_key(tag);
        let keys: Vec<String> = self.get(&tag_entry).await.unwrap_or_default();
        debug!(tag = %tag, keys = keys.len(), "Invalidating tag");

        for key in &keys {
            self.delete(key).await;
        }
        self.delete(&tag_entry).await;
    }

    /// Snapshot of cache statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let requests = self.requests.load(Ordering::Relaxed);
        let remote_hits = self.remote_hits.load(Ordering::Relaxed);
        let memory_hits = self.memory_hits.load(Ordering::Relaxed);

        CacheStats {
            memory_entries: self.memory.len(),
            remote_connected: self.remote.is_some(),
            requests,
            remote_hits,
            memory_hits,
            misses: self.misses.load(Ordering::Relaxed),
            hit_rate: if requests > 0 {
                ((remote_hits + memory_hits) as f64 / requests as f64) * 100.0
            } else {
                0.0
            },
        }
    }

    /// Probe both tiers
    ///
    /// Returns `true` if the memory tier works; a remote failure is
    /// tolerated (graceful degradation) but logged.
    pub async fn health_check(&self) -> bool {
        let memory_ok = self.memory.health_check().await;
        let remote_ok = match &self.remote {
            Some(remote) => remote.health_check().await,
            None => true,
        };

        if memory_ok && remote_ok {
            true
        } else {
            warn!(memory_ok = %memory_ok, remote_ok = %remote_ok, "Cache health check - partial failure");
            memory_ok
        }
    }

    // ===== Tier selection internals =====

    async fn get_raw(&self, key: &str) -> Option<serde_json::Value> {
        self.requests.fetch_add(1, Ordering::Relaxed);

        if let Some(remote) = &self.remote {
            match remote.get(key).await {
                Ok(Some(value)) => {
                    self.remote_hits.fetch_add(1, Ordering::Relaxed);
                    return Some(value);
                }
                // A clean remote miss still consults memory: the entry may
                // have been written there during a remote blip.
                Ok(None) => {}
                Err(e) => {
                    warn!(key = %key, tier = remote.name(), error = %e, "Remote read failed, falling back to memory tier");
                }
            }
        }

        match self.memory.get(key).await {
            Ok(Some(value)) => {
                self.memory_hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    async fn set_raw(&self, key: &str, value: serde_json::Value, ttl: Duration) {
        if let Some(remote) = &self.remote {
            match remote.set_with_ttl(key, value.clone(), ttl).await {
                Ok(()) => {
                    // A successful remote write ends the operation
                    debug!(key = %key, tier = remote.name(), ttl_secs = %ttl.as_secs(), "Cached key in remote tier");
                    return;
                }
                Err(e) => {
                    warn!(key = %key, tier = remote.name(), error = %e, "Remote write failed, storing in memory tier");
                }
            }
        }

        if let Err(e) = self.memory.set_with_ttl(key, value, ttl).await {
            warn!(key = %key, error = %e, "Memory write failed, value will not be cached");
        }
    }
}

/// Cache service statistics
///
/// `memory_entries` counts expired-but-unread entries too; they are only
/// reclaimed on read. `remote_connected` reports whether the remote tier
/// was activated at startup, not a live probe.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub memory_entries: usize,
    pub remote_connected: bool,
    pub requests: u64,
    pub remote_hits: u64,
    pub memory_hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}
