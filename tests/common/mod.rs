//! Common utilities for integration tests
//!
//! Shared test infrastructure: unique key generation, test data fixtures,
//! and a mock remote tier whose failure modes can be toggled so the suite
//! runs without a live Redis.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use dual_tier_cache::{CacheService, CacheServiceBuilder, CacheTier};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Create a test key with unique suffix to avoid collisions between tests
pub fn test_key(name: &str) -> String {
    format!("test_{}_{}", name, rand::random::<u32>())
}

/// Memory-only service, the degraded-mode baseline most tests run against
pub fn setup_memory_only() -> CacheService {
    CacheService::memory_only()
}

/// Service fronted by a healthy mock remote tier
pub async fn setup_with_mock_remote() -> (CacheService, Arc<MockRemoteTier>) {
    let remote = Arc::new(MockRemoteTier::new());
    let service = CacheServiceBuilder::new()
        .remote(remote.clone())
        .build()
        .await;
    (service, remote)
}

/// Service fronted by a remote tier that fails every operation
pub async fn setup_with_failing_remote() -> (CacheService, Arc<MockRemoteTier>) {
    let remote = Arc::new(MockRemoteTier::failing());
    let service = CacheServiceBuilder::new()
        .remote(remote.clone())
        .build()
        .await;
    (service, remote)
}

/// In-memory stand-in for the remote tier
///
/// Stores values without expiry (remote expiry is owned by the external
/// system and is irrelevant to tier-selection tests) and exposes switches
/// to make reads and/or writes fail, mimicking connection errors and
/// timeouts.
pub struct MockRemoteTier {
    store: DashMap<String, serde_json::Value>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MockRemoteTier {
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// A tier where every operation errors, like an unreachable host
    pub fn failing() -> Self {
        let tier = Self::new();
        tier.fail_reads.store(true, Ordering::SeqCst);
        tier.fail_writes.store(true, Ordering::SeqCst);
        tier
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of entries the mock currently holds
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[async_trait]
impl CacheTier for MockRemoteTier {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow!("mock remote read failure"));
        }
        Ok(self.store.get(key).map(|entry| entry.value().clone()))
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: serde_json::Value,
        _ttl: Duration,
    ) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("mock remote write failure"));
        }
        self.store.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("mock remote delete failure"));
        }
        self.store.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("mock remote flush failure"));
        }
        self.store.clear();
        Ok(())
    }

    async fn health_check(&self) -> bool {
        !self.fail_reads.load(Ordering::SeqCst) && !self.fail_writes.load(Ordering::SeqCst)
    }

    fn name(&self) -> &'static str {
        "MockRemote"
    }
}

/// Generate test data of various shapes
pub mod test_data {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub struct User {
        pub id: u64,
        pub name: String,
        pub email: String,
    }

    impl User {
        pub fn new(id: u64) -> Self {
            Self {
                id,
                name: format!("User {id}"),
                email: format!("user{id}@example.com"),
            }
        }
    }

    /// Generate JSON test data
    pub fn json_user(id: u64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": format!("User {id}"),
            "email": format!("user{id}@example.com"),
        })
    }
}
