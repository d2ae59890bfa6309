//! Redis Tier - Remote Cache Adapter
//!
//! Wraps the shared Redis cache behind the tier primitives. The connection
//! is attempted once at startup; if it cannot be established the adapter is
//! simply never activated and the service runs memory-only. Per-call errors
//! do not disable the tier: `ConnectionManager` reconnects underneath and
//! the next call tries again.

use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default bound on a single remote round-trip.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(2);

/// Remote tier over Redis with `ConnectionManager` for automatic reconnection
///
/// Values cross the wire as JSON text; the external cache's own expiry
/// policy is authoritative for entries it holds. Every round-trip is
/// bounded by the configured operation timeout, and a timeout is reported
/// as an ordinary tier error.
pub struct RedisTier {
    /// Redis connection manager - handles reconnection automatically
    conn_manager: ConnectionManager,
    /// Upper bound on a single round-trip
    op_timeout: Duration,
}

impl RedisTier {
    /// Connect to Redis at the given address
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created, the connection
    /// cannot be established, or the PING probe fails. Callers treat any
    /// of these as "no remote tier" rather than a startup failure.
    pub async fn connect(redis_url: &str, op_timeout: Duration) -> Result<Self> {
        info!(redis_url = %redis_url, "Connecting remote tier (Redis with ConnectionManager)");

        let client = Client::open(redis_url)
            .with_context(|| format!("Failed to create Redis client with URL: {redis_url}"))?;

        let conn_manager = tokio::time::timeout(op_timeout, ConnectionManager::new(client))
            .await
            .context("Redis connection attempt timed out")?
            .context("Failed to establish Redis connection manager")?;

        // Probe before declaring the tier active
        let mut conn = conn_manager.clone();
        let _: String = tokio::time::timeout(
            op_timeout,
            redis::cmd("PING").query_async(&mut conn),
        )
        .await
        .context("Redis PING probe timed out")?
        .context("Redis PING probe failed")?;

        info!(redis_url = %redis_url, "Remote tier connected (ConnectionManager enabled)");

        Ok(Self {
            conn_manager,
            op_timeout,
        })
    }

    /// Bound a remote round-trip by the operation timeout
    async fn bounded<T, F>(&self, what: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        tokio::time::timeout(self.op_timeout, fut)
            .await
            .with_context(|| format!("Redis {what} timed out"))?
            .with_context(|| format!("Redis {what} failed"))
    }
}

// ===== Trait Implementation =====

use crate::traits::CacheTier;
use async_trait::async_trait;

#[async_trait]
impl CacheTier for RedisTier {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let mut conn = self.conn_manager.clone();
        let raw: Option<String> = self.bounded("GET", conn.get(key)).await?;

        let Some(json_str) = raw else {
            return Ok(None);
        };

        // Only this service writes the namespace, so an unparseable value
        // is corrupt rather than foreign; surface it as a miss.
        match serde_json::from_str(&json_str) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key = %key, error = %e, "[redis] Stored value is not valid JSON, treating as miss");
                Ok(None)
            }
        }
    }

    async fn set_with_ttl(&self, key: &str, value: serde_json::Value, ttl: Duration) -> Result<()> {
        let json_str = serde_json::to_string(&value).context("Failed to encode value as JSON")?;
        let mut conn = self.conn_manager.clone();

        // SET with EX takes whole seconds; sub-second TTLs round up to 1
        let ttl_secs = ttl.as_secs().max(1);
        let () = self
            .bounded("SET", conn.set_ex(key, json_str, ttl_secs))
            .await?;
        debug!(key = %key, ttl_secs = %ttl_secs, "[redis] Cached key with TTL");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let () = self.bounded("DEL", conn.del(key)).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let _: String = self
            .bounded("FLUSHDB", redis::cmd("FLUSHDB").query_async(&mut conn))
            .await?;
        debug!("[redis] Flushed remote tier");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn_manager.clone();
        self.bounded("PING", redis::cmd("PING").query_async::<String>(&mut conn))
            .await
            .is_ok()
    }

    fn name(&self) -> &'static str {
        "Redis"
    }
}
