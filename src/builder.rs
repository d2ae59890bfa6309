//! Cache Service Builder
//!
//! Construction seam for [`CacheService`]: pick a remote address, inject a
//! custom remote tier, bound remote round-trips, or force memory-only mode.
//!
//! `build()` never fails. A remote tier that cannot be reached is logged
//! and skipped, leaving the service in memory-only mode for the process
//! lifetime - exactly the degradation the service promises its callers.
//!
//! # Example
//!
//! ```rust,no_run
//! use dual_tier_cache::CacheServiceBuilder;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache = CacheServiceBuilder::new()
//!         .remote_url("redis://localhost:6379")
//!         .op_timeout(Duration::from_millis(500))
//!         .build()
//!         .await;
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::backends::{MemoryTier, RedisTier, DEFAULT_OP_TIMEOUT};
use crate::service::CacheService;
use crate::traits::CacheTier;

/// Builder for [`CacheService`]
///
/// With no configuration, `build()` reads `REDIS_URL` from the environment;
/// when the variable is absent the service runs memory-only from the start.
pub struct CacheServiceBuilder {
    remote_url: Option<String>,
    remote_tier: Option<Arc<dyn CacheTier>>,
    op_timeout: Duration,
    memory_only: bool,
}

impl CacheServiceBuilder {
    /// Create a builder with no remote configured
    #[must_use]
    pub fn new() -> Self {
        Self {
            remote_url: None,
            remote_tier: None,
            op_timeout: DEFAULT_OP_TIMEOUT,
            memory_only: false,
        }
    }

    /// Set the remote cache address (e.g. `redis://localhost:6379`)
    #[must_use]
    pub fn remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = Some(url.into());
        self
    }

    /// Inject a custom remote tier instead of connecting to Redis
    ///
    /// Takes precedence over [`remote_url`](Self::remote_url).
    #[must_use]
    pub fn remote(mut self, tier: Arc<dyn CacheTier>) -> Self {
        self.remote_tier = Some(tier);
        self
    }

    /// Bound each remote round-trip by this timeout
    ///
    /// A timed-out call is treated like any other remote fault: logged,
    /// fallen back, retried on the next call.
    #[must_use]
    pub fn op_timeout(mut self, timeout: Duration) -> Self {
        self.op_timeout = timeout;
        self
    }

    /// Skip the remote tier entirely, whatever is configured
    #[must_use]
    pub fn memory_only(mut self) -> Self {
        self.memory_only = true;
        self
    }

    /// Build the cache service; never fails
    pub async fn build(self) -> CacheService {
        let memory = Arc::new(MemoryTier::new());

        if self.memory_only {
            info!("Cache service running memory-only (remote tier disabled)");
            return CacheService::from_parts(None, memory);
        }

        if let Some(tier) = self.remote_tier {
            info!(tier = tier.name(), "Cache service using injected remote tier");
            return CacheService::from_parts(Some(tier), memory);
        }

        let url = self.remote_url.or_else(|| std::env::var("REDIS_URL").ok());
        let remote: Option<Arc<dyn CacheTier>> = match url {
            None => {
                info!("No remote cache address configured, running memory-only");
                None
            }
            Some(url) => match RedisTier::connect(&url, self.op_timeout).await {
                Ok(tier) => Some(Arc::new(tier)),
                Err(e) => {
                    warn!(error = %e, "Remote cache unreachable, degrading to memory-only mode");
                    None
                }
            },
        };

        CacheService::from_parts(remote, memory)
    }
}

impl Default for CacheServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
