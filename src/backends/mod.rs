//! Storage Tier Implementations
//!
//! # Built-in tiers
//!
//! - **Memory** - in-process `DashMap` store with lazy TTL expiry; always
//!   present, sole tier in memory-only mode
//! - **Redis** - shared remote cache; activated only when configuration
//!   and connectivity succeed at startup
//!
//! Custom tiers plug in through [`CacheTier`](crate::CacheTier) and the
//! service builder.

pub mod memory;
pub mod redis;

pub use memory::MemoryTier;
pub use redis::{RedisTier, DEFAULT_OP_TIMEOUT};
