//! Time-to-live presets
//!
//! Named TTL tiers for the common caching horizons, plus an escape hatch
//! for arbitrary durations.

use std::time::Duration;

/// Default TTL applied when a caller does not pick one: one hour.
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// TTL presets for different data volatility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// Rapidly changing data - 60 seconds
    Short,
    /// Listing pages, derived aggregates - 5 minutes
    Medium,
    /// Mostly static records - 1 hour
    Long,
    /// Daily rollups - 24 hours
    Day,
    /// Rarely touched settings - 7 days
    Week,
    /// Arbitrary TTL
    Custom(Duration),
    /// Default horizon (1 hour)
    Default,
}

impl Ttl {
    /// Convert preset to a concrete duration
    #[must_use]
    pub fn to_duration(self) -> Duration {
        match self {
            Self::Short => Duration::from_secs(60),
            Self::Medium => Duration::from_secs(300),
            Self::Long | Self::Default => Duration::from_secs(DEFAULT_TTL_SECS),
            Self::Day => Duration::from_secs(86_400),
            Self::Week => Duration::from_secs(604_800),
            Self::Custom(duration) => duration,
        }
    }
}

impl Default for Ttl {
    fn default() -> Self {
        Self::Default
    }
}

impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        Self::Custom(duration)
    }
}
