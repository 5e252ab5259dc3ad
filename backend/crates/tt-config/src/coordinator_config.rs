use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_CACHE_TTL_MS: u64 = 100;
pub const MAX_CACHE_TTL_MS: u64 = 60_000;
pub const MIN_CHANNEL_CAPACITY: usize = 1;
pub const MAX_CHANNEL_CAPACITY: usize = 10_000;

/// Cache and event settings for surfaces observing active timers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// How long a cached view of a user's open timers is served without re-reading
    pub cache_ttl_ms: u64,
    /// Buffered invalidation events per user before slow observers lag
    pub channel_capacity: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            cache_ttl_ms: 1000,
            channel_capacity: 64,
        }
    }
}

impl CoordinatorConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !(MIN_CACHE_TTL_MS..=MAX_CACHE_TTL_MS).contains(&self.cache_ttl_ms) {
            return Err(ConfigError::config(format!(
                "coordinator.cache_ttl_ms must be {}-{}, got {}",
                MIN_CACHE_TTL_MS, MAX_CACHE_TTL_MS, self.cache_ttl_ms
            )));
        }

        if !(MIN_CHANNEL_CAPACITY..=MAX_CHANNEL_CAPACITY).contains(&self.channel_capacity) {
            return Err(ConfigError::config(format!(
                "coordinator.channel_capacity must be {}-{}, got {}",
                MIN_CHANNEL_CAPACITY, MAX_CHANNEL_CAPACITY, self.channel_capacity
            )));
        }

        Ok(())
    }
}
