use crate::{Pricing, Result as EngineResult, TimerValidator};

use tt_config::Config;

use std::sync::Arc;
use std::time::Duration;

const SECONDS_PER_HOUR: i64 = 3600;

/// Engine-side view of the configuration, converted once at startup.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub pricing: Arc<Pricing>,
    pub validator: TimerValidator,
    pub default_work_type: String,
    pub comment_on_stop: bool,
    pub overtime_seconds: i64,
    pub cache_ttl: Duration,
    pub channel_capacity: usize,
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> EngineResult<Self> {
        Ok(Self {
            pricing: Arc::new(Pricing::from_config(config)?),
            validator: TimerValidator::from_config(&config.timer),
            default_work_type: config.timer.default_work_type.clone(),
            comment_on_stop: config.timer.comment_on_stop,
            overtime_seconds: i64::from(config.timer.overtime_hours) * SECONDS_PER_HOUR,
            cache_ttl: Duration::from_millis(config.coordinator.cache_ttl_ms),
            channel_capacity: config.coordinator.channel_capacity,
        })
    }
}
