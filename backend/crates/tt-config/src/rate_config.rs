use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_MULTIPLIER: f64 = 1.0;
pub const MAX_MULTIPLIER: f64 = 10.0;

/// Multipliers applied to the base hourly rate. The highest-precedence
/// matching condition wins; multipliers are never combined.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    pub emergency: f64,
    pub holiday: f64,
    pub weekend: f64,
    pub after_hours: f64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            emergency: 2.0,
            holiday: 2.0,
            weekend: 1.5,
            after_hours: 1.5,
        }
    }
}

impl RateConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        for (name, value) in [
            ("emergency", self.emergency),
            ("holiday", self.holiday),
            ("weekend", self.weekend),
            ("after_hours", self.after_hours),
        ] {
            if !value.is_finite() || !(MIN_MULTIPLIER..=MAX_MULTIPLIER).contains(&value) {
                return Err(ConfigError::rate(format!(
                    "rates.{} must be {}-{}, got {}",
                    name, MIN_MULTIPLIER, MAX_MULTIPLIER, value
                )));
            }
        }

        Ok(())
    }
}
