use crate::{ConfigError, ConfigErrorResult};

use std::collections::HashMap;

use serde::Deserialize;

pub const MAX_HOURLY_RATE: f64 = 100_000.0;
pub const MAX_ROUNDING_INCREMENT_HOURS: f64 = 1.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    pub default_hourly_rate: f64,
    /// Hourly rate overrides keyed by work type
    pub work_type_rates: HashMap<String, f64>,
    /// Billed hours are rounded to the nearest multiple of this; 0 disables rounding
    pub rounding_increment_hours: f64,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            default_hourly_rate: 100.0,
            work_type_rates: HashMap::new(),
            rounding_increment_hours: 0.25,
        }
    }
}

impl BillingConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        Self::validate_rate("billing.default_hourly_rate", self.default_hourly_rate)?;

        for (work_type, rate) in &self.work_type_rates {
            Self::validate_rate(&format!("billing.work_type_rates.{}", work_type), *rate)?;
        }

        if !self.rounding_increment_hours.is_finite()
            || self.rounding_increment_hours < 0.0
            || self.rounding_increment_hours > MAX_ROUNDING_INCREMENT_HOURS
        {
            return Err(ConfigError::billing(format!(
                "billing.rounding_increment_hours must be 0-{}, got {}",
                MAX_ROUNDING_INCREMENT_HOURS, self.rounding_increment_hours
            )));
        }

        Ok(())
    }

    /// Hourly rate for a work type, falling back to the default rate.
    pub fn hourly_rate_for(&self, work_type: &str) -> f64 {
        self.work_type_rates
            .get(work_type)
            .copied()
            .unwrap_or(self.default_hourly_rate)
    }

    fn validate_rate(field: &str, rate: f64) -> ConfigErrorResult<()> {
        if !rate.is_finite() || !(0.0..=MAX_HOURLY_RATE).contains(&rate) {
            return Err(ConfigError::billing(format!(
                "{} must be 0-{}, got {}",
                field, MAX_HOURLY_RATE, rate
            )));
        }
        Ok(())
    }
}
