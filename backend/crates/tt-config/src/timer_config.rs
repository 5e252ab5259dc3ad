use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_DESCRIPTION_LENGTH: usize = 1;
pub const MAX_DESCRIPTION_LENGTH: usize = 10000;
pub const DEFAULT_MIN_DESCRIPTION_LENGTH: usize = 5;
pub const DEFAULT_MAX_DESCRIPTION_LENGTH: usize = 5000;

pub const MAX_PAUSE_REASON_LENGTH: usize = 500;

pub const MIN_OVERTIME_HOURS: u32 = 1;
pub const MAX_OVERTIME_HOURS: u32 = 72;
pub const DEFAULT_OVERTIME_HOURS: u32 = 8;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Minimum characters in a stop description
    pub min_description_length: usize,
    pub max_description_length: usize,
    /// Accepted work type classifications
    pub work_types: Vec<String>,
    /// Work type preselected when a timer starts
    pub default_work_type: String,
    /// Elapsed hours after which surfaces flag a timer as overtime
    pub overtime_hours: u32,
    /// Leave an internal note on the ticket when a timer stops, unless the caller says otherwise
    pub comment_on_stop: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            min_description_length: DEFAULT_MIN_DESCRIPTION_LENGTH,
            max_description_length: DEFAULT_MAX_DESCRIPTION_LENGTH,
            work_types: [
                "general_support",
                "remote_support",
                "onsite_support",
                "project_work",
                "maintenance",
                "consulting",
                "emergency",
                "travel",
            ]
            .iter()
            .map(|w| w.to_string())
            .collect(),
            default_work_type: String::from("general_support"),
            overtime_hours: DEFAULT_OVERTIME_HOURS,
            comment_on_stop: true,
        }
    }
}

impl TimerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.min_description_length < MIN_DESCRIPTION_LENGTH
            || self.min_description_length > self.max_description_length
        {
            return Err(ConfigError::timer(format!(
                "timer.min_description_length must be {}-{}, got {}",
                MIN_DESCRIPTION_LENGTH, self.max_description_length, self.min_description_length
            )));
        }

        if self.max_description_length > MAX_DESCRIPTION_LENGTH {
            return Err(ConfigError::timer(format!(
                "timer.max_description_length must be at most {}, got {}",
                MAX_DESCRIPTION_LENGTH, self.max_description_length
            )));
        }

        if self.work_types.is_empty() {
            return Err(ConfigError::timer("timer.work_types cannot be empty"));
        }

        if !self.work_types.contains(&self.default_work_type) {
            return Err(ConfigError::timer(format!(
                "timer.default_work_type '{}' is not listed in timer.work_types",
                self.default_work_type
            )));
        }

        if !(MIN_OVERTIME_HOURS..=MAX_OVERTIME_HOURS).contains(&self.overtime_hours) {
            return Err(ConfigError::timer(format!(
                "timer.overtime_hours must be {}-{}, got {}",
                MIN_OVERTIME_HOURS, MAX_OVERTIME_HOURS, self.overtime_hours
            )));
        }

        Ok(())
    }

    pub fn is_known_work_type(&self, work_type: &str) -> bool {
        self.work_types.iter().any(|w| w == work_type)
    }
}
