use crate::{ConfigError, ConfigErrorResult};

use std::collections::HashSet;

use chrono::{FixedOffset, NaiveDate, NaiveTime, Weekday};
use serde::Deserialize;

pub const MIN_UTC_OFFSET_MINUTES: i32 = -14 * 60;
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

const TIME_FORMAT: &str = "%H:%M";

/// Working calendar used for after-hours, weekend and holiday rates.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BusinessHoursConfig {
    /// Start of the business day, `HH:MM` local time
    pub start: String,
    /// End of the business day (exclusive), `HH:MM` local time
    pub end: String,
    /// Offset of local time from UTC in minutes
    pub utc_offset_minutes: i32,
    pub business_days: Vec<Weekday>,
    /// Holiday calendar, `YYYY-MM-DD`
    pub holidays: Vec<NaiveDate>,
}

impl Default for BusinessHoursConfig {
    fn default() -> Self {
        Self {
            start: String::from("08:00"),
            end: String::from("18:00"),
            utc_offset_minutes: 0,
            business_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            holidays: Vec::new(),
        }
    }
}

impl BusinessHoursConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let start = self.start_time()?;
        let end = self.end_time()?;

        if start == end {
            return Err(ConfigError::business_hours(format!(
                "business_hours.start and business_hours.end must differ, got {}",
                self.start
            )));
        }

        if !(MIN_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&self.utc_offset_minutes) {
            return Err(ConfigError::business_hours(format!(
                "business_hours.utc_offset_minutes must be {}-{}, got {}",
                MIN_UTC_OFFSET_MINUTES, MAX_UTC_OFFSET_MINUTES, self.utc_offset_minutes
            )));
        }

        let unique: HashSet<Weekday> = self.business_days.iter().copied().collect();
        if unique.len() != self.business_days.len() {
            return Err(ConfigError::business_hours(
                "business_hours.business_days contains duplicates",
            ));
        }

        Ok(())
    }

    pub fn start_time(&self) -> ConfigErrorResult<NaiveTime> {
        Self::parse_time("business_hours.start", &self.start)
    }

    pub fn end_time(&self) -> ConfigErrorResult<NaiveTime> {
        Self::parse_time("business_hours.end", &self.end)
    }

    pub fn utc_offset(&self) -> ConfigErrorResult<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            ConfigError::business_hours(format!(
                "business_hours.utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            ))
        })
    }

    fn parse_time(field: &str, value: &str) -> ConfigErrorResult<NaiveTime> {
        NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|e| {
            ConfigError::business_hours(format!("{} must be HH:MM, got '{}': {}", field, value, e))
        })
    }
}
