use crate::{EngineError, ManualEntry, Result as EngineResult, StopSettings};

use tt_config::{MAX_PAUSE_REASON_LENGTH, TimerConfig};

use chrono::{DateTime, Utc};

/// Input checks that run before anything is written.
#[derive(Debug, Clone)]
pub struct TimerValidator {
    min_description_length: usize,
    max_description_length: usize,
    work_types: Vec<String>,
}

impl TimerValidator {
    pub fn new(
        min_description_length: usize,
        max_description_length: usize,
        work_types: Vec<String>,
    ) -> Self {
        Self {
            min_description_length,
            max_description_length,
            work_types,
        }
    }

    pub fn from_config(config: &TimerConfig) -> Self {
        Self::new(
            config.min_description_length,
            config.max_description_length,
            config.work_types.clone(),
        )
    }

    /// Returns the trimmed description.
    #[track_caller]
    pub fn validate_description(&self, description: &str) -> EngineResult<String> {
        let trimmed = description.trim();
        let length = trimmed.chars().count();

        if length < self.min_description_length {
            return Err(EngineError::validation(
                "description",
                format!(
                    "description must be at least {} characters",
                    self.min_description_length
                ),
            ));
        }

        if length > self.max_description_length {
            return Err(EngineError::validation(
                "description",
                format!(
                    "description must not exceed {} characters",
                    self.max_description_length
                ),
            ));
        }

        Ok(trimmed.to_string())
    }

    /// A description given while a timer is still running only has an upper
    /// bound. Blank input is treated as absent.
    #[track_caller]
    pub fn validate_draft_description(
        &self,
        description: Option<&str>,
    ) -> EngineResult<Option<String>> {
        let Some(trimmed) = description.map(str::trim).filter(|d| !d.is_empty()) else {
            return Ok(None);
        };

        if trimmed.chars().count() > self.max_description_length {
            return Err(EngineError::validation(
                "description",
                format!(
                    "description must not exceed {} characters",
                    self.max_description_length
                ),
            ));
        }

        Ok(Some(trimmed.to_string()))
    }

    #[track_caller]
    pub fn validate_work_type(&self, work_type: &str) -> EngineResult<()> {
        if self.work_types.iter().any(|w| w == work_type) {
            Ok(())
        } else {
            Err(EngineError::validation(
                "work_type",
                format!("unknown work type: {}", work_type),
            ))
        }
    }

    /// Returns the trimmed reason.
    #[track_caller]
    pub fn validate_pause_reason(&self, reason: &str) -> EngineResult<String> {
        let trimmed = reason.trim();

        if trimmed.is_empty() {
            return Err(EngineError::validation(
                "reason",
                "a reason is required to pause a timer",
            ));
        }

        if trimmed.chars().count() > MAX_PAUSE_REASON_LENGTH {
            return Err(EngineError::validation(
                "reason",
                format!("reason must not exceed {} characters", MAX_PAUSE_REASON_LENGTH),
            ));
        }

        Ok(trimmed.to_string())
    }

    /// Returns a copy with the description trimmed.
    #[track_caller]
    pub fn validate_stop(&self, settings: &StopSettings) -> EngineResult<StopSettings> {
        let description = self.validate_description(&settings.description)?;
        self.validate_work_type(&settings.work_type)?;

        Ok(StopSettings {
            description,
            ..settings.clone()
        })
    }

    #[track_caller]
    pub fn validate_manual(&self, entry: &ManualEntry, now: DateTime<Utc>) -> EngineResult<ManualEntry> {
        if entry.ended_at < entry.started_at {
            return Err(EngineError::validation(
                "ended_at",
                "end time must not be before start time",
            ));
        }

        if entry.ended_at > now {
            return Err(EngineError::validation(
                "ended_at",
                "manual entries cannot end in the future",
            ));
        }

        let span = (entry.ended_at - entry.started_at).num_seconds();
        if entry.paused_seconds < 0 || entry.paused_seconds > span {
            return Err(EngineError::validation(
                "paused_seconds",
                format!("paused time must be between 0 and {} seconds", span),
            ));
        }

        let description = self.validate_description(&entry.description)?;
        self.validate_work_type(&entry.work_type)?;

        Ok(ManualEntry {
            description,
            ..entry.clone()
        })
    }
}
