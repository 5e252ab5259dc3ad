use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the technician confirms when finishing a timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopSettings {
    pub description: String,
    pub work_type: String,
    pub billable: bool,
    /// Leave an internal note on the ticket summarising the logged time.
    pub add_comment: bool,
}

/// How to proceed when the user already has an open timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictResolution {
    /// Stop every open timer with these settings, then start the new one.
    Switch(StopSettings),
    /// Keep the existing timers running alongside the new one.
    Both,
    /// Change nothing and report the conflict.
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartOptions {
    pub work_type: Option<String>,
    pub description: Option<String>,
    pub billable: bool,
    pub on_conflict: Option<ConflictResolution>,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self {
            work_type: None,
            description: None,
            billable: true,
            on_conflict: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStopSettings {
    Uniform(StopSettings),
    PerTimer(HashMap<Uuid, StopSettings>),
}

impl BatchStopSettings {
    pub fn settings_for(&self, timer_id: Uuid) -> Option<&StopSettings> {
        match self {
            Self::Uniform(settings) => Some(settings),
            Self::PerTimer(by_timer) => by_timer.get(&timer_id),
        }
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = &StopSettings> + '_> {
        match self {
            Self::Uniform(settings) => Box::new(std::iter::once(settings)),
            Self::PerTimer(by_timer) => Box::new(by_timer.values()),
        }
    }
}

/// Time recorded after the fact instead of with a live timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualEntry {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub paused_seconds: i64,
    pub work_type: String,
    pub description: String,
    pub billable: bool,
}

/// Fields of a closed entry that may still be corrected. `None` keeps the
/// stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryCorrection {
    pub description: Option<String>,
    pub work_type: Option<String>,
    pub billable: Option<bool>,
}

impl EntryCorrection {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.work_type.is_none() && self.billable.is_none()
    }
}
