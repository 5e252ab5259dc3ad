use crate::{StopSettings, TimeEntrySnapshot};

use tt_core::{BillingFigures, RateBadge, TimeEntry};

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Open timers that stood in the way of a start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictInfo {
    pub existing: Vec<TimeEntrySnapshot>,
}

impl ConflictInfo {
    pub fn timer_ids(&self) -> Vec<Uuid> {
        self.existing.iter().map(|s| s.timer_id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StartOutcome {
    Started {
        entry: TimeEntry,
        /// Present when the start went ahead over existing timers.
        conflict: Option<ConflictInfo>,
        /// Timers closed by a switch.
        stopped: Vec<TimeEntry>,
    },
    Cancelled {
        conflict: ConflictInfo,
    },
}

impl StartOutcome {
    pub fn entry(&self) -> Option<&TimeEntry> {
        match self {
            Self::Started { entry, .. } => Some(entry),
            Self::Cancelled { .. } => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Everything a stop dialog needs, computed without touching storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopIntent {
    pub snapshot: TimeEntrySnapshot,
    pub rate: RateBadge,
    pub hourly_rate: Decimal,
    pub preview: BillingFigures,
    pub suggested: StopSettings,
}
