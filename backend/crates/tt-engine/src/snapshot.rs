use tt_core::{RateBadge, TimeEntry, TimerState, format_hms, is_overtime};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Read-only view of an open timer at a given instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeEntrySnapshot {
    pub timer_id: Uuid,
    pub ticket_id: Uuid,
    pub user_id: Uuid,
    pub state: TimerState,
    pub started_at: DateTime<Utc>,
    pub paused_at: Option<DateTime<Utc>>,
    pub pause_reason: Option<String>,
    pub elapsed_seconds: i64,
    pub elapsed_display: String,
    pub rate: RateBadge,
    pub overtime: bool,
    pub work_type: String,
    pub description: Option<String>,
    pub billable: bool,
    pub allow_concurrent: bool,
}

impl TimeEntrySnapshot {
    pub fn capture(entry: &TimeEntry, now: DateTime<Utc>, overtime_threshold_seconds: i64) -> Self {
        let elapsed = entry.elapsed_seconds_at(now);

        Self {
            timer_id: entry.id,
            ticket_id: entry.ticket_id,
            user_id: entry.user_id,
            state: entry.state(),
            started_at: entry.started_at,
            paused_at: entry.paused_at,
            pause_reason: entry.pause_reason.clone(),
            elapsed_seconds: elapsed,
            elapsed_display: format_hms(elapsed),
            rate: RateBadge::recorded(&entry.rate_label, entry.rate_multiplier),
            overtime: is_overtime(elapsed, overtime_threshold_seconds),
            work_type: entry.work_type.clone(),
            description: entry.description.clone(),
            billable: entry.billable,
            allow_concurrent: entry.allow_concurrent,
        }
    }
}
