use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerEventKind {
    Started,
    Switched,
    Paused,
    Resumed,
    Stopped,
    BatchStopped,
    Discarded,
    ManualCreated,
    Corrected,
    Deleted,
    StatusChanged,
}

/// Published once per successful mutation, after the transaction commits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerEvent {
    pub kind: TimerEventKind,
    pub user_id: Uuid,
    pub company_id: Uuid,
    /// Entries touched by the mutation.
    pub entry_ids: Vec<Uuid>,
    pub occurred_at: DateTime<Utc>,
}

impl TimerEvent {
    pub fn new(
        kind: TimerEventKind,
        user_id: Uuid,
        company_id: Uuid,
        entry_ids: Vec<Uuid>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            user_id,
            company_id,
            entry_ids,
            occurred_at,
        }
    }
}
