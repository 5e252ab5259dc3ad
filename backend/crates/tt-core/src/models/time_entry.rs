use crate::{
    BillingFigures, CoreError, CoreResult, EntryStatus, EntryType, RateBadge, TimerState,
    elapsed_seconds,
};

use std::panic::Location;

use chrono::{DateTime, NaiveDate, Utc};
use error_location::ErrorLocation;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_WORK_TYPE: &str = "general_support";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeEntry {
    pub id: Uuid,
    pub company_id: Uuid,
    pub ticket_id: Uuid,
    pub user_id: Uuid,

    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub work_date: NaiveDate,
    pub paused_duration_seconds: i64,
    pub paused: bool,
    pub paused_at: Option<DateTime<Utc>>,
    pub pause_reason: Option<String>,

    pub entry_type: EntryType,
    pub work_type: String,
    pub description: Option<String>,
    pub billable: bool,

    // Billing
    pub hourly_rate: Decimal,
    pub rate_multiplier: Decimal,
    pub rate_label: String,
    pub hours_worked: Option<Decimal>,
    pub hours_billed: Option<Decimal>,
    pub amount: Option<Decimal>,

    pub status: EntryStatus,
    pub allow_concurrent: bool,
    /// Row version as last read from or written to storage.
    #[serde(default)]
    pub version: i64,

    // Audit
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeEntry {
    /// A fresh running timer. Billing fields stay empty until the timer is stopped.
    pub fn start_timer(
        company_id: Uuid,
        ticket_id: Uuid,
        user_id: Uuid,
        started_at: DateTime<Utc>,
        rate: &RateBadge,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            ticket_id,
            user_id,
            started_at,
            ended_at: None,
            work_date: started_at.date_naive(),
            paused_duration_seconds: 0,
            paused: false,
            paused_at: None,
            pause_reason: None,
            entry_type: EntryType::Timer,
            work_type: DEFAULT_WORK_TYPE.to_string(),
            description: None,
            billable: true,
            hourly_rate: Decimal::ZERO,
            rate_multiplier: rate.multiplier,
            rate_label: rate.label.clone(),
            hours_worked: None,
            hours_billed: None,
            amount: None,
            status: EntryStatus::Draft,
            allow_concurrent: false,
            version: 0,
            created_at: started_at,
            updated_at: started_at,
        }
    }

    /// A finished entry recorded after the fact. Billing is filled in by the
    /// caller once the rate is known.
    #[allow(clippy::too_many_arguments)]
    pub fn record_manual(
        company_id: Uuid,
        ticket_id: Uuid,
        user_id: Uuid,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        paused_seconds: i64,
        rate: &RateBadge,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            ended_at: Some(ended_at.max(started_at)),
            paused_duration_seconds: paused_seconds.max(0),
            entry_type: EntryType::Manual,
            status: EntryStatus::Submitted,
            created_at: recorded_at,
            updated_at: recorded_at,
            ..Self::start_timer(company_id, ticket_id, user_id, started_at, rate)
        }
    }

    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    pub fn is_open_timer(&self) -> bool {
        self.entry_type == EntryType::Timer && self.is_open()
    }

    pub fn state(&self) -> TimerState {
        if self.ended_at.is_some() {
            TimerState::Stopped
        } else if self.paused {
            TimerState::Paused
        } else {
            TimerState::Running
        }
    }

    /// Paused seconds as of `now`, counting a pause that is still in progress.
    pub fn paused_seconds_at(&self, now: DateTime<Utc>) -> i64 {
        let in_progress = match (self.paused, self.paused_at) {
            (true, Some(paused_at)) => (now - paused_at).num_seconds().max(0),
            _ => 0,
        };
        self.paused_duration_seconds.max(0) + in_progress
    }

    /// Net working seconds as of `now` (or as of `ended_at` once stopped).
    pub fn elapsed_seconds_at(&self, now: DateTime<Utc>) -> i64 {
        let until = self.ended_at.unwrap_or(now);
        elapsed_seconds(self.started_at, until, self.paused_seconds_at(until))
    }

    #[track_caller]
    pub fn pause(&mut self, now: DateTime<Utc>, reason: &str) -> CoreResult<()> {
        if self.state() != TimerState::Running {
            return Err(self.invalid_transition("pause"));
        }

        self.paused = true;
        self.paused_at = Some(now);
        self.pause_reason = Some(reason.to_string());
        self.updated_at = now;
        Ok(())
    }

    #[track_caller]
    pub fn resume(&mut self, now: DateTime<Utc>) -> CoreResult<()> {
        if self.state() != TimerState::Paused {
            return Err(self.invalid_transition("resume"));
        }

        self.paused_duration_seconds = self.paused_seconds_at(now);
        self.paused = false;
        self.paused_at = None;
        self.updated_at = now;
        Ok(())
    }

    /// Close the entry. An in-progress pause is folded into the paused total
    /// and `ended_at` never precedes `started_at`.
    #[track_caller]
    pub fn close(&mut self, now: DateTime<Utc>) -> CoreResult<()> {
        if self.state() == TimerState::Stopped {
            return Err(self.invalid_transition("stop"));
        }

        let ended_at = now.max(self.started_at);
        self.paused_duration_seconds = self.paused_seconds_at(ended_at);
        self.paused = false;
        self.paused_at = None;
        self.ended_at = Some(ended_at);
        self.updated_at = now;
        Ok(())
    }

    pub fn apply_rate(&mut self, hourly_rate: Decimal, rate: &RateBadge) {
        self.hourly_rate = hourly_rate;
        self.rate_multiplier = rate.multiplier;
        self.rate_label = rate.label.clone();
    }

    pub fn apply_billing(&mut self, figures: &BillingFigures) {
        self.hours_worked = Some(figures.hours_worked);
        self.hours_billed = Some(figures.hours_billed);
        self.amount = Some(figures.amount);
    }

    #[track_caller]
    fn invalid_transition(&self, action: &'static str) -> CoreError {
        CoreError::InvalidTransition {
            entry_id: self.id,
            state: self.state(),
            action,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
