use crate::{EngineError, EntryCorrection, Pricing, Result as EngineResult, StopSettings};

use tt_core::{ActivityLog, EntryStatus, TicketContext, TimeEntry, TIME_ENTRY_ENTITY};
use tt_db::{ActivityLogRepository, DbError, TimeEntryRepository};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

/// One timer to close, with the ticket context its rate is evaluated against.
#[derive(Debug, Clone)]
pub struct StopRequest {
    pub timer_id: Uuid,
    pub settings: StopSettings,
    pub ticket: Option<TicketContext>,
}

/// Durable timer state.
///
/// Entries are read outside of transactions; each mutation then opens a
/// transaction whose first statement is a write, so SQLite takes the write
/// lock up front. Updates compare-and-set on the row version that was read,
/// so a write that lost a race with any other writer becomes `InvalidState`
/// carrying the row's current state instead of an overwrite. Every mutation
/// writes its activity-log rows in the same transaction.
#[derive(Clone)]
pub struct TimerStore {
    pool: SqlitePool,
    pricing: Arc<Pricing>,
}

impl TimerStore {
    pub fn new(pool: SqlitePool, pricing: Arc<Pricing>) -> Self {
        Self { pool, pricing }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn pricing(&self) -> &Pricing {
        &self.pricing
    }

    pub async fn find_entry(&self, entry_id: Uuid) -> EngineResult<Option<TimeEntry>> {
        Ok(TimeEntryRepository::find_by_id(&self.pool, entry_id).await?)
    }

    pub async fn find_open_timers(&self, user_id: Uuid) -> EngineResult<Vec<TimeEntry>> {
        Ok(TimeEntryRepository::find_open_timers(&self.pool, user_id).await?)
    }

    /// The user's oldest open timer.
    pub async fn find_open_timer(&self, user_id: Uuid) -> EngineResult<Option<TimeEntry>> {
        Ok(self.find_open_timers(user_id).await?.into_iter().next())
    }

    pub async fn ticket_entries(&self, ticket_id: Uuid) -> EngineResult<Vec<TimeEntry>> {
        Ok(TimeEntryRepository::find_closed_by_ticket(&self.pool, ticket_id).await?)
    }

    pub async fn history(&self, entry_id: Uuid) -> EngineResult<Vec<ActivityLog>> {
        Ok(ActivityLogRepository::find_by_entity(&self.pool, TIME_ENTRY_ENTITY, entry_id).await?)
    }

    /// Insert a new open timer.
    ///
    /// Fails with `Conflict` when the user already has an open timer, unless
    /// the new entry was created with `allow_concurrent`.
    pub async fn create_timer(&self, entry: &TimeEntry) -> EngineResult<()> {
        debug!("Creating timer {} for user {}", entry.id, entry.user_id);

        let mut tx = self.pool.begin().await?;
        Self::insert_open_timer(&mut tx, entry).await?;
        Self::log(
            &mut tx,
            ActivityLog::time_entry(entry.id, "started", entry.user_id, entry.created_at)
                .with_comment(entry.rate_label.clone()),
        )
        .await?;
        tx.commit().await?;

        info!("Started timer {} on ticket {}", entry.id, entry.ticket_id);
        Ok(())
    }

    /// Close every timer in `closing`, then insert `entry`, atomically.
    pub async fn switch_timer(
        &self,
        actor: Uuid,
        closing: &[StopRequest],
        entry: &TimeEntry,
        now: DateTime<Utc>,
    ) -> EngineResult<Vec<TimeEntry>> {
        let mut closed = self.prepare_stops(actor, closing, now).await?;

        let mut tx = self.pool.begin().await?;
        Self::write_stops(&mut tx, &mut closed, actor, now).await?;
        Self::insert_open_timer(&mut tx, entry).await?;
        Self::log(
            &mut tx,
            ActivityLog::time_entry(entry.id, "started", actor, now)
                .with_comment(entry.rate_label.clone()),
        )
        .await?;
        tx.commit().await?;

        info!(
            "Switched user {} to timer {}, stopped {} timers",
            actor,
            entry.id,
            closed.len()
        );
        Ok(closed)
    }

    pub async fn pause(
        &self,
        actor: Uuid,
        timer_id: Uuid,
        reason: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<TimeEntry> {
        let mut entry = self.load_owned(actor, timer_id).await?;
        entry.pause(now, reason)?;

        let mut tx = self.pool.begin().await?;
        Self::write_open(&mut tx, &mut entry, "pause").await?;
        Self::log(
            &mut tx,
            ActivityLog::time_entry(timer_id, "paused", actor, now).with_comment(reason),
        )
        .await?;
        tx.commit().await?;

        info!("Paused timer {}", timer_id);
        Ok(entry)
    }

    pub async fn resume(
        &self,
        actor: Uuid,
        timer_id: Uuid,
        now: DateTime<Utc>,
    ) -> EngineResult<TimeEntry> {
        let mut entry = self.load_owned(actor, timer_id).await?;
        let paused_before = entry.paused_duration_seconds;
        entry.resume(now)?;

        let mut tx = self.pool.begin().await?;
        Self::write_open(&mut tx, &mut entry, "resume").await?;
        Self::log(
            &mut tx,
            ActivityLog::time_entry(timer_id, "resumed", actor, now).with_change(
                "paused_duration_seconds",
                Some(paused_before.to_string()),
                Some(entry.paused_duration_seconds.to_string()),
            ),
        )
        .await?;
        tx.commit().await?;

        info!(
            "Resumed timer {} ({}s paused in total)",
            timer_id, entry.paused_duration_seconds
        );
        Ok(entry)
    }

    pub async fn stop(
        &self,
        actor: Uuid,
        request: &StopRequest,
        now: DateTime<Utc>,
    ) -> EngineResult<TimeEntry> {
        let mut closed = self
            .prepare_stops(actor, std::slice::from_ref(request), now)
            .await?;

        let mut tx = self.pool.begin().await?;
        Self::write_stops(&mut tx, &mut closed, actor, now).await?;
        tx.commit().await?;

        let entry = closed
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::not_found("Time entry", request.timer_id))?;
        info!(
            "Stopped timer {}: {}h billed at {} ({}x), amount {}",
            entry.id,
            entry.hours_billed.unwrap_or_default(),
            entry.rate_label,
            entry.rate_multiplier,
            entry.amount.unwrap_or_default()
        );
        Ok(entry)
    }

    /// Close all of a user's open timers in one transaction.
    ///
    /// `requests` must cover every open timer; a timer opened after the
    /// requests were built fails the batch with `Conflict`.
    pub async fn stop_all(
        &self,
        actor: Uuid,
        requests: &[StopRequest],
        now: DateTime<Utc>,
    ) -> EngineResult<Vec<TimeEntry>> {
        let mut closed = self.prepare_stops(actor, requests, now).await?;

        let mut tx = self.pool.begin().await?;
        Self::write_stops(&mut tx, &mut closed, actor, now).await?;

        let remaining = TimeEntryRepository::find_open_timers(&mut *tx, actor).await?;
        if !remaining.is_empty() {
            return Err(EngineError::conflict(
                remaining.iter().map(|e| e.id).collect(),
            ));
        }
        tx.commit().await?;

        info!("Stopped {} timers for user {}", closed.len(), actor);
        Ok(closed)
    }

    /// Hard-delete an open timer.
    pub async fn discard(
        &self,
        actor: Uuid,
        timer_id: Uuid,
        now: DateTime<Utc>,
    ) -> EngineResult<TimeEntry> {
        let entry = self.load_owned(actor, timer_id).await?;
        if !entry.is_open_timer() {
            return Err(EngineError::invalid_state(
                timer_id,
                entry.state().as_str(),
                "discard",
            ));
        }

        let mut tx = self.pool.begin().await?;
        if !TimeEntryRepository::delete_open(&mut *tx, timer_id).await? {
            let current = Self::reload(&mut tx, timer_id).await?;
            return Err(EngineError::invalid_state(
                timer_id,
                current.state().as_str(),
                "discard",
            ));
        }
        Self::log(
            &mut tx,
            ActivityLog::time_entry(timer_id, "discarded", actor, now).with_comment(format!(
                "{}s elapsed",
                entry.elapsed_seconds_at(now)
            )),
        )
        .await?;
        tx.commit().await?;

        info!("Discarded timer {}", timer_id);
        Ok(entry)
    }

    /// Insert a closed entry recorded after the fact.
    pub async fn create_manual(&self, entry: &TimeEntry) -> EngineResult<()> {
        let mut tx = self.pool.begin().await?;
        TimeEntryRepository::create(&mut *tx, entry).await?;
        Self::log(
            &mut tx,
            ActivityLog::time_entry(entry.id, "created", entry.user_id, entry.created_at)
                .with_comment("manual entry"),
        )
        .await?;
        tx.commit().await?;

        info!(
            "Recorded manual entry {} on ticket {}: {}h billed",
            entry.id,
            entry.ticket_id,
            entry.hours_billed.unwrap_or_default()
        );
        Ok(())
    }

    /// Apply an already validated correction to a closed, editable entry.
    pub async fn correct(
        &self,
        actor: Uuid,
        entry_id: Uuid,
        correction: &EntryCorrection,
        now: DateTime<Utc>,
    ) -> EngineResult<TimeEntry> {
        let mut entry = self.load_owned(actor, entry_id).await?;
        Self::ensure_editable(&entry, "correct")?;

        let mut changes = Vec::new();
        if let Some(description) = &correction.description
            && entry.description.as_ref() != Some(description)
        {
            changes.push(("description", entry.description.clone(), Some(description.clone())));
            entry.description = Some(description.clone());
        }
        if let Some(work_type) = &correction.work_type
            && &entry.work_type != work_type
        {
            changes.push(("work_type", Some(entry.work_type.clone()), Some(work_type.clone())));
            entry.work_type = work_type.clone();
        }
        if let Some(billable) = correction.billable
            && entry.billable != billable
        {
            changes.push((
                "billable",
                Some(entry.billable.to_string()),
                Some(billable.to_string()),
            ));
            entry.billable = billable;
        }

        if changes.is_empty() {
            return Ok(entry);
        }

        let amount_before = entry.amount.map(|a| a.to_string());
        self.pricing.rebill(&mut entry);
        changes.push(("amount", amount_before, entry.amount.map(|a| a.to_string())));
        entry.updated_at = now;

        let mut tx = self.pool.begin().await?;
        if !TimeEntryRepository::update_closed(&mut *tx, &entry).await? {
            let current = Self::reload(&mut tx, entry_id).await?;
            return Err(EngineError::invalid_state(
                entry_id,
                current.status.as_str(),
                "correct",
            ));
        }
        entry.version += 1;
        for (field, old_value, new_value) in changes {
            Self::log(
                &mut tx,
                ActivityLog::time_entry(entry_id, "corrected", actor, now)
                    .with_change(field, old_value, new_value),
            )
            .await?;
        }
        tx.commit().await?;

        info!("Corrected time entry {}", entry_id);
        Ok(entry)
    }

    pub async fn delete(
        &self,
        actor: Uuid,
        entry_id: Uuid,
        now: DateTime<Utc>,
    ) -> EngineResult<TimeEntry> {
        let entry = self.load_owned(actor, entry_id).await?;
        Self::ensure_editable(&entry, "delete")?;

        let mut tx = self.pool.begin().await?;
        if !TimeEntryRepository::delete_editable(&mut *tx, entry_id).await? {
            return Err(EngineError::invalid_state(entry_id, "locked", "delete"));
        }
        Self::log(
            &mut tx,
            ActivityLog::time_entry(entry_id, "deleted", actor, now),
        )
        .await?;
        tx.commit().await?;

        info!("Deleted time entry {}", entry_id);
        Ok(entry)
    }

    /// Move a closed entry through the approval workflow.
    pub async fn transition_status(
        &self,
        actor: Uuid,
        entry_id: Uuid,
        target: EntryStatus,
        now: DateTime<Utc>,
    ) -> EngineResult<TimeEntry> {
        let mut entry = self
            .find_entry(entry_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Time entry", entry_id))?;

        if entry.is_open() {
            return Err(EngineError::invalid_state(
                entry_id,
                entry.state().as_str(),
                "change status of",
            ));
        }
        let from = entry.status;
        if !from.can_transition_to(target) {
            return Err(EngineError::invalid_state(
                entry_id,
                from.as_str(),
                "change status of",
            ));
        }

        let mut tx = self.pool.begin().await?;
        if !TimeEntryRepository::update_status(&mut *tx, entry_id, from, target, now).await? {
            let current = Self::reload(&mut tx, entry_id).await?;
            return Err(EngineError::invalid_state(
                entry_id,
                current.status.as_str(),
                "change status of",
            ));
        }
        Self::log(
            &mut tx,
            ActivityLog::time_entry(entry_id, "status_changed", actor, now).with_change(
                "status",
                Some(from.to_string()),
                Some(target.to_string()),
            ),
        )
        .await?;
        tx.commit().await?;

        entry.status = target;
        entry.updated_at = now;
        entry.version += 1;
        info!("Time entry {} moved from {} to {}", entry_id, from, target);
        Ok(entry)
    }

    async fn load_owned(&self, actor: Uuid, entry_id: Uuid) -> EngineResult<TimeEntry> {
        let entry = self
            .find_entry(entry_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Time entry", entry_id))?;

        if entry.user_id != actor {
            return Err(EngineError::forbidden(format!(
                "time entry {} belongs to another user",
                entry_id
            )));
        }

        Ok(entry)
    }

    /// Load, close and price each requested timer in memory.
    async fn prepare_stops(
        &self,
        actor: Uuid,
        requests: &[StopRequest],
        now: DateTime<Utc>,
    ) -> EngineResult<Vec<TimeEntry>> {
        let mut closed = Vec::with_capacity(requests.len());

        for request in requests {
            let mut entry = self.load_owned(actor, request.timer_id).await?;
            if !entry.is_open_timer() {
                return Err(EngineError::invalid_state(
                    entry.id,
                    entry.state().as_str(),
                    "stop",
                ));
            }

            entry.close(now)?;
            entry.description = Some(request.settings.description.clone());
            entry.work_type = request.settings.work_type.clone();
            entry.billable = request.settings.billable;
            self.pricing.price(&mut entry, request.ticket.as_ref());
            entry.status = EntryStatus::Submitted;

            closed.push(entry);
        }

        Ok(closed)
    }

    async fn write_stops(
        tx: &mut Transaction<'_, Sqlite>,
        closed: &mut [TimeEntry],
        actor: Uuid,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        for entry in closed.iter_mut() {
            Self::write_open(tx, entry, "stop").await?;
            Self::log(
                tx,
                ActivityLog::time_entry(entry.id, "stopped", actor, now).with_change(
                    "amount",
                    None,
                    entry.amount.map(|a| a.to_string()),
                ),
            )
            .await?;
        }
        Ok(())
    }

    /// Compare-and-set the open row. A lost race reports the state the row
    /// is actually in now.
    async fn write_open(
        tx: &mut Transaction<'_, Sqlite>,
        entry: &mut TimeEntry,
        action: &'static str,
    ) -> EngineResult<()> {
        if TimeEntryRepository::update_open(&mut **tx, entry).await? {
            entry.version += 1;
            return Ok(());
        }

        let current = Self::reload(tx, entry.id).await?;
        debug!(
            "Lost write race on timer {}: read version {}, now {} ({})",
            entry.id,
            entry.version,
            current.version,
            current.state().as_str()
        );
        Err(EngineError::invalid_state(
            entry.id,
            current.state().as_str(),
            action,
        ))
    }

    async fn reload(tx: &mut Transaction<'_, Sqlite>, entry_id: Uuid) -> EngineResult<TimeEntry> {
        TimeEntryRepository::find_by_id(&mut **tx, entry_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Time entry", entry_id))
    }

    /// Insert first so the transaction holds the write lock, then verify no
    /// other open timer exists.
    async fn insert_open_timer(tx: &mut Transaction<'_, Sqlite>, entry: &TimeEntry) -> EngineResult<()> {
        match TimeEntryRepository::create(&mut **tx, entry).await {
            Ok(()) => {}
            Err(DbError::UniqueViolation { .. }) => {
                let existing = TimeEntryRepository::find_open_timers(&mut **tx, entry.user_id).await?;
                return Err(EngineError::conflict(
                    existing.iter().map(|e| e.id).collect(),
                ));
            }
            Err(e) => return Err(e.into()),
        }

        if !entry.allow_concurrent {
            let others: Vec<Uuid> = TimeEntryRepository::find_open_timers(&mut **tx, entry.user_id)
                .await?
                .iter()
                .map(|e| e.id)
                .filter(|id| *id != entry.id)
                .collect();
            if !others.is_empty() {
                return Err(EngineError::conflict(others));
            }
        }

        Ok(())
    }

    fn ensure_editable(entry: &TimeEntry, action: &'static str) -> EngineResult<()> {
        if entry.is_open() {
            return Err(EngineError::invalid_state(
                entry.id,
                entry.state().as_str(),
                action,
            ));
        }
        if !entry.status.is_editable() {
            return Err(EngineError::invalid_state(
                entry.id,
                entry.status.as_str(),
                action,
            ));
        }
        Ok(())
    }

    async fn log(tx: &mut Transaction<'_, Sqlite>, activity: ActivityLog) -> EngineResult<()> {
        ActivityLogRepository::create(&mut **tx, &activity).await?;
        Ok(())
    }
}
