use crate::{
    BatchStopSettings, Clock, ConflictInfo, ConflictResolution, EngineError, EngineSettings,
    EntryCorrection, ManualEntry, Result as EngineResult, StartOptions, StartOutcome,
    StopIntent, StopRequest, StopSettings, Surface, SurfaceObserver, TicketGateway,
    TimeEntrySnapshot, TimerCoordinator, TimerEvent, TimerEventKind, TimerStore,
};

use tt_core::{ActivityLog, EntryStatus, TicketComment, TicketContext, TimeEntry};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Entry point for everything a technician does with timers.
///
/// Inputs are validated before anything is written. Each successful mutation
/// invalidates the user's cached timers and publishes exactly one event.
pub struct TimerService {
    store: TimerStore,
    coordinator: TimerCoordinator,
    gateway: Arc<dyn TicketGateway>,
    clock: Arc<dyn Clock>,
    settings: Arc<EngineSettings>,
}

impl TimerService {
    pub fn new(
        pool: SqlitePool,
        gateway: Arc<dyn TicketGateway>,
        clock: Arc<dyn Clock>,
        settings: EngineSettings,
    ) -> Self {
        let store = TimerStore::new(pool, settings.pricing.clone());
        let coordinator = TimerCoordinator::new(store.clone(), clock.clone(), &settings);

        Self {
            store,
            coordinator,
            gateway,
            clock,
            settings: Arc::new(settings),
        }
    }

    pub fn store(&self) -> &TimerStore {
        &self.store
    }

    pub fn coordinator(&self) -> &TimerCoordinator {
        &self.coordinator
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub async fn start_timer(
        &self,
        user_id: Uuid,
        ticket_id: Uuid,
        options: StartOptions,
    ) -> EngineResult<StartOutcome> {
        debug!("start_timer user={} ticket={}", user_id, ticket_id);

        let validator = &self.settings.validator;
        let work_type = options
            .work_type
            .clone()
            .unwrap_or_else(|| self.settings.default_work_type.clone());
        validator.validate_work_type(&work_type)?;
        let description = validator.validate_draft_description(options.description.as_deref())?;
        let resolution = match options.on_conflict {
            Some(ConflictResolution::Switch(settings)) => {
                Some(ConflictResolution::Switch(validator.validate_stop(&settings)?))
            }
            other => other,
        };

        let ticket = self.require_ticket(ticket_id).await?;
        let now = self.clock.now();
        let pricing = &self.settings.pricing;

        // Provisional; re-evaluated against the ticket when the timer stops
        let rate = pricing.rate_for(now, Some(&ticket));
        let mut entry = TimeEntry::start_timer(ticket.company_id, ticket_id, user_id, now, &rate);
        entry.work_date = pricing.work_date(now);
        entry.hourly_rate = pricing.hourly_rate_for(&work_type);
        entry.work_type = work_type;
        entry.description = description;
        entry.billable = options.billable;

        let open = self.store.find_open_timers(user_id).await?;
        if open.is_empty() {
            self.store.create_timer(&entry).await?;
            self.publish(TimerEventKind::Started, &entry, vec![entry.id])
                .await;
            return Ok(StartOutcome::Started {
                entry,
                conflict: None,
                stopped: Vec::new(),
            });
        }

        let conflict = ConflictInfo {
            existing: open
                .iter()
                .map(|e| self.coordinator.snapshot(e, now))
                .collect(),
        };

        match resolution {
            None => Err(EngineError::conflict(conflict.timer_ids())),

            Some(ConflictResolution::Cancel) => {
                info!(
                    "User {} cancelled start on ticket {}: {} open timers",
                    user_id,
                    ticket_id,
                    conflict.existing.len()
                );
                Ok(StartOutcome::Cancelled { conflict })
            }

            Some(ConflictResolution::Both) => {
                entry.allow_concurrent = true;
                self.store.create_timer(&entry).await?;
                self.publish(TimerEventKind::Started, &entry, vec![entry.id])
                    .await;
                Ok(StartOutcome::Started {
                    entry,
                    conflict: Some(conflict),
                    stopped: Vec::new(),
                })
            }

            Some(ConflictResolution::Switch(settings)) => {
                let requests = self
                    .stop_requests(&open, |_| Some(settings.clone()))
                    .await?;
                let stopped = self
                    .store
                    .switch_timer(user_id, &requests, &entry, now)
                    .await?;
                self.comment_on_stops(&stopped, &requests, now).await;

                let mut ids = vec![entry.id];
                ids.extend(stopped.iter().map(|e| e.id));
                self.publish(TimerEventKind::Switched, &entry, ids).await;

                Ok(StartOutcome::Started {
                    entry,
                    conflict: Some(conflict),
                    stopped,
                })
            }
        }
    }

    pub async fn pause_timer(
        &self,
        user_id: Uuid,
        timer_id: Uuid,
        reason: &str,
    ) -> EngineResult<TimeEntry> {
        debug!("pause_timer user={} timer={}", user_id, timer_id);

        let reason = self.settings.validator.validate_pause_reason(reason)?;
        let entry = self
            .store
            .pause(user_id, timer_id, &reason, self.clock.now())
            .await?;

        self.publish(TimerEventKind::Paused, &entry, vec![entry.id])
            .await;
        Ok(entry)
    }

    pub async fn resume_timer(&self, user_id: Uuid, timer_id: Uuid) -> EngineResult<TimeEntry> {
        debug!("resume_timer user={} timer={}", user_id, timer_id);

        let entry = self
            .store
            .resume(user_id, timer_id, self.clock.now())
            .await?;

        self.publish(TimerEventKind::Resumed, &entry, vec![entry.id])
            .await;
        Ok(entry)
    }

    /// Preview of a stop. Writes nothing.
    pub async fn request_stop(&self, user_id: Uuid, timer_id: Uuid) -> EngineResult<StopIntent> {
        let entry = self.load_open_timer(user_id, timer_id, "stop").await?;
        let ticket = self.gateway.ticket_context(entry.ticket_id).await?;
        Ok(self.stop_intent(&entry, ticket.as_ref(), self.clock.now()))
    }

    pub async fn confirm_stop(
        &self,
        user_id: Uuid,
        timer_id: Uuid,
        settings: StopSettings,
    ) -> EngineResult<TimeEntry> {
        debug!("confirm_stop user={} timer={}", user_id, timer_id);

        let settings = self.settings.validator.validate_stop(&settings)?;
        let entry = self.load_open_timer(user_id, timer_id, "stop").await?;
        let request = StopRequest {
            timer_id,
            settings,
            ticket: self.gateway.ticket_context(entry.ticket_id).await?,
        };

        let now = self.clock.now();
        let stopped = self.store.stop(user_id, &request, now).await?;
        self.comment_on_stops(std::slice::from_ref(&stopped), std::slice::from_ref(&request), now)
            .await;

        self.publish(TimerEventKind::Stopped, &stopped, vec![stopped.id])
            .await;
        Ok(stopped)
    }

    pub async fn request_stop_all(&self, user_id: Uuid) -> EngineResult<Vec<StopIntent>> {
        let open = self.store.find_open_timers(user_id).await?;
        let tickets = self.ticket_contexts(&open).await?;
        let now = self.clock.now();

        Ok(open
            .iter()
            .map(|e| self.stop_intent(e, tickets.get(&e.ticket_id), now))
            .collect())
    }

    /// Stop every open timer of the user in one transaction. Any invalid
    /// setting rejects the whole batch before anything is written.
    pub async fn confirm_stop_all(
        &self,
        user_id: Uuid,
        batch: BatchStopSettings,
    ) -> EngineResult<Vec<TimeEntry>> {
        debug!("confirm_stop_all user={}", user_id);

        let validator = &self.settings.validator;
        for settings in batch.iter() {
            validator.validate_stop(settings)?;
        }

        let open = self.store.find_open_timers(user_id).await?;
        if let BatchStopSettings::PerTimer(by_timer) = &batch
            && let Some(unknown) = by_timer.keys().find(|id| !open.iter().any(|e| e.id == **id))
        {
            return Err(EngineError::validation(
                "timer_id",
                format!("timer {} is not an open timer of this user", unknown),
            ));
        }
        if open.is_empty() {
            return Ok(Vec::new());
        }

        let mut missing = None;
        let requests = self
            .stop_requests(&open, |e| {
                let settings = batch
                    .settings_for(e.id)
                    .and_then(|s| validator.validate_stop(s).ok());
                if settings.is_none() {
                    missing.get_or_insert(e.id);
                }
                settings
            })
            .await?;
        if let Some(timer_id) = missing {
            return Err(EngineError::validation(
                "settings",
                format!("no stop settings for timer {}", timer_id),
            ));
        }

        let now = self.clock.now();
        let stopped = self.store.stop_all(user_id, &requests, now).await?;
        self.comment_on_stops(&stopped, &requests, now).await;

        if let Some(first) = stopped.first() {
            self.publish(
                TimerEventKind::BatchStopped,
                first,
                stopped.iter().map(|e| e.id).collect(),
            )
            .await;
        }
        Ok(stopped)
    }

    pub async fn discard_timer(&self, user_id: Uuid, timer_id: Uuid) -> EngineResult<()> {
        debug!("discard_timer user={} timer={}", user_id, timer_id);

        let discarded = self
            .store
            .discard(user_id, timer_id, self.clock.now())
            .await?;

        self.publish(TimerEventKind::Discarded, &discarded, vec![discarded.id])
            .await;
        Ok(())
    }

    pub async fn get_active_timers(&self, user_id: Uuid) -> EngineResult<Vec<TimeEntrySnapshot>> {
        self.coordinator.active_timers(user_id).await
    }

    pub async fn subscribe(&self, user_id: Uuid, surface: Surface) -> SurfaceObserver {
        self.coordinator.subscribe(user_id, surface).await
    }

    pub async fn create_manual_entry(
        &self,
        user_id: Uuid,
        ticket_id: Uuid,
        manual: ManualEntry,
    ) -> EngineResult<TimeEntry> {
        debug!("create_manual_entry user={} ticket={}", user_id, ticket_id);

        let now = self.clock.now();
        let manual = self.settings.validator.validate_manual(&manual, now)?;
        let ticket = self.require_ticket(ticket_id).await?;

        let pricing = &self.settings.pricing;
        let rate = pricing.rate_for(manual.started_at, Some(&ticket));
        let mut entry = TimeEntry::record_manual(
            ticket.company_id,
            ticket_id,
            user_id,
            manual.started_at,
            manual.ended_at,
            manual.paused_seconds,
            &rate,
            now,
        );
        entry.work_date = pricing.work_date(manual.started_at);
        entry.work_type = manual.work_type;
        entry.description = Some(manual.description);
        entry.billable = manual.billable;
        pricing.price(&mut entry, Some(&ticket));

        self.store.create_manual(&entry).await?;

        self.publish(TimerEventKind::ManualCreated, &entry, vec![entry.id])
            .await;
        Ok(entry)
    }

    pub async fn correct_entry(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
        correction: EntryCorrection,
    ) -> EngineResult<TimeEntry> {
        debug!("correct_entry user={} entry={}", user_id, entry_id);

        if correction.is_empty() {
            return Err(EngineError::validation("correction", "nothing to correct"));
        }

        let validator = &self.settings.validator;
        let correction = EntryCorrection {
            description: correction
                .description
                .as_deref()
                .map(|d| validator.validate_description(d))
                .transpose()?,
            work_type: match correction.work_type {
                Some(work_type) => {
                    validator.validate_work_type(&work_type)?;
                    Some(work_type)
                }
                None => None,
            },
            billable: correction.billable,
        };

        let entry = self
            .store
            .correct(user_id, entry_id, &correction, self.clock.now())
            .await?;

        self.publish(TimerEventKind::Corrected, &entry, vec![entry.id])
            .await;
        Ok(entry)
    }

    pub async fn delete_entry(&self, user_id: Uuid, entry_id: Uuid) -> EngineResult<()> {
        debug!("delete_entry user={} entry={}", user_id, entry_id);

        let deleted = self
            .store
            .delete(user_id, entry_id, self.clock.now())
            .await?;

        self.publish(TimerEventKind::Deleted, &deleted, vec![deleted.id])
            .await;
        Ok(())
    }

    /// Approval workflow move, performed by a reviewer rather than the owner.
    pub async fn transition_status(
        &self,
        actor_id: Uuid,
        entry_id: Uuid,
        target: EntryStatus,
    ) -> EngineResult<TimeEntry> {
        debug!(
            "transition_status actor={} entry={} target={}",
            actor_id, entry_id, target
        );

        let entry = self
            .store
            .transition_status(actor_id, entry_id, target, self.clock.now())
            .await?;

        self.publish(TimerEventKind::StatusChanged, &entry, vec![entry.id])
            .await;
        Ok(entry)
    }

    pub async fn ticket_entries(&self, ticket_id: Uuid) -> EngineResult<Vec<TimeEntry>> {
        self.store.ticket_entries(ticket_id).await
    }

    pub async fn entry_history(&self, entry_id: Uuid) -> EngineResult<Vec<ActivityLog>> {
        self.store.history(entry_id).await
    }

    async fn require_ticket(&self, ticket_id: Uuid) -> EngineResult<TicketContext> {
        self.gateway
            .ticket_context(ticket_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Ticket", ticket_id))
    }

    async fn load_open_timer(
        &self,
        user_id: Uuid,
        timer_id: Uuid,
        action: &'static str,
    ) -> EngineResult<TimeEntry> {
        let entry = self
            .store
            .find_entry(timer_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Time entry", timer_id))?;

        if entry.user_id != user_id {
            return Err(EngineError::forbidden(format!(
                "timer {} belongs to another user",
                timer_id
            )));
        }
        if !entry.is_open_timer() {
            return Err(EngineError::invalid_state(
                timer_id,
                entry.state().as_str(),
                action,
            ));
        }

        Ok(entry)
    }

    async fn ticket_contexts(
        &self,
        entries: &[TimeEntry],
    ) -> EngineResult<HashMap<Uuid, TicketContext>> {
        let mut tickets = HashMap::new();
        for entry in entries {
            if tickets.contains_key(&entry.ticket_id) {
                continue;
            }
            if let Some(ticket) = self.gateway.ticket_context(entry.ticket_id).await? {
                tickets.insert(entry.ticket_id, ticket);
            }
        }
        Ok(tickets)
    }

    async fn stop_requests<F>(
        &self,
        open: &[TimeEntry],
        mut settings_for: F,
    ) -> EngineResult<Vec<StopRequest>>
    where
        F: FnMut(&TimeEntry) -> Option<StopSettings>,
    {
        let tickets = self.ticket_contexts(open).await?;

        Ok(open
            .iter()
            .filter_map(|e| {
                settings_for(e).map(|settings| StopRequest {
                    timer_id: e.id,
                    settings,
                    ticket: tickets.get(&e.ticket_id).cloned(),
                })
            })
            .collect())
    }

    fn stop_intent(
        &self,
        entry: &TimeEntry,
        ticket: Option<&TicketContext>,
        now: DateTime<Utc>,
    ) -> StopIntent {
        let (rate, hourly_rate, preview) = self.settings.pricing.preview(entry, ticket, now);

        StopIntent {
            snapshot: self.coordinator.snapshot(entry, now),
            rate,
            hourly_rate,
            preview,
            suggested: StopSettings {
                description: entry.description.clone().unwrap_or_default(),
                work_type: entry.work_type.clone(),
                billable: entry.billable,
                add_comment: self.settings.comment_on_stop,
            },
        }
    }

    /// Internal notes for stopped timers that asked for one. Failures are
    /// logged; the stop itself has already committed.
    async fn comment_on_stops(
        &self,
        stopped: &[TimeEntry],
        requests: &[StopRequest],
        now: DateTime<Utc>,
    ) {
        for entry in stopped {
            let wants_comment = requests
                .iter()
                .any(|r| r.timer_id == entry.id && r.settings.add_comment);
            if !wants_comment {
                continue;
            }

            let body = format!(
                "Time logged: {}h worked, {}h billed at {} rate ({}x). {}",
                entry.hours_worked.unwrap_or_default(),
                entry.hours_billed.unwrap_or_default(),
                entry.rate_label,
                entry.rate_multiplier,
                entry.description.as_deref().unwrap_or_default()
            );
            let comment = TicketComment::internal_note(entry.ticket_id, entry.user_id, body, now);

            if let Err(e) = self.gateway.append_comment(&comment).await {
                warn!(
                    "Could not add time comment to ticket {} for entry {}: {}",
                    entry.ticket_id, entry.id, e
                );
            }
        }
    }

    async fn publish(&self, kind: TimerEventKind, entry: &TimeEntry, entry_ids: Vec<Uuid>) {
        let event = TimerEvent::new(
            kind,
            entry.user_id,
            entry.company_id,
            entry_ids,
            self.clock.now(),
        );
        self.coordinator.notify(event).await;
    }
}
