use tt_core::{
    ActivityLog, BillingFigures, EntryStatus, RateBadge, TicketComment, TimeEntry,
    compute_billing,
};

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 14, hour, minute, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Creates a running timer started at `started_at`
pub fn create_running_timer(
    company_id: Uuid,
    ticket_id: Uuid,
    user_id: Uuid,
    started_at: DateTime<Utc>,
) -> TimeEntry {
    let mut entry = TimeEntry::start_timer(
        company_id,
        ticket_id,
        user_id,
        started_at,
        &RateBadge::standard(),
    );
    entry.hourly_rate = Decimal::new(100, 0);
    entry
}

/// Creates a one-hour timer that has already been stopped and submitted
pub fn create_stopped_timer(
    company_id: Uuid,
    ticket_id: Uuid,
    user_id: Uuid,
    started_at: DateTime<Utc>,
) -> TimeEntry {
    let mut entry = create_running_timer(company_id, ticket_id, user_id, started_at);
    entry
        .close(started_at + Duration::hours(1))
        .expect("running timer closes");
    let figures: BillingFigures = compute_billing(
        3600,
        entry.hourly_rate,
        entry.rate_multiplier,
        entry.billable,
        Decimal::new(25, 2),
    );
    entry.apply_billing(&figures);
    entry.description = Some("Replaced toner cartridge".to_string());
    entry.status = EntryStatus::Submitted;
    entry
}

pub fn create_test_activity_log(entity_id: Uuid, user_id: Uuid, minute: u32) -> ActivityLog {
    ActivityLog::time_entry(entity_id, "started", user_id, at(9, minute))
}

pub fn create_test_comment(ticket_id: Uuid, author_id: Uuid, minute: u32) -> TicketComment {
    TicketComment::internal_note(
        ticket_id,
        author_id,
        format!("Time logged at minute {}", minute),
        at(11, minute),
    )
}
