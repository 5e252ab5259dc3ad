use crate::tests::at;
use crate::{CoreError, RateBadge, TimeEntry, TimerState};

use googletest::prelude::*;
use uuid::Uuid;

fn running_entry() -> TimeEntry {
    TimeEntry::start_timer(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        at(2026, 3, 2, 10, 0, 0),
        &RateBadge::standard(),
    )
}

#[test]
fn given_new_timer_then_running_draft() {
    let entry = running_entry();

    assert_that!(entry.state(), eq(TimerState::Running));
    assert_that!(entry.is_open_timer(), eq(true));
    assert_eq!(entry.status.as_str(), "draft");
}

#[test]
fn given_pause_resume_when_closed_then_pause_subtracted() {
    let mut entry = running_entry();

    entry.pause(at(2026, 3, 2, 10, 10, 0), "lunch").unwrap();
    entry.resume(at(2026, 3, 2, 10, 15, 0)).unwrap();
    entry.close(at(2026, 3, 2, 10, 20, 0)).unwrap();

    assert_that!(entry.paused_duration_seconds, eq(300));
    assert_that!(entry.elapsed_seconds_at(at(2026, 3, 2, 11, 0, 0)), eq(900));
    assert_that!(entry.state(), eq(TimerState::Stopped));
}

#[test]
fn given_paused_timer_when_time_passes_then_elapsed_frozen() {
    let mut entry = running_entry();
    entry.pause(at(2026, 3, 2, 10, 10, 0), "call").unwrap();

    assert_that!(entry.elapsed_seconds_at(at(2026, 3, 2, 10, 10, 0)), eq(600));
    assert_that!(entry.elapsed_seconds_at(at(2026, 3, 2, 12, 0, 0)), eq(600));
}

#[test]
fn given_paused_timer_when_closed_then_open_pause_folded_in() {
    let mut entry = running_entry();
    entry.pause(at(2026, 3, 2, 10, 30, 0), "meeting").unwrap();

    entry.close(at(2026, 3, 2, 11, 0, 0)).unwrap();

    assert_that!(entry.paused_duration_seconds, eq(1800));
    assert_that!(entry.paused, eq(false));
    assert_that!(entry.elapsed_seconds_at(at(2026, 3, 2, 11, 0, 0)), eq(1800));
}

#[test]
fn given_resume_before_pause_instant_when_resumed_then_total_never_decreases() {
    let mut entry = running_entry();
    entry.paused_duration_seconds = 120;
    entry.pause(at(2026, 3, 2, 10, 30, 0), "skew").unwrap();

    entry.resume(at(2026, 3, 2, 10, 29, 0)).unwrap();

    assert_that!(entry.paused_duration_seconds, eq(120));
}

#[test]
fn given_running_timer_when_resumed_then_invalid_transition() {
    let mut entry = running_entry();

    let result = entry.resume(at(2026, 3, 2, 10, 5, 0));

    assert!(matches!(
        result,
        Err(CoreError::InvalidTransition {
            state: TimerState::Running,
            action: "resume",
            ..
        })
    ));
}

#[test]
fn given_stopped_timer_when_paused_or_closed_then_invalid_transition() {
    let mut entry = running_entry();
    entry.close(at(2026, 3, 2, 10, 5, 0)).unwrap();

    assert_that!(entry.pause(at(2026, 3, 2, 10, 6, 0), "x"), err(anything()));
    assert_that!(entry.close(at(2026, 3, 2, 10, 6, 0)), err(anything()));
}

#[test]
fn given_clock_before_start_when_closed_then_ended_at_clamped_to_start() {
    let mut entry = running_entry();

    entry.close(at(2026, 3, 2, 9, 0, 0)).unwrap();

    assert_that!(entry.ended_at, some(eq(entry.started_at)));
}

#[test]
fn given_manual_record_then_closed_submitted_and_elapsed_net_of_pause() {
    let entry = TimeEntry::record_manual(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        at(2026, 3, 2, 9, 0, 0),
        at(2026, 3, 2, 10, 30, 0),
        600,
        &RateBadge::standard(),
        at(2026, 3, 2, 12, 0, 0),
    );

    assert_that!(entry.state(), eq(TimerState::Stopped));
    assert_that!(entry.is_open_timer(), eq(false));
    assert_eq!(entry.status.as_str(), "submitted");
    assert_eq!(entry.entry_type.as_str(), "manual");
    assert_that!(entry.elapsed_seconds_at(at(2026, 3, 2, 12, 0, 0)), eq(4800));
}
