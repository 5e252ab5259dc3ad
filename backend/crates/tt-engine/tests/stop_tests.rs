mod common;

use common::{
    CommentlessGateway, TestEngine, both_options, monday, saturday, start_options, stop_settings,
};

use tt_core::{EntryStatus, RateKind, TicketContext, TimerState};
use tt_db::TicketCommentRepository;
use tt_engine::{BatchStopSettings, StopSettings, Surface, TicketGateway, TimerEventKind};

use std::collections::HashMap;
use std::sync::Arc;

use googletest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

fn dec(s: &str) -> Decimal {
    s.parse().expect("valid decimal")
}

async fn start(engine: &TestEngine, ticket: &TicketContext) -> Uuid {
    engine
        .service
        .start_timer(engine.user_id, ticket.ticket_id, start_options())
        .await
        .unwrap()
        .entry()
        .unwrap()
        .id
}

async fn start_alongside(engine: &TestEngine, ticket: &TicketContext) -> Uuid {
    engine
        .service
        .start_timer(engine.user_id, ticket.ticket_id, both_options())
        .await
        .unwrap()
        .entry()
        .unwrap()
        .id
}

#[tokio::test]
async fn given_pause_and_resume_when_stopped_then_pause_excluded_from_billing() {
    // Given: Start 10:00, pause 10:10, resume 10:15
    let engine = TestEngine::new().await;
    engine.set_time(monday(10, 0));
    let ticket = engine.ticket("medium", "Printer offline").await;
    let timer_id = start(&engine, &ticket).await;
    engine.set_time(monday(10, 10));
    engine
        .service
        .pause_timer(engine.user_id, timer_id, "Waiting on vendor")
        .await
        .unwrap();
    engine.set_time(monday(10, 15));
    engine.service.resume_timer(engine.user_id, timer_id).await.unwrap();

    // When: Stopping at 10:20
    engine.set_time(monday(10, 20));
    let stopped = engine
        .service
        .confirm_stop(engine.user_id, timer_id, stop_settings("Replaced fuser unit"))
        .await
        .unwrap();

    // Then: 15 net minutes are billed as a quarter hour
    assert_that!(stopped.paused_duration_seconds, eq(300));
    assert_that!(stopped.elapsed_seconds_at(monday(12, 0)), eq(900));
    assert_that!(stopped.hours_worked, some(eq(dec("0.25"))));
    assert_that!(stopped.hours_billed, some(eq(dec("0.25"))));
    assert_that!(stopped.amount, some(eq(dec("25.00"))));
    assert_that!(stopped.status, eq(EntryStatus::Submitted));
}

#[tokio::test]
async fn given_ten_net_minutes_when_stopped_then_rounded_up_to_quarter_hour() {
    let engine = TestEngine::new().await;
    engine.set_time(monday(10, 0));
    let ticket = engine.ticket("medium", "Printer offline").await;
    let timer_id = start(&engine, &ticket).await;
    engine.set_time(monday(10, 5));
    engine
        .service
        .pause_timer(engine.user_id, timer_id, "Phone call")
        .await
        .unwrap();
    engine.set_time(monday(10, 10));
    engine.service.resume_timer(engine.user_id, timer_id).await.unwrap();

    engine.set_time(monday(10, 15));
    let stopped = engine
        .service
        .confirm_stop(engine.user_id, timer_id, stop_settings("Reset user password"))
        .await
        .unwrap();

    assert_that!(stopped.hours_worked, some(eq(dec("0.1667"))));
    assert_that!(stopped.hours_billed, some(eq(dec("0.25"))));
}

#[tokio::test]
async fn given_stopped_timer_when_mutated_again_then_invalid_state() {
    // Given: A stopped timer
    let engine = TestEngine::new().await;
    engine.set_time(monday(10, 0));
    let ticket = engine.ticket("medium", "Printer offline").await;
    let timer_id = start(&engine, &ticket).await;
    engine.set_time(monday(11, 0));
    engine
        .service
        .confirm_stop(engine.user_id, timer_id, stop_settings("Replaced fuser unit"))
        .await
        .unwrap();

    // When: Trying every timer action again
    let service = &engine.service;
    let user_id = engine.user_id;
    let errors = vec![
        service.pause_timer(user_id, timer_id, "Late pause").await.unwrap_err(),
        service.resume_timer(user_id, timer_id).await.unwrap_err(),
        service
            .confirm_stop(user_id, timer_id, stop_settings("Stopping twice"))
            .await
            .unwrap_err(),
        service.discard_timer(user_id, timer_id).await.unwrap_err(),
        service.request_stop(user_id, timer_id).await.unwrap_err(),
    ];

    // Then: Each is rejected as an invalid state change
    for err in errors {
        assert_eq!(err.error_code(), "INVALID_STATE", "{err}");
    }
}

#[tokio::test]
async fn given_non_billable_stop_when_confirmed_then_amount_zero() {
    let engine = TestEngine::new().await;
    engine.set_time(monday(10, 0));
    let ticket = engine.ticket("medium", "Printer offline").await;
    let timer_id = start(&engine, &ticket).await;

    engine.set_time(monday(11, 0));
    let stopped = engine
        .service
        .confirm_stop(
            engine.user_id,
            timer_id,
            StopSettings {
                billable: false,
                ..stop_settings("Internal training")
            },
        )
        .await
        .unwrap();

    assert_that!(stopped.hours_billed, some(eq(dec("1"))));
    assert_that!(stopped.amount, some(eq(Decimal::ZERO)));
}

#[tokio::test]
async fn given_critical_ticket_on_saturday_night_when_stopped_then_emergency_rate_applies() {
    // Given: A critical ticket worked at 02:00 on a Saturday
    let engine = TestEngine::new().await;
    engine.set_time(saturday(2, 0));
    let ticket = engine.ticket("critical", "Firewall rejecting all traffic").await;
    let timer_id = start(&engine, &ticket).await;

    // When: Stopping an hour later
    engine.set_time(saturday(3, 0));
    let stopped = engine
        .service
        .confirm_stop(engine.user_id, timer_id, stop_settings("Rolled back rule set"))
        .await
        .unwrap();

    // Then: Emergency wins over weekend and after-hours
    assert_that!(stopped.rate_label, eq(RateKind::Emergency.label()));
    assert_that!(stopped.rate_multiplier, eq(dec("2")));
    assert_that!(stopped.amount, some(eq(dec("200.00"))));
}

#[tokio::test]
async fn given_ordinary_ticket_on_saturday_when_stopped_then_weekend_rate_applies() {
    let engine = TestEngine::new().await;
    engine.set_time(saturday(11, 0));
    let ticket = engine.ticket("low", "Shared drive migration").await;
    let timer_id = start(&engine, &ticket).await;

    engine.set_time(saturday(13, 0));
    let stopped = engine
        .service
        .confirm_stop(engine.user_id, timer_id, stop_settings("Copied archive folders"))
        .await
        .unwrap();

    assert_that!(stopped.rate_label, eq(RateKind::Weekend.label()));
    assert_that!(stopped.amount, some(eq(dec("300.00"))));
}

#[tokio::test]
async fn given_ticket_escalated_while_running_when_stopped_then_rate_reevaluated() {
    // Given: A timer started on an ordinary ticket during business hours
    let engine = TestEngine::new().await;
    engine.set_time(monday(10, 0));
    let mut ticket = engine.ticket("medium", "Slow file server").await;
    let timer_id = start(&engine, &ticket).await;

    // When: The ticket is escalated to critical before the timer stops
    ticket.priority = Some("critical".to_string());
    engine.save_ticket(&ticket).await;
    engine.set_time(monday(11, 0));
    let stopped = engine
        .service
        .confirm_stop(engine.user_id, timer_id, stop_settings("Replaced failing disk"))
        .await
        .unwrap();

    // Then: The final rate reflects the escalation
    assert_that!(stopped.rate_label, eq("Emergency"));
    assert_that!(stopped.amount, some(eq(dec("200.00"))));
}

#[tokio::test]
async fn given_running_timer_when_stop_requested_then_preview_without_writing() {
    // Given: A timer with a draft description
    let engine = TestEngine::new().await;
    engine.set_time(monday(10, 0));
    let ticket = engine.ticket("medium", "Printer offline").await;
    let timer_id = engine
        .service
        .start_timer(
            engine.user_id,
            ticket.ticket_id,
            tt_engine::StartOptions {
                description: Some("Checking drivers".to_string()),
                ..start_options()
            },
        )
        .await
        .unwrap()
        .entry()
        .unwrap()
        .id;

    // When: Asking what a stop at 10:40 would look like
    engine.set_time(monday(10, 40));
    let intent = engine
        .service
        .request_stop(engine.user_id, timer_id)
        .await
        .unwrap();

    // Then: The preview is computed and the timer is still running
    assert_that!(intent.preview.hours_billed, eq(dec("0.75")));
    assert_that!(intent.preview.amount, eq(dec("75.00")));
    assert_that!(intent.hourly_rate, eq(dec("100")));
    assert_that!(intent.suggested.description, eq("Checking drivers"));
    assert_that!(intent.suggested.add_comment, eq(true));
    assert_that!(intent.snapshot.state, eq(TimerState::Running));

    let entry = engine.service.store().find_entry(timer_id).await.unwrap();
    assert_that!(entry.unwrap().ended_at, none());
}

#[tokio::test]
async fn given_invalid_description_when_stop_confirmed_then_timer_keeps_running() {
    let engine = TestEngine::new().await;
    let ticket = engine.ticket("medium", "Printer offline").await;
    let timer_id = start(&engine, &ticket).await;

    let err = engine
        .service
        .confirm_stop(engine.user_id, timer_id, stop_settings("ok"))
        .await
        .unwrap_err();

    assert_eq!(err.field(), Some("description"));
    let open = engine.service.get_active_timers(engine.user_id).await.unwrap();
    assert_that!(open, len(eq(1)));
}

#[tokio::test]
async fn given_comment_requested_when_stopped_then_internal_note_added() {
    let engine = TestEngine::new().await;
    engine.set_time(monday(10, 0));
    let ticket = engine.ticket("medium", "Printer offline").await;
    let timer_id = start(&engine, &ticket).await;

    engine.set_time(monday(10, 30));
    engine
        .service
        .confirm_stop(
            engine.user_id,
            timer_id,
            StopSettings {
                add_comment: true,
                ..stop_settings("Replaced toner")
            },
        )
        .await
        .unwrap();

    let comments = TicketCommentRepository::find_by_ticket(&engine.pool, ticket.ticket_id)
        .await
        .unwrap();
    assert_that!(comments, len(eq(1)));
    assert_that!(comments[0].internal, eq(true));
    assert_that!(comments[0].author_id, eq(engine.user_id));
    assert_that!(comments[0].body, contains_substring("0.5h billed"));
    assert_that!(comments[0].body, contains_substring("Replaced toner"));
}

#[tokio::test]
async fn given_comment_not_requested_when_stopped_then_no_note() {
    let engine = TestEngine::new().await;
    let ticket = engine.ticket("medium", "Printer offline").await;
    let timer_id = start(&engine, &ticket).await;

    engine
        .service
        .confirm_stop(engine.user_id, timer_id, stop_settings("Replaced toner"))
        .await
        .unwrap();

    let comments = TicketCommentRepository::find_by_ticket(&engine.pool, ticket.ticket_id)
        .await
        .unwrap();
    assert_that!(comments, is_empty());
}

#[tokio::test]
async fn given_comment_rejected_by_ticket_system_when_stopped_then_stop_still_succeeds() {
    let engine = TestEngine::with_gateway(|pool| -> Arc<dyn TicketGateway> {
        Arc::new(CommentlessGateway::new(pool))
    })
    .await;
    let ticket = engine.ticket("medium", "Printer offline").await;
    let timer_id = start(&engine, &ticket).await;

    let result = engine
        .service
        .confirm_stop(
            engine.user_id,
            timer_id,
            StopSettings {
                add_comment: true,
                ..stop_settings("Replaced toner")
            },
        )
        .await;

    assert_that!(result, ok(anything()));
    let open = engine.service.get_active_timers(engine.user_id).await.unwrap();
    assert_that!(open, is_empty());
}

#[tokio::test]
async fn given_two_timers_when_all_stopped_uniformly_then_both_finalized_in_one_event() {
    // Given: Two concurrent timers and a watching navbar
    let engine = TestEngine::new().await;
    engine.set_time(monday(10, 0));
    let ticket = engine.ticket("medium", "Printer offline").await;
    let other = engine.ticket("low", "New starter laptop").await;
    let first = start(&engine, &ticket).await;
    let second = start_alongside(&engine, &other).await;
    let mut navbar = engine
        .service
        .subscribe(engine.user_id, Surface::Navbar)
        .await;

    // When: Stopping everything with one set of settings
    engine.set_time(monday(11, 0));
    let stopped = engine
        .service
        .confirm_stop_all(
            engine.user_id,
            BatchStopSettings::Uniform(stop_settings("End of day wrap-up")),
        )
        .await
        .unwrap();

    // Then: Both are closed and the surface sees a single batch event
    assert_that!(stopped, len(eq(2)));
    let ids: Vec<Uuid> = stopped.iter().map(|e| e.id).collect();
    assert_that!(ids, unordered_elements_are![eq(&first), eq(&second)]);
    assert_that!(
        stopped.iter().all(|e| e.amount == Some(dec("100.00"))),
        eq(true)
    );

    let snapshots = navbar.poll().await.unwrap();
    assert_that!(snapshots, is_empty());
    let event = navbar.last_event().unwrap();
    assert_that!(event.kind, eq(TimerEventKind::BatchStopped));
    assert_that!(event.entry_ids, len(eq(2)));
}

#[tokio::test]
async fn given_one_invalid_setting_when_all_stopped_then_no_timer_changes() {
    // Given: Two concurrent timers
    let engine = TestEngine::new().await;
    engine.set_time(monday(10, 0));
    let ticket = engine.ticket("medium", "Printer offline").await;
    let other = engine.ticket("low", "New starter laptop").await;
    let first = start(&engine, &ticket).await;
    let second = start_alongside(&engine, &other).await;

    // When: One timer's settings carry a description that is too short
    engine.set_time(monday(11, 0));
    let batch = BatchStopSettings::PerTimer(HashMap::from([
        (first, stop_settings("Replaced fuser unit")),
        (second, stop_settings("no")),
    ]));
    let err = engine
        .service
        .confirm_stop_all(engine.user_id, batch)
        .await
        .unwrap_err();

    // Then: The batch is rejected and both timers are still open
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    let open = engine.service.store().find_open_timers(engine.user_id).await.unwrap();
    assert_that!(open, len(eq(2)));
    assert_that!(open.iter().all(|e| e.amount.is_none()), eq(true));
}

#[tokio::test]
async fn given_settings_missing_for_one_timer_when_all_stopped_then_rejected() {
    let engine = TestEngine::new().await;
    let ticket = engine.ticket("medium", "Printer offline").await;
    let other = engine.ticket("low", "New starter laptop").await;
    let first = start(&engine, &ticket).await;
    start_alongside(&engine, &other).await;

    let batch = BatchStopSettings::PerTimer(HashMap::from([(
        first,
        stop_settings("Replaced fuser unit"),
    )]));
    let err = engine
        .service
        .confirm_stop_all(engine.user_id, batch)
        .await
        .unwrap_err();

    assert_eq!(err.field(), Some("settings"));
    let open = engine.service.store().find_open_timers(engine.user_id).await.unwrap();
    assert_that!(open, len(eq(2)));
}

#[tokio::test]
async fn given_settings_for_unknown_timer_when_all_stopped_then_rejected() {
    let engine = TestEngine::new().await;
    let ticket = engine.ticket("medium", "Printer offline").await;
    let first = start(&engine, &ticket).await;

    let batch = BatchStopSettings::PerTimer(HashMap::from([
        (first, stop_settings("Replaced fuser unit")),
        (Uuid::new_v4(), stop_settings("Somebody else's work")),
    ]));
    let err = engine
        .service
        .confirm_stop_all(engine.user_id, batch)
        .await
        .unwrap_err();

    assert_eq!(err.field(), Some("timer_id"));
}

#[tokio::test]
async fn given_two_timers_when_stop_all_requested_then_one_intent_each() {
    let engine = TestEngine::new().await;
    engine.set_time(monday(10, 0));
    let ticket = engine.ticket("medium", "Printer offline").await;
    let other = engine.ticket("critical", "Payroll server down").await;
    start(&engine, &ticket).await;
    start_alongside(&engine, &other).await;

    engine.set_time(monday(10, 30));
    let intents = engine.service.request_stop_all(engine.user_id).await.unwrap();

    assert_that!(intents, len(eq(2)));
    let emergency = intents
        .iter()
        .find(|i| i.snapshot.ticket_id == other.ticket_id)
        .unwrap();
    assert_that!(emergency.rate.kind, eq(RateKind::Emergency));
    assert_that!(emergency.preview.amount, eq(dec("100.00")));
}

#[tokio::test]
async fn given_running_timer_when_discarded_then_removed_and_audited() {
    let engine = TestEngine::new().await;
    let ticket = engine.ticket("medium", "Printer offline").await;
    let timer_id = start(&engine, &ticket).await;

    engine.set_time(monday(9, 5));
    engine
        .service
        .discard_timer(engine.user_id, timer_id)
        .await
        .unwrap();

    let entry = engine.service.store().find_entry(timer_id).await.unwrap();
    assert_that!(entry, none());
    let history = engine.service.entry_history(timer_id).await.unwrap();
    assert_that!(history.last().unwrap().action, eq("discarded"));
    let open = engine.service.get_active_timers(engine.user_id).await.unwrap();
    assert_that!(open, is_empty());
}
