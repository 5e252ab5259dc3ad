use crate::Cli;
use crate::commands::{Commands, ConflictChoice, ReviewStatus};
use crate::ticket_commands::TicketCommands;

use clap::Parser;
use googletest::assert_that;
use googletest::prelude::*;
use uuid::Uuid;

const TICKET: &str = "8f9a5a52-0c8e-4a55-9a53-0d7d1c2b6e11";

#[test]
fn given_start_with_switch_when_parsed_then_conflict_choice_is_set() {
    // When
    let cli = Cli::try_parse_from([
        "tt",
        "start",
        TICKET,
        "--work-type",
        "remote_support",
        "--on-conflict",
        "switch",
        "--stop-description",
        "Handing over to the network team",
    ])
    .unwrap();

    // Then
    let Commands::Start {
        ticket_id,
        work_type,
        on_conflict,
        stop_description,
        non_billable,
        ..
    } = cli.command
    else {
        panic!("expected start");
    };
    assert_that!(ticket_id, eq(Uuid::parse_str(TICKET).unwrap()));
    assert_eq!(work_type.as_deref(), Some("remote_support"));
    assert_that!(on_conflict, some(eq(ConflictChoice::Switch)));
    assert!(stop_description.is_some());
    assert_that!(non_billable, eq(false));
}

#[test]
fn given_global_flags_after_subcommand_when_parsed_then_they_apply() {
    // When
    let cli = Cli::try_parse_from(["tt", "status", "--pretty", "--user", TICKET]).unwrap();

    // Then
    assert_that!(cli.pretty, eq(true));
    assert_that!(cli.user, some(eq(Uuid::parse_str(TICKET).unwrap())));
    assert_that!(cli.company, none());
    assert!(matches!(cli.command, Commands::Status));
}

#[test]
fn given_stop_flags_when_parsed_then_overrides_are_collected() {
    // When
    let cli = Cli::try_parse_from([
        "tt",
        "stop",
        TICKET,
        "--description",
        "Reset VPN profile",
        "--non-billable",
        "--no-comment",
    ])
    .unwrap();

    // Then
    let Commands::Stop { settings, .. } = cli.command else {
        panic!("expected stop");
    };
    assert_eq!(settings.description.as_deref(), Some("Reset VPN profile"));
    assert_that!(settings.non_billable, eq(true));
    assert_that!(settings.no_comment, eq(true));
    assert_that!(settings.preview, eq(false));
}

#[test]
fn given_manual_times_when_parsed_then_rfc3339_is_accepted() {
    // When
    let cli = Cli::try_parse_from([
        "tt",
        "manual",
        TICKET,
        "--started-at",
        "2026-03-02T06:00:00Z",
        "--ended-at",
        "2026-03-02T07:30:00+00:00",
        "--paused-minutes",
        "30",
        "--description",
        "Server patching",
    ])
    .unwrap();

    // Then
    let Commands::Manual {
        started_at,
        ended_at,
        paused_minutes,
        ..
    } = cli.command
    else {
        panic!("expected manual");
    };
    assert_that!((ended_at - started_at).num_minutes(), eq(90));
    assert_that!(paused_minutes, eq(30));
}

#[test]
fn given_bad_timestamp_when_parsed_then_error() {
    // When
    let result = Cli::try_parse_from([
        "tt",
        "manual",
        TICKET,
        "--started-at",
        "yesterday",
        "--ended-at",
        "2026-03-02T07:30:00Z",
        "--description",
        "Server patching",
    ]);

    // Then
    assert!(result.is_err());
}

#[test]
fn given_unknown_conflict_choice_when_parsed_then_error() {
    let result = Cli::try_parse_from(["tt", "start", TICKET, "--on-conflict", "merge"]);

    assert!(result.is_err());
}

#[test]
fn given_review_and_ticket_commands_when_parsed_then_subcommands_match() {
    let review =
        Cli::try_parse_from(["tt", "review", TICKET, "--status", "approved"]).unwrap();
    let add = Cli::try_parse_from([
        "tt",
        "ticket",
        "add",
        "--subject",
        "Email down",
        "--priority",
        "critical",
    ])
    .unwrap();

    assert!(matches!(
        review.command,
        Commands::Review {
            status: ReviewStatus::Approved,
            ..
        }
    ));
    assert!(matches!(
        add.command,
        Commands::Ticket {
            action: TicketCommands::Add { id: None, .. }
        }
    ));
}
