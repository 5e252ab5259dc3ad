use crate::tests::monday;
use crate::{EngineSettings, Pricing};

use tt_config::Config;
use tt_core::{RateBadge, RateKind, TicketContext, TimeEntry};

use chrono::{Duration, TimeZone, Utc};
use googletest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

fn dec(s: &str) -> Decimal {
    s.parse().expect("valid decimal")
}

fn critical_ticket() -> TicketContext {
    TicketContext {
        ticket_id: Uuid::new_v4(),
        company_id: Uuid::new_v4(),
        priority: Some("critical".to_string()),
        subject: "Mail server unreachable".to_string(),
        description: None,
    }
}

fn pricing_from(toml: &str) -> Pricing {
    let config = Config::from_toml_str(toml).expect("valid test config");
    Pricing::from_config(&config).expect("valid pricing")
}

#[test]
fn given_default_config_when_converted_then_rates_and_increment_exact() {
    let pricing = pricing_from("");

    assert_that!(pricing.hourly_rate_for("general_support"), eq(dec("100")));
    assert_that!(pricing.rounding_increment(), eq(dec("0.25")));
    assert_that!(
        pricing.calculator().rules().multipliers.after_hours,
        eq(dec("1.5"))
    );
}

#[test]
fn given_work_type_override_when_rate_looked_up_then_override_used() {
    let pricing = pricing_from(
        r#"
        [billing]
        default_hourly_rate = 90.0
        [billing.work_type_rates]
        project_work = 135.5
        "#,
    );

    assert_that!(pricing.hourly_rate_for("project_work"), eq(dec("135.5")));
    assert_that!(pricing.hourly_rate_for("travel"), eq(dec("90")));
}

#[test]
fn given_offset_ahead_of_utc_when_late_utc_evening_then_work_date_is_next_day() {
    let pricing = pricing_from(
        r#"
        [business_hours]
        utc_offset_minutes = 600
        "#,
    );
    let sunday_evening = Utc.with_ymd_and_hms(2026, 3, 1, 20, 0, 0).unwrap();

    let work_date = pricing.work_date(sunday_evening);

    assert_eq!(work_date.to_string(), "2026-03-02");
}

#[test]
fn given_invalid_business_hours_when_converted_then_configuration_error() {
    let config = Config::from_toml_str(
        r#"
        [business_hours]
        start = "8am"
        "#,
    )
    .unwrap();

    let err = Pricing::from_config(&config).unwrap_err();

    assert_eq!(err.error_code(), "CONFIG_ERROR");
}

#[test]
fn given_critical_ticket_on_saturday_night_when_rated_then_emergency() {
    let pricing = Pricing::default();
    let saturday_2am = Utc.with_ymd_and_hms(2026, 3, 7, 2, 0, 0).unwrap();

    let badge = pricing.rate_for(saturday_2am, Some(&critical_ticket()));

    assert_that!(badge.kind, eq(RateKind::Emergency));
    assert_that!(badge.multiplier, eq(dec("2.0")));
}

#[test]
fn given_ten_net_minutes_when_previewed_then_quarter_hour_billed() {
    let pricing = Pricing::default();
    let mut entry = TimeEntry::start_timer(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        monday(10, 0),
        &RateBadge::standard(),
    );
    entry.pause(monday(10, 5), "phone call").unwrap();
    entry.resume(monday(10, 10)).unwrap();

    let (badge, hourly_rate, figures) = pricing.preview(&entry, None, monday(10, 15));

    assert_that!(badge.kind, eq(RateKind::Standard));
    assert_that!(hourly_rate, eq(dec("100")));
    assert_that!(figures.hours_worked, eq(dec("0.1667")));
    assert_that!(figures.hours_billed, eq(dec("0.25")));
    assert_that!(figures.amount, eq(dec("25.00")));
}

#[test]
fn given_closed_entry_when_priced_then_rate_evaluated_at_start() {
    let pricing = Pricing::default();
    // Starts after hours, runs into business hours
    let mut entry = TimeEntry::start_timer(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        monday(7, 0),
        &RateBadge::standard(),
    );
    entry.close(monday(9, 0)).unwrap();

    pricing.price(&mut entry, None);

    assert_that!(entry.rate_label, eq("After Hours"));
    assert_that!(entry.rate_multiplier, eq(dec("1.5")));
    assert_that!(entry.hours_billed, some(eq(dec("2"))));
    assert_that!(entry.amount, some(eq(dec("300.00"))));
}

#[test]
fn given_billable_flag_cleared_when_rebilled_then_amount_zero_and_multiplier_kept() {
    let pricing = Pricing::default();
    let mut entry = TimeEntry::start_timer(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        monday(10, 0),
        &RateBadge::standard(),
    );
    entry.close(monday(10, 0) + Duration::hours(1)).unwrap();
    entry.rate_multiplier = dec("2.0");
    entry.rate_label = "Emergency".to_string();

    entry.billable = false;
    pricing.rebill(&mut entry);

    assert_that!(entry.rate_multiplier, eq(dec("2.0")));
    assert_that!(entry.hours_billed, some(eq(dec("1"))));
    assert_that!(entry.amount, some(eq(Decimal::ZERO)));
}

#[test]
fn given_default_config_when_settings_built_then_overtime_in_seconds() {
    let config = Config::default();

    let settings = EngineSettings::from_config(&config).unwrap();

    assert_that!(settings.overtime_seconds, eq(8 * 3600));
    assert_that!(settings.default_work_type, eq("general_support"));
    assert_that!(settings.comment_on_stop, eq(true));
}
