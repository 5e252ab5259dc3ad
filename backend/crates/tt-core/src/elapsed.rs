//! Elapsed working time.
//!
//! Every surface that shows a timer renders from these functions so that the
//! same inputs always produce the same digits.

use chrono::{DateTime, Utc};

pub const SECONDS_PER_HOUR: i64 = 3600;

/// Net working seconds between `started_at` and `now`.
///
/// Clock skew and corrupted pause totals clamp to zero instead of failing.
/// A negative pause total is treated as no pause.
pub fn elapsed_seconds(started_at: DateTime<Utc>, now: DateTime<Utc>, paused_seconds: i64) -> i64 {
    let raw = (now - started_at).num_seconds();
    raw.saturating_sub(paused_seconds.max(0)).max(0)
}

/// `HH:MM:SS`; hours are not wrapped at 24.
pub fn format_hms(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / SECONDS_PER_HOUR;
    let minutes = (seconds % SECONDS_PER_HOUR) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

pub fn is_overtime(elapsed_seconds: i64, threshold_seconds: i64) -> bool {
    threshold_seconds > 0 && elapsed_seconds > threshold_seconds
}
