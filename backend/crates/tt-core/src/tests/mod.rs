mod models;

use chrono::{DateTime, TimeZone, Utc};

/// UTC instant from calendar parts; panics on an impossible date.
pub(crate) fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
        .expect("valid test timestamp")
}
