mod pricing;

use chrono::{DateTime, TimeZone, Utc};

/// UTC instant on 2026-03-02 (a Monday); panics on an impossible time.
pub(crate) fn monday(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0)
        .single()
        .expect("valid test timestamp")
}
