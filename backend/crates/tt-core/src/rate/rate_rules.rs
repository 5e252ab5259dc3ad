use chrono::{FixedOffset, NaiveDate, NaiveTime, Offset, Utc, Weekday};
use rust_decimal::Decimal;

pub const DEFAULT_EMERGENCY_KEYWORDS: [&str; 5] =
    ["urgent", "critical", "down", "outage", "emergency"];
pub const DEFAULT_CRITICAL_PRIORITIES: [&str; 1] = ["critical"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateMultipliers {
    pub emergency: Decimal,
    pub holiday: Decimal,
    pub weekend: Decimal,
    pub after_hours: Decimal,
}

impl Default for RateMultipliers {
    fn default() -> Self {
        Self {
            emergency: Decimal::TWO,
            holiday: Decimal::TWO,
            weekend: Decimal::new(15, 1),
            after_hours: Decimal::new(15, 1),
        }
    }
}

/// Calendar and keyword inputs for rate evaluation.
///
/// Business hours are the half-open window `[business_start, business_end)`
/// in local time at `utc_offset`. A window whose end is not after its start
/// wraps past midnight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateRules {
    pub business_start: NaiveTime,
    pub business_end: NaiveTime,
    pub utc_offset: FixedOffset,
    pub business_days: Vec<Weekday>,
    pub holidays: Vec<NaiveDate>,
    pub emergency_keywords: Vec<String>,
    pub critical_priorities: Vec<String>,
    pub multipliers: RateMultipliers,
}

impl Default for RateRules {
    fn default() -> Self {
        Self {
            business_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            business_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
            utc_offset: Utc.fix(),
            business_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            holidays: Vec::new(),
            emergency_keywords: DEFAULT_EMERGENCY_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            critical_priorities: DEFAULT_CRITICAL_PRIORITIES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            multipliers: RateMultipliers::default(),
        }
    }
}
