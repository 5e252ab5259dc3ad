use crate::{RateBadge, RateKind, RateRules, TicketContext};

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};

/// Picks the single dominant rate condition for an instant.
///
/// Conditions are checked in precedence order (emergency, holiday, weekend,
/// after-hours) and the first match wins. Multipliers never stack.
#[derive(Debug, Clone, Default)]
pub struct RateCalculator {
    rules: RateRules,
}

impl RateCalculator {
    pub fn new(rules: RateRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RateRules {
        &self.rules
    }

    pub fn evaluate(&self, at: DateTime<Utc>, ticket: Option<&TicketContext>) -> RateBadge {
        let kind = self.classify(at, ticket);
        let multipliers = &self.rules.multipliers;
        let multiplier = match kind {
            RateKind::Emergency => multipliers.emergency,
            RateKind::Holiday => multipliers.holiday,
            RateKind::Weekend => multipliers.weekend,
            RateKind::AfterHours => multipliers.after_hours,
            RateKind::Standard => rust_decimal::Decimal::ONE,
        };
        RateBadge::new(kind, multiplier)
    }

    /// Calendar date of `at` in the business-hours timezone.
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.rules.utc_offset).date_naive()
    }

    pub fn classify(&self, at: DateTime<Utc>, ticket: Option<&TicketContext>) -> RateKind {
        let local = at.with_timezone(&self.rules.utc_offset);
        let date = local.date_naive();

        if ticket.is_some_and(|t| self.is_emergency(t)) {
            RateKind::Emergency
        } else if self.is_holiday(date) {
            RateKind::Holiday
        } else if !self.is_business_day(date) {
            RateKind::Weekend
        } else if !self.is_business_hours(local.time()) {
            RateKind::AfterHours
        } else {
            RateKind::Standard
        }
    }

    pub fn is_emergency(&self, ticket: &TicketContext) -> bool {
        let critical_priority = ticket.priority.as_deref().is_some_and(|priority| {
            self.rules
                .critical_priorities
                .iter()
                .any(|p| p.eq_ignore_ascii_case(priority.trim()))
        });

        critical_priority || contains_keyword(&ticket.searchable_text(), &self.rules.emergency_keywords)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.rules.holidays.contains(&date)
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        self.rules.business_days.contains(&date.weekday())
    }

    pub fn is_business_hours(&self, time: NaiveTime) -> bool {
        let start = self.rules.business_start;
        let end = self.rules.business_end;
        if start < end {
            time >= start && time < end
        } else {
            time >= start || time < end
        }
    }
}

/// Whole-word match for single-word keywords ("down" does not match
/// "download"); phrase keywords match as substrings.
fn contains_keyword(text: &str, keywords: &[String]) -> bool {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    keywords.iter().any(|keyword| {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            false
        } else if keyword.contains(char::is_whitespace) {
            lowered.contains(&keyword)
        } else {
            words.iter().any(|w| *w == keyword)
        }
    })
}
