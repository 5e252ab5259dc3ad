use crate::{EngineError, Result as EngineResult};

use tt_config::Config;
use tt_core::{
    BillingFigures, RateBadge, RateCalculator, RateMultipliers, RateRules, TicketContext,
    TimeEntry, compute_billing,
};

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

const CONFIG_DECIMAL_SCALE: u32 = 4;

/// Rate evaluation plus the hourly-rate table and rounding increment.
#[derive(Debug, Clone)]
pub struct Pricing {
    calculator: RateCalculator,
    default_hourly_rate: Decimal,
    work_type_rates: HashMap<String, Decimal>,
    rounding_increment: Decimal,
}

impl Pricing {
    pub fn new(
        calculator: RateCalculator,
        default_hourly_rate: Decimal,
        work_type_rates: HashMap<String, Decimal>,
        rounding_increment: Decimal,
    ) -> Self {
        Self {
            calculator,
            default_hourly_rate,
            work_type_rates,
            rounding_increment,
        }
    }

    pub fn from_config(config: &Config) -> EngineResult<Self> {
        let hours = &config.business_hours;
        let rules = RateRules {
            business_start: hours.start_time().map_err(config_error)?,
            business_end: hours.end_time().map_err(config_error)?,
            utc_offset: hours.utc_offset().map_err(config_error)?,
            business_days: hours.business_days.clone(),
            holidays: hours.holidays.clone(),
            emergency_keywords: config.emergency.keywords.clone(),
            critical_priorities: config.emergency.critical_priorities.clone(),
            multipliers: RateMultipliers {
                emergency: to_decimal("rates.emergency", config.rates.emergency)?,
                holiday: to_decimal("rates.holiday", config.rates.holiday)?,
                weekend: to_decimal("rates.weekend", config.rates.weekend)?,
                after_hours: to_decimal("rates.after_hours", config.rates.after_hours)?,
            },
        };

        let work_type_rates = config
            .billing
            .work_type_rates
            .iter()
            .map(|(work_type, rate)| {
                to_decimal("billing.work_type_rates", *rate).map(|r| (work_type.clone(), r))
            })
            .collect::<EngineResult<HashMap<_, _>>>()?;

        Ok(Self::new(
            RateCalculator::new(rules),
            to_decimal("billing.default_hourly_rate", config.billing.default_hourly_rate)?,
            work_type_rates,
            to_decimal(
                "billing.rounding_increment_hours",
                config.billing.rounding_increment_hours,
            )?,
        ))
    }

    pub fn calculator(&self) -> &RateCalculator {
        &self.calculator
    }

    pub fn rounding_increment(&self) -> Decimal {
        self.rounding_increment
    }

    /// Rate for a session, decided by the conditions at its start.
    pub fn rate_for(&self, started_at: DateTime<Utc>, ticket: Option<&TicketContext>) -> RateBadge {
        self.calculator.evaluate(started_at, ticket)
    }

    /// Day an entry starting at `started_at` is booked against.
    pub fn work_date(&self, started_at: DateTime<Utc>) -> NaiveDate {
        self.calculator.local_date(started_at)
    }

    pub fn hourly_rate_for(&self, work_type: &str) -> Decimal {
        self.work_type_rates
            .get(work_type)
            .copied()
            .unwrap_or(self.default_hourly_rate)
    }

    /// Figures the entry would carry if it were closed at `now`.
    pub fn preview(
        &self,
        entry: &TimeEntry,
        ticket: Option<&TicketContext>,
        now: DateTime<Utc>,
    ) -> (RateBadge, Decimal, BillingFigures) {
        let rate = self.rate_for(entry.started_at, ticket);
        let hourly_rate = self.hourly_rate_for(&entry.work_type);
        let figures = compute_billing(
            entry.elapsed_seconds_at(now),
            hourly_rate,
            rate.multiplier,
            entry.billable,
            self.rounding_increment,
        );
        (rate, hourly_rate, figures)
    }

    /// Evaluate the rate and fill in the billing figures of a closed entry.
    pub fn price(&self, entry: &mut TimeEntry, ticket: Option<&TicketContext>) {
        let rate = self.rate_for(entry.started_at, ticket);
        entry.apply_rate(self.hourly_rate_for(&entry.work_type), &rate);
        self.rebill(entry);
    }

    /// Recompute figures keeping the recorded multiplier. The hourly rate
    /// follows the entry's current work type.
    pub fn rebill(&self, entry: &mut TimeEntry) {
        entry.hourly_rate = self.hourly_rate_for(&entry.work_type);
        let until = entry.ended_at.unwrap_or(entry.updated_at);
        let figures = compute_billing(
            entry.elapsed_seconds_at(until),
            entry.hourly_rate,
            entry.rate_multiplier,
            entry.billable,
            self.rounding_increment,
        );
        entry.apply_billing(&figures);
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Self::new(
            RateCalculator::default(),
            Decimal::ONE_HUNDRED,
            HashMap::new(),
            Decimal::new(25, 2),
        )
    }
}

#[track_caller]
fn config_error(e: tt_config::ConfigError) -> EngineError {
    EngineError::configuration(e.to_string())
}

#[track_caller]
fn to_decimal(field: &str, value: f64) -> EngineResult<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(CONFIG_DECIMAL_SCALE).normalize())
        .ok_or_else(|| EngineError::configuration(format!("{} is not a number: {}", field, value)))
}
