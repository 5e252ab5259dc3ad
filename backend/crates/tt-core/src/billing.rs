//! Hours and amount for a finished entry.

use crate::elapsed::SECONDS_PER_HOUR;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

const HOURS_WORKED_SCALE: u32 = 4;
const AMOUNT_SCALE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingFigures {
    pub hours_worked: Decimal,
    pub hours_billed: Decimal,
    pub amount: Decimal,
}

pub fn hours_from_seconds(seconds: i64) -> Decimal {
    Decimal::from(seconds.max(0)) / Decimal::from(SECONDS_PER_HOUR)
}

/// Round to the nearest multiple of `increment`, halves rounding up.
/// A non-positive increment disables rounding.
pub fn round_to_increment(hours: Decimal, increment: Decimal) -> Decimal {
    if increment <= Decimal::ZERO {
        return hours;
    }

    let steps = (hours / increment)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    (steps * increment).normalize()
}

/// `amount = billable ? hours_billed × hourly_rate × multiplier : 0`.
pub fn compute_billing(
    net_seconds: i64,
    hourly_rate: Decimal,
    multiplier: Decimal,
    billable: bool,
    increment: Decimal,
) -> BillingFigures {
    let exact_hours = hours_from_seconds(net_seconds);
    let hours_billed = round_to_increment(exact_hours, increment);

    let amount = if billable {
        (hours_billed * hourly_rate * multiplier)
            .round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    };

    BillingFigures {
        hours_worked: exact_hours
            .round_dp_with_strategy(HOURS_WORKED_SCALE, RoundingStrategy::MidpointAwayFromZero),
        hours_billed,
        amount,
    }
}
