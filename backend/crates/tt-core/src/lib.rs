pub mod billing;
pub mod elapsed;
pub mod error;
pub mod models;
pub mod rate;

#[cfg(test)]
mod tests;

pub use billing::{BillingFigures, compute_billing, hours_from_seconds, round_to_increment};
pub use elapsed::{elapsed_seconds, format_hms, is_overtime};
pub use error::{CoreError, CoreResult};
pub use models::activity_log::{ActivityLog, TIME_ENTRY_ENTITY};
pub use models::entry_status::EntryStatus;
pub use models::entry_type::EntryType;
pub use models::ticket_comment::TicketComment;
pub use models::ticket_context::TicketContext;
pub use models::time_entry::{DEFAULT_WORK_TYPE, TimeEntry};
pub use models::timer_state::TimerState;
pub use rate::rate_badge::RateBadge;
pub use rate::rate_calculator::RateCalculator;
pub use rate::rate_kind::RateKind;
pub use rate::rate_rules::{RateMultipliers, RateRules};
