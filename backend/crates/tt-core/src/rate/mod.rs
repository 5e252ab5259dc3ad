pub mod rate_badge;
pub mod rate_calculator;
pub mod rate_kind;
pub mod rate_rules;
