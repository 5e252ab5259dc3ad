mod billing_config;
mod business_hours_config;
mod config;
mod coordinator_config;
mod database_config;
mod emergency_config;
mod error;
mod log_level;
mod logging_config;
mod rate_config;
mod timer_config;

#[cfg(test)]
mod tests;

pub use billing_config::BillingConfig;
pub use business_hours_config::BusinessHoursConfig;
pub use config::Config;
pub use coordinator_config::CoordinatorConfig;
pub use database_config::DatabaseConfig;
pub use emergency_config::EmergencyConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use rate_config::RateConfig;
pub use timer_config::{MAX_PAUSE_REASON_LENGTH, TimerConfig};

const CONFIG_DIR_ENV: &str = "TT_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".tt";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_DATABASE_DIRECTORY: &str = "data";
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
