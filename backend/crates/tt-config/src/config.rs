use crate::{
    BillingConfig, BusinessHoursConfig, CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigError,
    ConfigErrorResult, CoordinatorConfig, DEFAULT_CONFIG_DIR, DatabaseConfig, EmergencyConfig,
    LoggingConfig, RateConfig, TimerConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub business_hours: BusinessHoursConfig,
    pub rates: RateConfig,
    pub emergency: EmergencyConfig,
    pub timer: TimerConfig,
    pub billing: BillingConfig,
    pub coordinator: CoordinatorConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for TT_CONFIG_DIR env var, else use ./.tt/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply TT_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Parse a TOML document without touching the filesystem or environment.
    pub fn from_toml_str(contents: &str) -> ConfigErrorResult<Self> {
        toml::from_str(contents).map_err(|e| ConfigError::Toml {
            path: PathBuf::from("<inline>"),
            source: e,
        })
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: TT_CONFIG_DIR env var > ./.tt/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.business_hours.validate()?;
        self.rates.validate()?;
        self.emergency.validate()?;
        self.timer.validate()?;
        self.billing.validate()?;
        self.coordinator.validate()?;

        let db_dir = Path::new(&self.database.directory);
        if db_dir.is_absolute() || self.database.directory.contains("..") {
            return Err(ConfigError::database(
                "database.directory must be relative and cannot contain '..'",
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::database(
                "database.max_connections must be at least 1",
            ));
        }

        Ok(())
    }

    /// Absolute path of the directory holding per-company databases.
    pub fn database_dir(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.database.directory))
    }

    /// Absolute path of the log file, if file logging is configured.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        match &self.logging.file {
            Some(file) => Ok(Some(Self::config_dir()?.join(file))),
            None => Ok(None),
        }
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  database: {} (max {} connections, busy timeout {}ms)",
            self.database.directory, self.database.max_connections, self.database.busy_timeout_ms
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
        info!(
            "  business_hours: {}-{} UTC{:+}m, {} business days, {} holidays",
            self.business_hours.start,
            self.business_hours.end,
            self.business_hours.utc_offset_minutes,
            self.business_hours.business_days.len(),
            self.business_hours.holidays.len()
        );
        info!(
            "  rates: emergency={}x holiday={}x weekend={}x after_hours={}x",
            self.rates.emergency, self.rates.holiday, self.rates.weekend, self.rates.after_hours
        );
        info!(
            "  emergency: {} keywords, priorities={:?}",
            self.emergency.keywords.len(),
            self.emergency.critical_priorities
        );
        info!(
            "  timer: min_desc={}, {} work types, overtime={}h",
            self.timer.min_description_length,
            self.timer.work_types.len(),
            self.timer.overtime_hours
        );
        info!(
            "  billing: default_rate={}, {} overrides, increment={}h",
            self.billing.default_hourly_rate,
            self.billing.work_type_rates.len(),
            self.billing.rounding_increment_hours
        );
        info!(
            "  coordinator: ttl={}ms, capacity={}",
            self.coordinator.cache_ttl_ms, self.coordinator.channel_capacity
        );
    }

    fn apply_env_overrides(&mut self) {
        // Database
        Self::apply_env_string("TT_DATABASE_DIRECTORY", &mut self.database.directory);
        Self::apply_env_parse(
            "TT_DATABASE_MAX_CONNECTIONS",
            &mut self.database.max_connections,
        );

        // Logging
        Self::apply_env_parse("TT_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("TT_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("TT_LOG_FILE", &mut self.logging.file);

        // Business hours
        Self::apply_env_string("TT_BUSINESS_HOURS_START", &mut self.business_hours.start);
        Self::apply_env_string("TT_BUSINESS_HOURS_END", &mut self.business_hours.end);
        Self::apply_env_parse(
            "TT_BUSINESS_HOURS_UTC_OFFSET_MINUTES",
            &mut self.business_hours.utc_offset_minutes,
        );

        // Rates
        Self::apply_env_parse("TT_RATE_EMERGENCY", &mut self.rates.emergency);
        Self::apply_env_parse("TT_RATE_HOLIDAY", &mut self.rates.holiday);
        Self::apply_env_parse("TT_RATE_WEEKEND", &mut self.rates.weekend);
        Self::apply_env_parse("TT_RATE_AFTER_HOURS", &mut self.rates.after_hours);

        // Timer
        Self::apply_env_parse(
            "TT_TIMER_MIN_DESCRIPTION_LENGTH",
            &mut self.timer.min_description_length,
        );
        Self::apply_env_parse("TT_TIMER_OVERTIME_HOURS", &mut self.timer.overtime_hours);
        Self::apply_env_bool("TT_TIMER_COMMENT_ON_STOP", &mut self.timer.comment_on_stop);

        // Billing
        Self::apply_env_parse(
            "TT_BILLING_DEFAULT_HOURLY_RATE",
            &mut self.billing.default_hourly_rate,
        );
        Self::apply_env_parse(
            "TT_BILLING_ROUNDING_INCREMENT_HOURS",
            &mut self.billing.rounding_increment_hours,
        );

        // Coordinator
        Self::apply_env_parse(
            "TT_COORDINATOR_CACHE_TTL_MS",
            &mut self.coordinator.cache_ttl_ms,
        );
    }

    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
