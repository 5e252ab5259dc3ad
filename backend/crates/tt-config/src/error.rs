use std::panic::Location;
use std::path::PathBuf;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum ConfigError {
    #[error("{category} error: {message} {location}")]
    Generic {
        category: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[track_caller]
    fn generic<S: Into<String>>(category: &'static str, message: S) -> Self {
        ConfigError::Generic {
            category,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create a config error
    #[track_caller]
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::generic("Config", message)
    }

    /// Create a database error
    #[track_caller]
    pub fn database<S: Into<String>>(message: S) -> Self {
        Self::generic("Database", message)
    }

    /// Create a business hours error
    #[track_caller]
    pub fn business_hours<S: Into<String>>(message: S) -> Self {
        Self::generic("BusinessHours", message)
    }

    /// Create a rate error
    #[track_caller]
    pub fn rate<S: Into<String>>(message: S) -> Self {
        Self::generic("Rate", message)
    }

    /// Create a timer error
    #[track_caller]
    pub fn timer<S: Into<String>>(message: S) -> Self {
        Self::generic("Timer", message)
    }

    /// Create a billing error
    #[track_caller]
    pub fn billing<S: Into<String>>(message: S) -> Self {
        Self::generic("Billing", message)
    }
}

pub type ConfigErrorResult<T> = StdResult<T, ConfigError>;
