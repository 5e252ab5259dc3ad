use tt_core::CoreError;
use tt_db::DbError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{entity} {id} not found {location}")]
    NotFound {
        entity: &'static str,
        id: Uuid,
        location: ErrorLocation,
    },

    #[error("User already has open timers {existing:?} {location}")]
    Conflict {
        existing: Vec<Uuid>,
        location: ErrorLocation,
    },

    #[error("Cannot {action} time entry {entry_id} while {state} {location}")]
    InvalidState {
        entry_id: Uuid,
        state: String,
        action: &'static str,
        location: ErrorLocation,
    },

    #[error("Validation failed: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("Forbidden: {message} {location}")]
    Forbidden {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid engine configuration: {message} {location}")]
    Configuration {
        message: String,
        location: ErrorLocation,
    },

    #[error("Storage error: {source} {location}")]
    Storage {
        #[source]
        source: DbError,
        location: ErrorLocation,
    },
}

impl EngineError {
    #[track_caller]
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound {
            entity,
            id,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn conflict(existing: Vec<Uuid>) -> Self {
        Self::Conflict {
            existing,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_state(entry_id: Uuid, state: impl Into<String>, action: &'static str) -> Self {
        Self::InvalidState {
            entry_id,
            state: state.into(),
            action,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.to_string()),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Stable identifier for callers that map errors to their own surface.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::Configuration { .. } => "CONFIG_ERROR",
            Self::Storage { .. } => "STORAGE_ERROR",
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Storage { source, .. } => source.is_retryable(),
            _ => false,
        }
    }
}

impl From<DbError> for EngineError {
    #[track_caller]
    fn from(source: DbError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match source {
            // The conflicting ids are not known here; callers that can list
            // them map the violation themselves.
            DbError::UniqueViolation { .. } => Self::Conflict {
                existing: Vec::new(),
                location,
            },
            source => Self::Storage { source, location },
        }
    }
}

impl From<sqlx::Error> for EngineError {
    #[track_caller]
    fn from(source: sqlx::Error) -> Self {
        Self::from(DbError::from(source))
    }
}

impl From<CoreError> for EngineError {
    #[track_caller]
    fn from(source: CoreError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match source {
            CoreError::InvalidTransition {
                entry_id,
                state,
                action,
                ..
            } => Self::InvalidState {
                entry_id,
                state: state.to_string(),
                action,
                location,
            },
            other => Self::Validation {
                message: other.to_string(),
                field: None,
                location,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
