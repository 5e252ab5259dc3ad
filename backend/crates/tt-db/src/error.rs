use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

// SQLite primary/extended result codes for lock contention.
const SQLITE_BUSY: &str = "5";
const SQLITE_LOCKED: &str = "6";
const SQLITE_BUSY_SNAPSHOT: &str = "517";

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLx error: {source} {location}")]
    Sqlx {
        source: sqlx::Error,
        location: ErrorLocation,
    },

    #[error("Unique constraint violated: {message} {location}")]
    UniqueViolation {
        message: String,
        location: ErrorLocation,
    },

    #[error("Cannot decode column {column}: {message} {location}")]
    Decode {
        column: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("Migration error: {message} {location}")]
    Migration {
        message: String,
        location: ErrorLocation,
    },

    #[error("Database initialization failed: {message} {location}")]
    Initialization {
        message: String,
        location: ErrorLocation,
    },
}

impl DbError {
    /// Failures that may succeed if the operation is attempted again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Sqlx { source, .. } => match source {
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => true,
                sqlx::Error::Database(db) => matches!(
                    db.code().as_deref(),
                    Some(SQLITE_BUSY) | Some(SQLITE_LOCKED) | Some(SQLITE_BUSY_SNAPSHOT)
                ),
                _ => false,
            },
            _ => false,
        }
    }
}

impl From<sqlx::Error> for DbError {
    #[track_caller]
    fn from(source: sqlx::Error) -> Self {
        let location = ErrorLocation::from(Location::caller());

        if let sqlx::Error::Database(db) = &source
            && db.is_unique_violation()
        {
            return Self::UniqueViolation {
                message: db.message().to_string(),
                location,
            };
        }

        Self::Sqlx { source, location }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
