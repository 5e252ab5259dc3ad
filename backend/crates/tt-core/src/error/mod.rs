use crate::TimerState;

use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {message} {location}")]
    Validation {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid entry type: {value} {location}")]
    InvalidEntryType {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid entry status: {value} {location}")]
    InvalidEntryStatus {
        value: String,
        location: ErrorLocation,
    },

    #[error("Cannot {action} time entry {entry_id} while {state} {location}")]
    InvalidTransition {
        entry_id: Uuid,
        state: TimerState,
        action: &'static str,
        location: ErrorLocation,
    },
}

pub type CoreResult<T> = StdResult<T, CoreError>;
