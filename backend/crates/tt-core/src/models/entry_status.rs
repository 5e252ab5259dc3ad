use crate::{CoreError, CoreResult};

use std::fmt;
use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Approval lifecycle of a time entry.
///
/// Timers are created as `Draft` and become `Submitted` when stopped.
/// Downstream billing moves them through approval and invoicing; once
/// `Approved` the entry can no longer be edited or deleted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Rejected,
    Invoiced,
    Paid,
}

impl EntryStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Invoiced => "invoiced",
            Self::Paid => "paid",
        }
    }

    /// Only draft and submitted entries accept corrections or deletion.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::Submitted)
    }

    pub fn can_transition_to(&self, target: EntryStatus) -> bool {
        matches!(
            (self, target),
            (Self::Submitted, Self::Approved)
                | (Self::Submitted, Self::Rejected)
                | (Self::Rejected, Self::Submitted)
                | (Self::Approved, Self::Invoiced)
                | (Self::Invoiced, Self::Paid)
        )
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "invoiced" => Ok(Self::Invoiced),
            "paid" => Ok(Self::Paid),
            _ => Err(CoreError::InvalidEntryStatus {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
