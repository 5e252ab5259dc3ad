use crate::{CoreError, CoreResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Timer,
    Manual,
}

impl EntryType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Timer => "timer",
            Self::Manual => "manual",
        }
    }
}

impl FromStr for EntryType {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "timer" => Ok(Self::Timer),
            "manual" => Ok(Self::Manual),
            _ => Err(CoreError::InvalidEntryType {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
