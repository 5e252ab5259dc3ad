use serde::{Deserialize, Serialize};

/// The condition that set a timer's rate. Ordered by precedence, highest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RateKind {
    Emergency,
    Holiday,
    Weekend,
    AfterHours,
    Standard,
}

impl RateKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Emergency => "Emergency",
            Self::Holiday => "Holiday",
            Self::Weekend => "Weekend",
            Self::AfterHours => "After Hours",
            Self::Standard => "Standard",
        }
    }

    /// Inverse of [`RateKind::label`], used when reading a recorded rate back.
    pub fn from_label(label: &str) -> Option<Self> {
        [
            Self::Emergency,
            Self::Holiday,
            Self::Weekend,
            Self::AfterHours,
            Self::Standard,
        ]
        .into_iter()
        .find(|kind| kind.label() == label)
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Emergency => "red",
            Self::Holiday => "purple",
            Self::Weekend => "orange",
            Self::AfterHours => "yellow",
            Self::Standard => "green",
        }
    }
}
