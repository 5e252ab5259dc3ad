use crate::RateKind;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBadge {
    pub kind: RateKind,
    pub multiplier: Decimal,
    pub label: String,
    pub color: String,
}

impl RateBadge {
    pub fn new(kind: RateKind, multiplier: Decimal) -> Self {
        Self {
            kind,
            multiplier,
            label: kind.label().to_string(),
            color: kind.color().to_string(),
        }
    }

    /// Rebuild the badge from the label and multiplier stored on an entry.
    /// Unknown labels keep their text but render as standard.
    pub fn recorded(label: &str, multiplier: Decimal) -> Self {
        let kind = RateKind::from_label(label).unwrap_or(RateKind::Standard);
        Self {
            kind,
            multiplier,
            label: label.to_string(),
            color: kind.color().to_string(),
        }
    }

    pub fn standard() -> Self {
        Self::new(RateKind::Standard, Decimal::ONE)
    }
}
