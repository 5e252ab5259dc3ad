use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmergencyConfig {
    /// Words in a ticket's subject or description that mark it as an emergency
    pub keywords: Vec<String>,
    /// Ticket priorities treated as emergencies regardless of wording
    pub critical_priorities: Vec<String>,
}

impl Default for EmergencyConfig {
    fn default() -> Self {
        Self {
            keywords: ["urgent", "critical", "down", "outage", "emergency"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            critical_priorities: vec![String::from("critical")],
        }
    }
}

impl EmergencyConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::rate("emergency.keywords cannot contain blanks"));
        }

        if self.critical_priorities.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::rate(
                "emergency.critical_priorities cannot contain blanks",
            ));
        }

        Ok(())
    }
}
