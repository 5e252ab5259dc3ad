use crate::DEFAULT_DATABASE_DIRECTORY;

use serde::Deserialize;

/// Per-company SQLite databases live under `<config dir>/<directory>/<company id>/`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub directory: String,
    pub max_connections: u32,
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            directory: String::from(DEFAULT_DATABASE_DIRECTORY),
            max_connections: 5,
            busy_timeout_ms: 5000,
        }
    }
}
