use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TIME_ENTRY_ENTITY: &str = "time_entry";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: Uuid,

    pub entity_type: String,
    pub entity_id: Uuid,

    pub action: String,

    pub field_name: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,

    pub user_id: Uuid,
    pub timestamp: DateTime<Utc>,

    pub comment: Option<String>,
}

impl ActivityLog {
    pub fn new(
        entity_type: String,
        entity_id: Uuid,
        action: String,
        user_id: Uuid,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity_type,
            entity_id,
            action,
            field_name: None,
            old_value: None,
            new_value: None,
            user_id,
            timestamp,
            comment: None,
        }
    }

    pub fn time_entry(entry_id: Uuid, action: &str, user_id: Uuid, timestamp: DateTime<Utc>) -> Self {
        Self::new(
            TIME_ENTRY_ENTITY.to_string(),
            entry_id,
            action.to_string(),
            user_id,
            timestamp,
        )
    }

    pub fn with_change(
        mut self,
        field_name: &str,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        self.field_name = Some(field_name.to_string());
        self.old_value = old_value;
        self.new_value = new_value;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}
