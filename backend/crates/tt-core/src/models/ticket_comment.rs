use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketComment {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub author_id: Uuid,

    pub body: String,
    pub internal: bool,

    pub created_at: DateTime<Utc>,
}

impl TicketComment {
    /// Internal note left on a ticket by the time tracker.
    pub fn internal_note(
        ticket_id: Uuid,
        author_id: Uuid,
        body: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticket_id,
            author_id,
            body,
            internal: true,
            created_at,
        }
    }
}
