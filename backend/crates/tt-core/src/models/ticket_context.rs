use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The slice of a ticket the rate calculator and timer lifecycle need.
///
/// Tickets are owned by the surrounding application; the engine only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketContext {
    pub ticket_id: Uuid,
    pub company_id: Uuid,
    pub priority: Option<String>,
    pub subject: String,
    pub description: Option<String>,
}

impl TicketContext {
    /// Subject and description joined for keyword scanning.
    pub fn searchable_text(&self) -> String {
        match &self.description {
            Some(description) => format!("{} {}", self.subject, description),
            None => self.subject.clone(),
        }
    }
}
