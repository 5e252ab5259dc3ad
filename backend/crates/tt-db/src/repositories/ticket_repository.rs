use crate::Result as DbErrorResult;
use crate::row_mapping;

use tt_core::TicketContext;

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

/// Read access to tickets, plus an upsert used by the CLI and tests to
/// register tickets owned elsewhere.
pub struct TicketRepository;

impl TicketRepository {
    pub async fn find_context<'e, E>(
        executor: E,
        ticket_id: Uuid,
    ) -> DbErrorResult<Option<TicketContext>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let row = sqlx::query(
            r#"
              SELECT id, company_id, subject, description, priority
              FROM tickets
              WHERE id = ?
              "#,
        )
        .bind(ticket_id.to_string())
        .fetch_optional(executor)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(TicketContext {
            ticket_id: row_mapping::uuid(&row, "id")?,
            company_id: row_mapping::uuid(&row, "company_id")?,
            priority: row.try_get("priority")?,
            subject: row.try_get("subject")?,
            description: row.try_get("description")?,
        }))
    }

    pub async fn upsert<'e, E>(
        executor: E,
        ticket: &TicketContext,
        created_at: DateTime<Utc>,
    ) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
              INSERT INTO tickets (id, company_id, subject, description, priority, created_at)
              VALUES (?, ?, ?, ?, ?, ?)
              ON CONFLICT(id) DO UPDATE SET
                  subject = excluded.subject,
                  description = excluded.description,
                  priority = excluded.priority
              "#,
        )
        .bind(ticket.ticket_id.to_string())
        .bind(ticket.company_id.to_string())
        .bind(ticket.subject.as_str())
        .bind(ticket.description.as_deref())
        .bind(ticket.priority.as_deref())
        .bind(created_at.timestamp())
        .execute(executor)
        .await?;

        Ok(())
    }
}
