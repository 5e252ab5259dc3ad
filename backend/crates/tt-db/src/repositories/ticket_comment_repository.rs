use crate::Result as DbErrorResult;
use crate::row_mapping;

use tt_core::TicketComment;

use sqlx::Row;
use uuid::Uuid;

pub struct TicketCommentRepository;

impl TicketCommentRepository {
    pub async fn create<'e, E>(executor: E, comment: &TicketComment) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
              INSERT INTO ticket_comments (id, ticket_id, author_id, body, internal, created_at)
              VALUES (?, ?, ?, ?, ?, ?)
              "#,
        )
        .bind(comment.id.to_string())
        .bind(comment.ticket_id.to_string())
        .bind(comment.author_id.to_string())
        .bind(comment.body.as_str())
        .bind(comment.internal)
        .bind(comment.created_at.timestamp())
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_by_ticket<'e, E>(
        executor: E,
        ticket_id: Uuid,
    ) -> DbErrorResult<Vec<TicketComment>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let rows = sqlx::query(
            r#"
              SELECT id, ticket_id, author_id, body, internal, created_at
              FROM ticket_comments
              WHERE ticket_id = ?
              ORDER BY created_at ASC, rowid ASC
              "#,
        )
        .bind(ticket_id.to_string())
        .fetch_all(executor)
        .await?;

        rows.iter()
            .map(|row| -> DbErrorResult<TicketComment> {
                Ok(TicketComment {
                    id: row_mapping::uuid(row, "id")?,
                    ticket_id: row_mapping::uuid(row, "ticket_id")?,
                    author_id: row_mapping::uuid(row, "author_id")?,
                    body: row.try_get("body")?,
                    internal: row.try_get("internal")?,
                    created_at: row_mapping::timestamp(row, "created_at")?,
                })
            })
            .collect()
    }
}
