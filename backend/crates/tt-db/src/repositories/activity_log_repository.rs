use crate::Result as DbErrorResult;
use crate::row_mapping;

use tt_core::ActivityLog;

use sqlx::Row;
use uuid::Uuid;

pub struct ActivityLogRepository;

impl ActivityLogRepository {
    pub async fn create<'e, E>(executor: E, log: &ActivityLog) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
              INSERT INTO activity_log (
                  id, entity_type, entity_id, action,
                  field_name, old_value, new_value,
                  user_id, timestamp, comment
              ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
              "#,
        )
        .bind(log.id.to_string())
        .bind(log.entity_type.as_str())
        .bind(log.entity_id.to_string())
        .bind(log.action.as_str())
        .bind(log.field_name.as_deref())
        .bind(log.old_value.as_deref())
        .bind(log.new_value.as_deref())
        .bind(log.user_id.to_string())
        .bind(log.timestamp.timestamp())
        .bind(log.comment.as_deref())
        .execute(executor)
        .await?;

        Ok(())
    }

    /// History of one entity, oldest first.
    pub async fn find_by_entity<'e, E>(
        executor: E,
        entity_type: &str,
        entity_id: Uuid,
    ) -> DbErrorResult<Vec<ActivityLog>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let rows = sqlx::query(
            r#"
              SELECT id, entity_type, entity_id, action,
                     field_name, old_value, new_value,
                     user_id, timestamp, comment
              FROM activity_log
              WHERE entity_type = ? AND entity_id = ?
              ORDER BY timestamp ASC, rowid ASC
              "#,
        )
        .bind(entity_type)
        .bind(entity_id.to_string())
        .fetch_all(executor)
        .await?;

        rows.iter()
            .map(|row| -> DbErrorResult<ActivityLog> {
                Ok(ActivityLog {
                    id: row_mapping::uuid(row, "id")?,
                    entity_type: row.try_get("entity_type")?,
                    entity_id: row_mapping::uuid(row, "entity_id")?,
                    action: row.try_get("action")?,
                    field_name: row.try_get("field_name")?,
                    old_value: row.try_get("old_value")?,
                    new_value: row.try_get("new_value")?,
                    user_id: row_mapping::uuid(row, "user_id")?,
                    timestamp: row_mapping::timestamp(row, "timestamp")?,
                    comment: row.try_get("comment")?,
                })
            })
            .collect()
    }
}
