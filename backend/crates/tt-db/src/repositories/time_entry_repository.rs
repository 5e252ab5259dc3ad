use crate::Result as DbErrorResult;
use crate::row_mapping;

use tt_core::{EntryStatus, TimeEntry};

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    SELECT id, company_id, ticket_id, user_id,
           started_at, ended_at, work_date, paused_duration_seconds,
           paused, paused_at, pause_reason,
           entry_type, work_type, description, billable,
           hourly_rate, rate_multiplier, rate_label,
           hours_worked, hours_billed, amount,
           status, allow_concurrent, version, created_at, updated_at
    FROM time_entries
"#;

/// Row-level access to `time_entries`.
///
/// Every function takes an executor so callers can compose them inside a
/// transaction. Writes to open entries are guarded on `ended_at IS NULL` and
/// report whether a row matched, so a concurrent stop is never overwritten.
pub struct TimeEntryRepository;

impl TimeEntryRepository {
    pub async fn create<'e, E>(executor: E, entry: &TimeEntry) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
              INSERT INTO time_entries (
                  id, company_id, ticket_id, user_id,
                  started_at, ended_at, work_date, paused_duration_seconds,
                  paused, paused_at, pause_reason,
                  entry_type, work_type, description, billable,
                  hourly_rate, rate_multiplier, rate_label,
                  hours_worked, hours_billed, amount,
                  status, allow_concurrent, version, created_at, updated_at
              ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
              "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.company_id.to_string())
        .bind(entry.ticket_id.to_string())
        .bind(entry.user_id.to_string())
        .bind(entry.started_at.timestamp())
        .bind(entry.ended_at.map(|dt| dt.timestamp()))
        .bind(entry.work_date.to_string())
        .bind(entry.paused_duration_seconds)
        .bind(entry.paused)
        .bind(entry.paused_at.map(|dt| dt.timestamp()))
        .bind(entry.pause_reason.as_deref())
        .bind(entry.entry_type.as_str())
        .bind(entry.work_type.as_str())
        .bind(entry.description.as_deref())
        .bind(entry.billable)
        .bind(entry.hourly_rate.to_string())
        .bind(entry.rate_multiplier.to_string())
        .bind(entry.rate_label.as_str())
        .bind(entry.hours_worked.map(|d| d.to_string()))
        .bind(entry.hours_billed.map(|d| d.to_string()))
        .bind(entry.amount.map(|d| d.to_string()))
        .bind(entry.status.as_str())
        .bind(entry.allow_concurrent)
        .bind(entry.version)
        .bind(entry.created_at.timestamp())
        .bind(entry.updated_at.timestamp())
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> DbErrorResult<Option<TimeEntry>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?");

        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(executor)
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    /// Open timers owned by a user, oldest first.
    pub async fn find_open_timers<'e, E>(executor: E, user_id: Uuid) -> DbErrorResult<Vec<TimeEntry>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let sql = format!(
            "{SELECT_COLUMNS} WHERE user_id = ? AND entry_type = 'timer' AND ended_at IS NULL \
             ORDER BY started_at ASC, created_at ASC"
        );

        let rows = sqlx::query(&sql)
            .bind(user_id.to_string())
            .fetch_all(executor)
            .await?;

        rows.iter().map(Self::map_row).collect()
    }

    /// Closed entries recorded against a ticket, newest first.
    pub async fn find_closed_by_ticket<'e, E>(
        executor: E,
        ticket_id: Uuid,
    ) -> DbErrorResult<Vec<TimeEntry>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let sql = format!(
            "{SELECT_COLUMNS} WHERE ticket_id = ? AND ended_at IS NOT NULL ORDER BY started_at DESC"
        );

        let rows = sqlx::query(&sql)
            .bind(ticket_id.to_string())
            .fetch_all(executor)
            .await?;

        rows.iter().map(Self::map_row).collect()
    }

    /// Persist the mutable columns of an entry that is still open in storage.
    ///
    /// `entry.version` is the version that was read. Returns `false` when the
    /// row is gone, was closed, or was written by anyone else since that read.
    /// On success the stored version is one higher than `entry.version`.
    pub async fn update_open<'e, E>(executor: E, entry: &TimeEntry) -> DbErrorResult<bool>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query(
            r#"
              UPDATE time_entries
              SET ended_at = ?, paused_duration_seconds = ?, paused = ?, paused_at = ?,
                  pause_reason = ?, work_type = ?, description = ?, billable = ?,
                  hourly_rate = ?, rate_multiplier = ?, rate_label = ?,
                  hours_worked = ?, hours_billed = ?, amount = ?,
                  status = ?, updated_at = ?, version = version + 1
              WHERE id = ? AND ended_at IS NULL AND version = ?
                AND paused_duration_seconds <= ?
              "#,
        )
        .bind(entry.ended_at.map(|dt| dt.timestamp()))
        .bind(entry.paused_duration_seconds)
        .bind(entry.paused)
        .bind(entry.paused_at.map(|dt| dt.timestamp()))
        .bind(entry.pause_reason.as_deref())
        .bind(entry.work_type.as_str())
        .bind(entry.description.as_deref())
        .bind(entry.billable)
        .bind(entry.hourly_rate.to_string())
        .bind(entry.rate_multiplier.to_string())
        .bind(entry.rate_label.as_str())
        .bind(entry.hours_worked.map(|d| d.to_string()))
        .bind(entry.hours_billed.map(|d| d.to_string()))
        .bind(entry.amount.map(|d| d.to_string()))
        .bind(entry.status.as_str())
        .bind(entry.updated_at.timestamp())
        .bind(entry.id.to_string())
        .bind(entry.version)
        .bind(entry.paused_duration_seconds)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Apply an administrative correction to a closed, still-editable entry.
    /// Compare-and-set on `entry.version`, like [`Self::update_open`].
    pub async fn update_closed<'e, E>(executor: E, entry: &TimeEntry) -> DbErrorResult<bool>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query(
            r#"
              UPDATE time_entries
              SET work_type = ?, description = ?, billable = ?,
                  hourly_rate = ?, rate_multiplier = ?, rate_label = ?,
                  hours_worked = ?, hours_billed = ?, amount = ?, updated_at = ?,
                  version = version + 1
              WHERE id = ? AND ended_at IS NOT NULL AND version = ?
                AND status IN ('draft', 'submitted')
              "#,
        )
        .bind(entry.work_type.as_str())
        .bind(entry.description.as_deref())
        .bind(entry.billable)
        .bind(entry.hourly_rate.to_string())
        .bind(entry.rate_multiplier.to_string())
        .bind(entry.rate_label.as_str())
        .bind(entry.hours_worked.map(|d| d.to_string()))
        .bind(entry.hours_billed.map(|d| d.to_string()))
        .bind(entry.amount.map(|d| d.to_string()))
        .bind(entry.updated_at.timestamp())
        .bind(entry.id.to_string())
        .bind(entry.version)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Compare-and-set the status of a closed entry.
    pub async fn update_status<'e, E>(
        executor: E,
        id: Uuid,
        from: EntryStatus,
        to: EntryStatus,
        updated_at: DateTime<Utc>,
    ) -> DbErrorResult<bool>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query(
            r#"
              UPDATE time_entries
              SET status = ?, updated_at = ?, version = version + 1
              WHERE id = ? AND status = ? AND ended_at IS NOT NULL
              "#,
        )
        .bind(to.as_str())
        .bind(updated_at.timestamp())
        .bind(id.to_string())
        .bind(from.as_str())
        .execute(executor)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Hard-delete an entry that is still open (discard).
    pub async fn delete_open<'e, E>(executor: E, id: Uuid) -> DbErrorResult<bool>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query("DELETE FROM time_entries WHERE id = ? AND ended_at IS NULL")
            .bind(id.to_string())
            .execute(executor)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Hard-delete a closed entry that has not been approved yet.
    pub async fn delete_editable<'e, E>(executor: E, id: Uuid) -> DbErrorResult<bool>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query(
            r#"
              DELETE FROM time_entries
              WHERE id = ? AND ended_at IS NOT NULL
                AND status IN ('draft', 'submitted')
              "#,
        )
        .bind(id.to_string())
        .execute(executor)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    fn map_row(row: &SqliteRow) -> DbErrorResult<TimeEntry> {
        use sqlx::Row;

        Ok(TimeEntry {
            id: row_mapping::uuid(row, "id")?,
            company_id: row_mapping::uuid(row, "company_id")?,
            ticket_id: row_mapping::uuid(row, "ticket_id")?,
            user_id: row_mapping::uuid(row, "user_id")?,
            started_at: row_mapping::timestamp(row, "started_at")?,
            ended_at: row_mapping::opt_timestamp(row, "ended_at")?,
            work_date: row_mapping::date(row, "work_date")?,
            paused_duration_seconds: row.try_get("paused_duration_seconds")?,
            paused: row.try_get("paused")?,
            paused_at: row_mapping::opt_timestamp(row, "paused_at")?,
            pause_reason: row.try_get("pause_reason")?,
            entry_type: row_mapping::parsed(row, "entry_type")?,
            work_type: row.try_get("work_type")?,
            description: row.try_get("description")?,
            billable: row.try_get("billable")?,
            hourly_rate: row_mapping::decimal(row, "hourly_rate")?,
            rate_multiplier: row_mapping::decimal(row, "rate_multiplier")?,
            rate_label: row.try_get("rate_label")?,
            hours_worked: row_mapping::opt_decimal(row, "hours_worked")?,
            hours_billed: row_mapping::opt_decimal(row, "hours_billed")?,
            amount: row_mapping::opt_decimal(row, "amount")?,
            status: row_mapping::parsed(row, "status")?,
            allow_concurrent: row.try_get("allow_concurrent")?,
            version: row.try_get("version")?,
            created_at: row_mapping::timestamp(row, "created_at")?,
            updated_at: row_mapping::timestamp(row, "updated_at")?,
        })
    }
}
