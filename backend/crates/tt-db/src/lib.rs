pub mod connection;
pub mod error;
pub mod repositories;

mod row_mapping;

pub use connection::tenant_connection_manager::{PoolSettings, TenantConnectionManager};
pub use error::{DbError, Result};
pub use repositories::activity_log_repository::ActivityLogRepository;
pub use repositories::ticket_comment_repository::TicketCommentRepository;
pub use repositories::ticket_repository::TicketRepository;
pub use repositories::time_entry_repository::TimeEntryRepository;

use sqlx::migrate::Migrator;

/// Embedded schema migrations for a company database.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");
