use tt_core::TicketContext;
use tt_db::{MIGRATOR, TicketRepository};

use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

/// Creates an in-memory SQLite pool with migrations run
pub async fn create_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true)
        .foreign_keys(true);

    // In-memory needs single connection
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Inserts a ticket so time entries have something to reference
pub async fn create_test_ticket(pool: &SqlitePool, company_id: Uuid) -> TicketContext {
    let ticket = TicketContext {
        ticket_id: Uuid::new_v4(),
        company_id,
        priority: Some("medium".to_string()),
        subject: "Printer offline in reception".to_string(),
        description: Some("Users cannot print invoices".to_string()),
    };

    TicketRepository::upsert(pool, &ticket, Utc::now())
        .await
        .expect("Failed to create test ticket");

    ticket
}
