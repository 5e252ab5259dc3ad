use tt_config::Config;
use tt_core::{TicketComment, TicketContext};
use tt_db::{MIGRATOR, TicketRepository};
use tt_engine::{
    EngineError, EngineSettings, ManualClock, Result as EngineResult, SqliteTicketGateway,
    TicketGateway, TimerService,
};

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

/// A service wired to an in-memory database and a clock the test controls.
pub struct TestEngine {
    pub service: TimerService,
    pub clock: Arc<ManualClock>,
    pub pool: SqlitePool,
    pub company_id: Uuid,
    pub user_id: Uuid,
}

impl TestEngine {
    pub async fn new() -> Self {
        Self::with_gateway(|pool| -> Arc<dyn TicketGateway> { Arc::new(SqliteTicketGateway::new(pool)) })
            .await
    }

    pub async fn with_gateway<F>(gateway: F) -> Self
    where
        F: FnOnce(SqlitePool) -> Arc<dyn TicketGateway>,
    {
        Self::build(&Config::default(), gateway).await
    }

    /// Engine configured from a TOML snippet layered over the defaults
    pub async fn with_config(toml: &str) -> Self {
        let config = Config::from_toml_str(toml).expect("valid test config");
        Self::build(&config, |pool| -> Arc<dyn TicketGateway> {
            Arc::new(SqliteTicketGateway::new(pool))
        })
        .await
    }

    async fn build<F>(config: &Config, gateway: F) -> Self
    where
        F: FnOnce(SqlitePool) -> Arc<dyn TicketGateway>,
    {
        let pool = create_test_pool().await;
        let clock = Arc::new(ManualClock::new(monday(9, 0)));
        let settings = EngineSettings::from_config(config).expect("test settings are valid");

        let service = TimerService::new(pool.clone(), gateway(pool.clone()), clock.clone(), settings);

        Self {
            service,
            clock,
            pool,
            company_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
        }
    }

    pub fn set_time(&self, at: DateTime<Utc>) {
        self.clock.set(at);
    }

    /// Inserts a ticket with the given priority and subject
    pub async fn ticket(&self, priority: &str, subject: &str) -> TicketContext {
        let ticket = TicketContext {
            ticket_id: Uuid::new_v4(),
            company_id: self.company_id,
            priority: Some(priority.to_string()),
            subject: subject.to_string(),
            description: None,
        };
        self.save_ticket(&ticket).await;
        ticket
    }

    pub async fn save_ticket(&self, ticket: &TicketContext) {
        TicketRepository::upsert(&self.pool, ticket, monday(8, 0))
            .await
            .expect("Failed to save test ticket");
    }
}

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

/// 2026-03-02 is a Monday
pub fn monday(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// 2026-03-07 is a Saturday
pub fn saturday(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 7, hour, minute, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Reads tickets from storage but refuses every comment.
pub struct CommentlessGateway {
    inner: SqliteTicketGateway,
}

impl CommentlessGateway {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            inner: SqliteTicketGateway::new(pool),
        }
    }
}

#[async_trait]
impl TicketGateway for CommentlessGateway {
    async fn ticket_context(&self, ticket_id: Uuid) -> EngineResult<Option<TicketContext>> {
        self.inner.ticket_context(ticket_id).await
    }

    async fn append_comment(&self, _comment: &TicketComment) -> EngineResult<()> {
        Err(EngineError::forbidden("ticket is closed for comments"))
    }
}
