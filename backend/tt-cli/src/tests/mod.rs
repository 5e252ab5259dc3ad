mod cli_parsing;

use crate::Session;

use tt_config::Config;
use tt_db::MIGRATOR;
use tt_engine::{EngineSettings, ManualClock, SqliteTicketGateway, TimerService};

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

pub(crate) struct TestCli {
    pub service: TimerService,
    pub clock: Arc<ManualClock>,
    pub session: Session,
}

impl TestCli {
    pub async fn new() -> Self {
        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        MIGRATOR.run(&pool).await.unwrap();

        let clock = Arc::new(ManualClock::new(monday(9, 0)));
        let settings = EngineSettings::from_config(&Config::default()).unwrap();
        let service = TimerService::new(
            pool.clone(),
            Arc::new(SqliteTicketGateway::new(pool)),
            clock.clone(),
            settings,
        );

        Self {
            service,
            clock,
            session: Session {
                company_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
            },
        }
    }
}

/// 2026-03-02 is a Monday
pub(crate) fn monday(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
}
