use crate::{DbError, MIGRATOR, Result};

use std::collections::HashMap;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use error_location::ErrorLocation;
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tokio::sync::RwLock;
use uuid::Uuid;

const DATABASE_FILENAME: &str = "time_tracking.db";

#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            busy_timeout: Duration::from_millis(5000),
        }
    }
}

/// One SQLite database per company, opened lazily and migrated on first use.
pub struct TenantConnectionManager {
    pools: Arc<RwLock<HashMap<Uuid, SqlitePool>>>,
    base_path: PathBuf,
    settings: PoolSettings,
}

impl TenantConnectionManager {
    pub fn new(base_path: impl Into<PathBuf>, settings: PoolSettings) -> Self {
        Self {
            pools: Arc::new(RwLock::new(HashMap::new())),
            base_path: base_path.into(),
            settings,
        }
    }

    pub async fn get_pool(&self, company_id: Uuid) -> Result<SqlitePool> {
        {
            let pools = self.pools.read().await;
            if let Some(pool) = pools.get(&company_id) {
                return Ok(pool.clone());
            }
        }

        let mut pools = self.pools.write().await;

        // Another task may have opened it while we waited for the write lock
        if let Some(pool) = pools.get(&company_id) {
            return Ok(pool.clone());
        }

        let pool = self.create_pool(company_id).await?;
        pools.insert(company_id, pool.clone());

        Ok(pool)
    }

    /// Close every cached pool. Subsequent `get_pool` calls reopen them.
    pub async fn close_all(&self) {
        let mut pools = self.pools.write().await;
        for (company_id, pool) in pools.drain() {
            debug!("Closing database pool for company {}", company_id);
            pool.close().await;
        }
    }

    pub fn database_path(&self, company_id: Uuid) -> PathBuf {
        self.base_path
            .join(company_id.to_string())
            .join(DATABASE_FILENAME)
    }

    async fn create_pool(&self, company_id: Uuid) -> Result<SqlitePool> {
        let db_path = self.database_path(company_id);

        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DbError::Initialization {
                    message: format!("Failed to create company directory: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(self.settings.busy_timeout)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(self.settings.max_connections)
            .connect_with(options)
            .await?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| DbError::Migration {
                message: format!("Migration failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            "Opened database for company {} at {}",
            company_id,
            db_path.display()
        );

        Ok(pool)
    }
}
