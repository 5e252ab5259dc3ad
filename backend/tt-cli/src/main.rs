//! tt - ticket time tracking
//!
//! Runs timers against a company's local database and prints JSON.
//!
//! # Examples
//!
//! ```bash
//! # Register a ticket and start working on it
//! tt --company <uuid> --user <uuid> ticket add --subject "Printer offline" --priority high
//! tt --company <uuid> --user <uuid> start <ticket-id> --work-type remote_support
//!
//! # Check the billing before stopping
//! tt stop <timer-id> --preview --pretty
//! tt stop <timer-id> --description "Replaced fuser unit"
//! ```

use tt_cli::{Cli, Result as CliResult, Session, execute, logger};
use tt_config::Config;
use tt_db::{PoolSettings, TenantConnectionManager};
use tt_engine::{EngineSettings, SqliteTicketGateway, SystemClock, TimerService};

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde_json::Value;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let pretty = cli.pretty;

    match run(cli).await {
        Ok(value) => {
            let output = if pretty {
                serde_json::to_string_pretty(&value)
            } else {
                serde_json::to_string(&value)
            };

            match output {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error serializing response: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("Error [{}]: {}", e.error_code(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<Value> {
    let config = Config::load()?;
    config.validate()?;

    logger::initialize(
        config.logging.level,
        config.log_file_path()?,
        config.logging.colored,
    )?;
    if cli.verbose {
        config.log_summary();
    }

    let session = Session::resolve(cli.company, cli.user)?;

    let manager = TenantConnectionManager::new(
        config.database_dir()?,
        PoolSettings {
            max_connections: config.database.max_connections,
            busy_timeout: Duration::from_millis(config.database.busy_timeout_ms),
        },
    );
    let pool = manager.get_pool(session.company_id).await?;

    let settings = EngineSettings::from_config(&config)?;
    let service = TimerService::new(
        pool.clone(),
        Arc::new(SqliteTicketGateway::new(pool)),
        Arc::new(SystemClock),
        settings,
    );

    let result = execute(&service, &session, cli.command).await;
    manager.close_all().await;
    result
}
