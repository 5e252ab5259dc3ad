use crate::commands::Commands;

use clap::Parser;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "tt")]
#[command(about = "Ticket time tracking and billing from the command line")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Company whose database to use (falls back to TT_COMPANY_ID)
    #[arg(long, global = true)]
    pub company: Option<Uuid>,

    /// Technician acting on timers (falls back to TT_USER_ID)
    #[arg(long, global = true)]
    pub user: Option<Uuid>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Log the loaded configuration before running the command
    #[arg(long, global = true)]
    pub verbose: bool,
}
