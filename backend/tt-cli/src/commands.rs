use crate::ticket_commands::TicketCommands;

use tt_core::EntryStatus;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand, ValueEnum};
use uuid::Uuid;

#[derive(Subcommand)]
pub enum Commands {
    /// Start a timer on a ticket
    Start {
        /// Ticket ID (UUID)
        ticket_id: Uuid,
        /// Kind of work, e.g. remote_support
        #[arg(long)]
        work_type: Option<String>,
        /// Draft description, completed when the timer stops
        #[arg(long)]
        description: Option<String>,
        /// Record the time as non-billable
        #[arg(long)]
        non_billable: bool,
        /// What to do when another timer is already open
        #[arg(long, value_enum)]
        on_conflict: Option<ConflictChoice>,
        /// Description for timers closed by --on-conflict switch
        #[arg(long)]
        stop_description: Option<String>,
    },

    /// Pause a running timer
    Pause {
        /// Timer ID (UUID)
        timer_id: Uuid,
        /// Why work stopped
        #[arg(long)]
        reason: String,
    },

    /// Resume a paused timer
    Resume {
        /// Timer ID (UUID)
        timer_id: Uuid,
    },

    /// Stop a timer and record its billing
    Stop {
        /// Timer ID (UUID)
        timer_id: Uuid,
        #[command(flatten)]
        settings: StopArgs,
    },

    /// Stop every open timer
    StopAll {
        #[command(flatten)]
        settings: StopArgs,
    },

    /// Throw a timer away without recording time
    Discard {
        /// Timer ID (UUID)
        timer_id: Uuid,
    },

    /// Show open timers with elapsed time and rate
    Status,

    /// Record time after the fact
    Manual {
        /// Ticket ID (UUID)
        ticket_id: Uuid,
        /// Start, RFC 3339 (e.g. 2026-03-02T09:00:00Z)
        #[arg(long)]
        started_at: DateTime<Utc>,
        /// End, RFC 3339
        #[arg(long)]
        ended_at: DateTime<Utc>,
        /// Breaks taken within the interval
        #[arg(long, default_value_t = 0)]
        paused_minutes: i64,
        #[arg(long)]
        work_type: Option<String>,
        #[arg(long)]
        description: String,
        #[arg(long)]
        non_billable: bool,
    },

    /// Correct a closed entry
    Correct {
        /// Entry ID (UUID)
        entry_id: Uuid,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        work_type: Option<String>,
        #[arg(long)]
        billable: Option<bool>,
    },

    /// Delete a closed entry that has not been approved
    Delete {
        /// Entry ID (UUID)
        entry_id: Uuid,
    },

    /// Move an entry through approval and invoicing
    Review {
        /// Entry ID (UUID)
        entry_id: Uuid,
        #[arg(long, value_enum)]
        status: ReviewStatus,
    },

    /// Audit trail of an entry
    History {
        /// Entry ID (UUID)
        entry_id: Uuid,
    },

    /// Ticket operations
    Ticket {
        #[command(subcommand)]
        action: TicketCommands,
    },
}

/// Overrides applied on top of the suggested stop settings.
#[derive(Args, Debug, Clone, Default)]
pub struct StopArgs {
    /// Final description of the work done
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub work_type: Option<String>,
    #[arg(long)]
    pub non_billable: bool,
    /// Do not leave a time comment on the ticket
    #[arg(long)]
    pub no_comment: bool,
    /// Show the billing preview without stopping
    #[arg(long)]
    pub preview: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Stop the open timers, then start
    Switch,
    /// Keep the open timers running
    Both,
    /// Leave everything as it is
    Cancel,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Submitted,
    Approved,
    Rejected,
    Invoiced,
    Paid,
}

impl From<ReviewStatus> for EntryStatus {
    fn from(status: ReviewStatus) -> Self {
        match status {
            ReviewStatus::Submitted => EntryStatus::Submitted,
            ReviewStatus::Approved => EntryStatus::Approved,
            ReviewStatus::Rejected => EntryStatus::Rejected,
            ReviewStatus::Invoiced => EntryStatus::Invoiced,
            ReviewStatus::Paid => EntryStatus::Paid,
        }
    }
}
