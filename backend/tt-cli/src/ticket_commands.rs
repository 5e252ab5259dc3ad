use clap::Subcommand;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum TicketCommands {
    /// Create or update the ticket details used for rates
    Add {
        /// Ticket ID (UUID); generated when omitted
        #[arg(long)]
        id: Option<Uuid>,
        #[arg(long)]
        subject: String,
        /// e.g. low, normal, high, critical
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// List closed time entries on a ticket, newest first
    Entries {
        /// Ticket ID (UUID)
        ticket_id: Uuid,
    },
}
