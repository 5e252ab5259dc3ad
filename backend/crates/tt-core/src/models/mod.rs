pub mod activity_log;
pub mod entry_status;
pub mod entry_type;
pub mod ticket_comment;
pub mod ticket_context;
pub mod time_entry;
pub mod timer_state;
