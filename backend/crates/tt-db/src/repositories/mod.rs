pub mod activity_log_repository;
pub mod ticket_comment_repository;
pub mod ticket_repository;
pub mod time_entry_repository;
