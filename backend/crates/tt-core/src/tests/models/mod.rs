mod entry_status;
mod time_entry;
