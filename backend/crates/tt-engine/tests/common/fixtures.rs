use tt_engine::{
    ConflictResolution, EntryCorrection, ManualEntry, StartOptions, StopSettings,
};

use chrono::{DateTime, Utc};

pub fn stop_settings(description: &str) -> StopSettings {
    StopSettings {
        description: description.to_string(),
        work_type: "general_support".to_string(),
        billable: true,
        add_comment: false,
    }
}

pub fn start_options() -> StartOptions {
    StartOptions::default()
}

pub fn switch_options(description: &str) -> StartOptions {
    StartOptions {
        on_conflict: Some(ConflictResolution::Switch(stop_settings(description))),
        ..StartOptions::default()
    }
}

pub fn both_options() -> StartOptions {
    StartOptions {
        on_conflict: Some(ConflictResolution::Both),
        ..StartOptions::default()
    }
}

pub fn cancel_options() -> StartOptions {
    StartOptions {
        on_conflict: Some(ConflictResolution::Cancel),
        ..StartOptions::default()
    }
}

pub fn manual_entry(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> ManualEntry {
    ManualEntry {
        started_at,
        ended_at,
        paused_seconds: 0,
        work_type: "onsite_support".to_string(),
        description: "Installed new access point".to_string(),
        billable: true,
    }
}

pub fn correction_description(description: &str) -> EntryCorrection {
    EntryCorrection {
        description: Some(description.to_string()),
        ..EntryCorrection::default()
    }
}
