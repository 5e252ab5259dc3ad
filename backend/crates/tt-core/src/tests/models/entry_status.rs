use crate::EntryStatus;

use std::str::FromStr;

#[test]
fn test_entry_status_round_trip() {
    for status in [
        EntryStatus::Draft,
        EntryStatus::Submitted,
        EntryStatus::Approved,
        EntryStatus::Rejected,
        EntryStatus::Invoiced,
        EntryStatus::Paid,
    ] {
        assert_eq!(EntryStatus::from_str(status.as_str()).unwrap(), status);
    }
    assert!(EntryStatus::from_str("archived").is_err());
}

#[test]
fn test_entry_status_editable() {
    assert!(EntryStatus::Draft.is_editable());
    assert!(EntryStatus::Submitted.is_editable());
    assert!(!EntryStatus::Approved.is_editable());
    assert!(!EntryStatus::Invoiced.is_editable());
    assert!(!EntryStatus::Paid.is_editable());
}

#[test]
fn test_entry_status_transitions() {
    assert!(EntryStatus::Submitted.can_transition_to(EntryStatus::Approved));
    assert!(EntryStatus::Rejected.can_transition_to(EntryStatus::Submitted));
    assert!(EntryStatus::Invoiced.can_transition_to(EntryStatus::Paid));
    assert!(!EntryStatus::Draft.can_transition_to(EntryStatus::Approved));
    assert!(!EntryStatus::Paid.can_transition_to(EntryStatus::Submitted));
    assert!(!EntryStatus::Approved.can_transition_to(EntryStatus::Submitted));
}
