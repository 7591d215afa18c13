// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

fn sample_entry() -> PendingEntry {
    PendingEntry::new(LocalId::new(1000, 0, 1), "slept well".to_string(), Utc::now())
}

#[parameterized(
    pending = { "pending", EntryStatus::Pending },
    in_flight = { "in_flight", EntryStatus::InFlight },
    in_flight_dash = { "in-flight", EntryStatus::InFlight },
    failed = { "failed_permanent", EntryStatus::FailedPermanent },
    failed_upper = { "FAILED-PERMANENT", EntryStatus::FailedPermanent },
)]
fn status_parses(input: &str, expected: EntryStatus) {
    assert_eq!(input.parse::<EntryStatus>().unwrap(), expected);
}

#[test]
fn status_rejects_unknown() {
    assert!(matches!("sent".parse::<EntryStatus>(), Err(Error::InvalidStatus(_))));
}

#[test]
fn new_entry_starts_pending() {
    let entry = sample_entry();
    assert_eq!(entry.status, EntryStatus::Pending);
    assert_eq!(entry.attempt_count, 0);
    assert!(entry.last_error.is_none());
    assert!(entry.last_attempt_ms.is_none());
    assert!(entry.is_actionable());
}

#[test]
fn failed_entry_is_not_actionable() {
    let mut entry = sample_entry();
    entry.status = EntryStatus::FailedPermanent;
    assert!(!entry.is_actionable());
}

#[test]
fn entry_json_omits_unset_fields() {
    let json = serde_json::to_string(&sample_entry()).unwrap();
    assert!(json.contains("\"status\":\"pending\""));
    assert!(json.contains("\"local_id\":\"1000-0-1\""));
    assert!(!json.contains("last_error"));
    assert!(!json.contains("last_attempt_ms"));
}

#[test]
fn entry_json_tolerates_missing_counters() {
    let json = r#"{"local_id":"5-0-1","content":"x","created_at_local":"2026-01-01T00:00:00Z","status":"in_flight"}"#;
    let entry: PendingEntry = serde_json::from_str(json).unwrap();
    assert_eq!(entry.attempt_count, 0);
    assert_eq!(entry.status, EntryStatus::InFlight);
}

#[parameterized(
    very_positive = { 7, Mood::Happy },
    three = { 3, Mood::Happy },
    two = { 2, Mood::Good },
    one = { 1, Mood::Good },
    zero = { 0, Mood::Neutral },
    minus_one = { -1, Mood::Bad },
    minus_two = { -2, Mood::Bad },
    minus_three = { -3, Mood::Sad },
)]
fn mood_thresholds(score: i32, expected: Mood) {
    assert_eq!(Mood::from_score(score), expected);
}

#[test]
fn mood_round_trips_through_str() {
    for mood in [Mood::Happy, Mood::Good, Mood::Neutral, Mood::Bad, Mood::Sad] {
        assert_eq!(mood.as_str().parse::<Mood>().unwrap(), mood);
    }
    assert!(matches!("grumpy".parse::<Mood>(), Err(Error::InvalidMood(_))));
}

#[test]
fn only_transient_outcomes_are_retryable() {
    assert!(Outcome::transient("timeout").is_retryable());
    assert!(!Outcome::permanent("empty").is_retryable());
}
