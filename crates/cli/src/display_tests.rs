// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use chrono::{TimeZone, Utc};
use ml_core::{EntryStatus, LocalId, Mood};

fn pending(content: &str) -> PendingEntry {
    PendingEntry::new(
        LocalId::new(1_700_000_000_000, 0, 7),
        content.to_string(),
        Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap(),
    )
}

fn published(content: &str) -> PublishedEntry {
    PublishedEntry {
        server_id: 42,
        local_id: LocalId::new(1_700_000_000_000, 0, 7),
        content: content.to_string(),
        mood: Mood::Happy,
        score: 5,
        created_at_local: Utc.with_ymd_and_hms(2024, 1, 10, 10, 30, 0).unwrap(),
        server_timestamp: Utc.with_ymd_and_hms(2024, 1, 10, 10, 31, 0).unwrap(),
    }
}

// wrap_text tests
#[test]
fn test_wrap_text_short_unchanged() {
    assert_eq!(wrap_text("short line", 20), "short line");
}

#[test]
fn test_wrap_text_at_word_boundaries() {
    assert_eq!(
        wrap_text("one two three four five", 9),
        "one two\nthree\nfour five"
    );
}

#[test]
fn test_wrap_text_preserves_newlines() {
    let text = "first line that is rather long\nsecond";
    assert_eq!(wrap_text(text, 5), text);
}

// preview tests
#[test]
fn test_preview_short_text() {
    assert_eq!(preview("a good day", 48), "a good day");
}

#[test]
fn test_preview_truncates_long_text() {
    assert_eq!(preview("abcdefghij", 5), "abcd…");
}

#[test]
fn test_preview_multiline_shows_first_line() {
    assert_eq!(preview("title\nbody", 48), "title…");
}

#[test]
fn test_preview_counts_characters_not_bytes() {
    assert_eq!(preview("ééééé", 5), "ééééé");
}

// format_pending_line tests
#[test]
fn test_format_pending_line_fresh() {
    assert_eq!(
        format_pending_line(&pending("slept well")),
        "- 1700000000000-0-7 (pending) slept well"
    );
}

#[test]
fn test_format_pending_line_with_attempts_and_error() {
    let mut entry = pending("slept well");
    entry.attempt_count = 2;
    entry.last_error = Some("timed out".to_string());
    assert_eq!(
        format_pending_line(&entry),
        "- 1700000000000-0-7 (pending, 2 attempts) slept well [timed out]"
    );
}

#[test]
fn test_format_pending_line_failed() {
    let mut entry = pending("x");
    entry.attempt_count = 1;
    entry.status = EntryStatus::FailedPermanent;
    assert_eq!(
        format_pending_line(&entry),
        "- 1700000000000-0-7 (failed_permanent, 1 attempt) x"
    );
}

// counts tests
#[test]
fn test_format_counts_only_nonzero_extras() {
    let counts = Counts {
        pending: 3,
        in_flight: 0,
        failed_permanent: 1,
        volatile: 0,
    };
    assert_eq!(format_counts(&counts), "3 pending, 1 failed");
}

#[test]
fn test_failed_hint() {
    let mut counts = Counts::default();
    assert_eq!(failed_hint(&counts, false), None);

    counts.failed_permanent = 2;
    assert!(failed_hint(&counts, false).unwrap().starts_with("2 rejected entries hidden"));
    assert_eq!(failed_hint(&counts, true), None);
}

// format_published tests
#[test]
fn test_format_published() {
    let lines = format_published(&published("what a wonderful day"));
    assert_eq!(
        lines,
        vec![
            "  2024-01-10 10:30  happy (+5)  #42".to_string(),
            "    what a wonderful day".to_string(),
        ]
    );
}

#[test]
fn test_format_published_negative_score() {
    let mut entry = published("awful");
    entry.mood = Mood::Sad;
    entry.score = -3;
    assert!(format_published(&entry)[0].contains("sad (-3)"));
}
