// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use super::*;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(args)
}

#[test]
fn test_add_joins_words() {
    let cli = parse(&["mood", "add", "slept", "well"]).unwrap();
    match cli.command {
        Command::Add { text, no_push } => {
            assert_eq!(text, vec!["slept", "well"]);
            assert!(!no_push);
        }
        _ => panic!("Expected Add command"),
    }
}

#[test]
fn test_add_no_push() {
    let cli = parse(&["mood", "add", "--no-push", "later"]).unwrap();
    assert!(matches!(cli.command, Command::Add { no_push: true, .. }));
}

#[test]
fn test_add_requires_text() {
    assert!(parse(&["mood", "add"]).is_err());
    assert!(parse(&["mood", "add", "  "]).is_err());
}

#[test]
fn test_pending_defaults() {
    let cli = parse(&["mood", "pending"]).unwrap();
    match cli.command {
        Command::Pending { all, output } => {
            assert!(!all);
            assert_eq!(output, OutputFormat::Text);
        }
        _ => panic!("Expected Pending command"),
    }
}

#[test]
fn test_pending_all_json() {
    let cli = parse(&["mood", "pending", "--all", "-o", "json"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Pending {
            all: true,
            output: OutputFormat::Json
        }
    ));
}

#[test]
fn test_discard_takes_id() {
    let cli = parse(&["mood", "discard", "1700000000000-0-7"]).unwrap();
    match cli.command {
        Command::Discard { id } => assert_eq!(id, "1700000000000-0-7"),
        _ => panic!("Expected Discard command"),
    }
    assert!(parse(&["mood", "discard"]).is_err());
}

#[test]
fn test_feed_limit() {
    let cli = parse(&["mood", "feed", "-n", "5"]).unwrap();
    assert!(matches!(cli.command, Command::Feed { limit: 5, .. }));

    let cli = parse(&["mood", "feed"]).unwrap();
    assert!(matches!(cli.command, Command::Feed { limit: 20, .. }));
}

#[test]
fn test_unknown_output_format_rejected() {
    assert!(parse(&["mood", "pending", "-o", "yaml"]).is_err());
}
