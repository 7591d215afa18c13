// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use ml_core::{PendingEntry, PublishedEntry};

use crate::sync::Counts;

/// Maximum line width for wrapped entry text (excluding 4-space indent).
const WRAP_WIDTH: usize = 76;

/// Longest preview of an entry shown on a single line.
const PREVIEW_CHARS: usize = 48;

/// Wrap text at word boundaries if it's a single line.
///
/// - If content contains newlines: return as-is (preserve user formatting)
/// - If content is single line >width: wrap at word boundaries
/// - If content is single line <=width: return as-is
pub fn wrap_text(content: &str, width: usize) -> String {
    if content.contains('\n') || content.chars().count() <= width {
        return content.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in content.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

/// First line of `content`, shortened to `max` characters with an ellipsis.
pub fn preview(content: &str, max: usize) -> String {
    let first = content.lines().next().unwrap_or_default();
    let shortened = first.chars().count() > max || content.lines().nth(1).is_some();
    if !shortened {
        return first.to_string();
    }
    let kept: String = first.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// Format one pending entry for `mood pending`.
///
/// ```text
/// - 1700000000000-0-7 (pending, 2 attempts) slept badly… [timed out]
/// ```
pub fn format_pending_line(entry: &PendingEntry) -> String {
    let attempts = match entry.attempt_count {
        0 => String::new(),
        1 => ", 1 attempt".to_string(),
        n => format!(", {} attempts", n),
    };
    let mut line = format!(
        "- {} ({}{}) {}",
        entry.local_id,
        entry.status,
        attempts,
        preview(&entry.content, PREVIEW_CHARS)
    );
    if let Some(err) = &entry.last_error {
        line.push_str(&format!(" [{}]", err));
    }
    line
}

/// One-line totals for `mood pending`.
pub fn format_counts(counts: &Counts) -> String {
    let mut parts = vec![format!("{} pending", counts.pending)];
    if counts.in_flight > 0 {
        parts.push(format!("{} in flight", counts.in_flight));
    }
    if counts.failed_permanent > 0 {
        parts.push(format!("{} failed", counts.failed_permanent));
    }
    if counts.volatile > 0 {
        parts.push(format!("{} in memory only", counts.volatile));
    }
    parts.join(", ")
}

/// Hint shown when permanently failed entries are hidden.
pub fn failed_hint(counts: &Counts, showing_all: bool) -> Option<String> {
    (!showing_all && counts.failed_permanent > 0).then(|| {
        format!(
            "{} rejected entr{} hidden; use --all to show, 'mood discard <ID>' to drop",
            counts.failed_permanent,
            if counts.failed_permanent == 1 { "y" } else { "ies" }
        )
    })
}

/// Format a published entry with a metadata line and indented content.
///
/// Output format:
/// ```text
///   2024-01-10 10:30  happy (+5)  #42
///     Content goes here, potentially
///     wrapped across multiple lines.
/// ```
pub fn format_published(entry: &PublishedEntry) -> Vec<String> {
    let mut lines = vec![format!(
        "  {}  {} ({:+})  #{}",
        entry.created_at_local.format("%Y-%m-%d %H:%M"),
        entry.mood,
        entry.score,
        entry.server_id
    )];
    let wrapped = wrap_text(&entry.content, WRAP_WIDTH);
    for line in wrapped.lines() {
        lines.push(format!("    {}", line));
    }
    lines
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
