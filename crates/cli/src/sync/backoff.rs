// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-entry retry backoff.

use std::time::Duration;

use ml_core::PendingEntry;

/// Exponential backoff with a cap: `min(2^n * base, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        BackoffPolicy {
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(300),
        }
    }
}

impl BackoffPolicy {
    pub fn new(base_delay: Duration, max_delay: Duration) -> Self {
        BackoffPolicy {
            base_delay,
            max_delay,
        }
    }

    /// Delay required after the `attempts`-th failed attempt.
    pub fn delay_for(&self, attempts: u32) -> Duration {
        let factor = 1u32.checked_shl(attempts).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }

    /// Whether `entry` may be attempted at `now_ms`.
    ///
    /// An entry that was never attempted is always eligible. A clock that went
    /// backwards counts as no time elapsed.
    pub fn is_eligible(&self, entry: &PendingEntry, now_ms: u64) -> bool {
        let Some(last) = entry.last_attempt_ms else {
            return true;
        };
        let elapsed = now_ms.saturating_sub(last);
        let required = u64::try_from(self.delay_for(entry.attempt_count).as_millis())
            .unwrap_or(u64::MAX);
        elapsed >= required
    }

    /// Milliseconds until `entry` becomes eligible, zero if it already is.
    pub fn remaining_ms(&self, entry: &PendingEntry, now_ms: u64) -> u64 {
        let Some(last) = entry.last_attempt_ms else {
            return 0;
        };
        let required = u64::try_from(self.delay_for(entry.attempt_count).as_millis())
            .unwrap_or(u64::MAX);
        last.saturating_add(required).saturating_sub(now_ms)
    }
}
