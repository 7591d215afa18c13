// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity observer: polls TCP reachability of the remote store.
//!
//! Each observation is forwarded to [`SyncController::on_connectivity`],
//! which only fires a pass on a disconnected→connected transition.

use std::sync::Arc;
use std::time::Duration;

use ml_core::EntryStatus;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::controller::{SyncController, TriggerReason, TriggerResult};

/// Whether a TCP connection to `addr` can be opened within `timeout`.
pub async fn probe_once(addr: &str, timeout: Duration) -> bool {
    matches!(
        tokio::time::timeout(timeout, TcpStream::connect(addr)).await,
        Ok(Ok(_))
    )
}

/// Extract `host:port` from a `ws://` or `wss://` URL.
///
/// Uses the scheme's default port when none is given.
pub fn probe_addr(url: &str) -> Option<String> {
    let (rest, default_port) = if let Some(rest) = url.strip_prefix("ws://") {
        (rest, 80)
    } else if let Some(rest) = url.strip_prefix("wss://") {
        (rest, 443)
    } else {
        return None;
    };

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let authority = authority.rsplit('@').next().unwrap_or_default();
    if authority.is_empty() {
        return None;
    }

    let has_port = match authority.rfind(']') {
        Some(end) => authority[end..].contains(':'),
        None => authority.contains(':'),
    };
    if has_port {
        Some(authority.to_string())
    } else {
        Some(format!("{authority}:{default_port}"))
    }
}

/// Periodic reachability probe driving a [`SyncController`].
pub struct ConnectivityProbe {
    addr: String,
    interval: Duration,
    timeout: Duration,
    cancel_token: CancellationToken,
}

impl ConnectivityProbe {
    pub fn new(addr: impl Into<String>, interval: Duration) -> Self {
        ConnectivityProbe {
            addr: addr.into(),
            interval,
            timeout: Duration::from_secs(1).min(interval),
            cancel_token: CancellationToken::new(),
        }
    }

    /// Get a cancellation token that stops the probe loop.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Probe until cancelled.
    pub async fn run(&self, controller: Arc<SyncController>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    debug!("connectivity probe stopped");
                    return;
                }
                _ = ticker.tick() => {
                    let connected = probe_once(&self.addr, self.timeout).await;
                    match controller.on_connectivity(connected).await {
                        Some(Ok(TriggerResult::Ran(summary))) => {
                            info!(addr = %self.addr, %summary, "connectivity restored");
                        }
                        Some(Ok(TriggerResult::Coalesced)) => {}
                        Some(Err(e)) => warn!(error = %e, "sync after reconnect failed"),
                        None if connected => retry_due(&controller).await,
                        None => {}
                    }
                }
            }
        }
    }

    /// Run the probe on the current runtime.
    pub fn spawn(self, controller: Arc<SyncController>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(controller).await })
    }
}

/// While the link stays up, pick up entries that are due: queued by another
/// process, past their backoff, or left `in_flight` by a process that quit
/// mid-submission.
async fn retry_due(controller: &SyncController) {
    let store = controller.store();
    let now = store.now_ms();
    let backoff = controller.backoff();
    let due = store.list_pending().iter().any(|e| {
        e.status == EntryStatus::InFlight || (e.is_actionable() && backoff.is_eligible(e, now))
    });
    if !due {
        return;
    }
    match controller.trigger(TriggerReason::Retry).await {
        Ok(TriggerResult::Ran(summary)) => info!(%summary, "retried entries after backoff"),
        Ok(TriggerResult::Coalesced) => {}
        Err(e) => warn!(error = %e, "retry pass failed"),
    }
}
