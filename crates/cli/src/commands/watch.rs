// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use super::{open_controller, open_diary, open_store, runtime};
use crate::display::format_published;
use crate::error::{Error, Result};
use crate::sync::{probe_addr, ConnectivityProbe, SyncController, TriggerResult};

pub fn run() -> Result<()> {
    let (config, work_dir) = open_diary()?;
    let remote = config.require_remote()?;
    let addr =
        probe_addr(&remote.url).ok_or_else(|| Error::InvalidRemoteUrl(remote.url.clone()))?;

    let store = open_store(&work_dir, &config)?;
    let controller = open_controller(&work_dir, &config, store)?;
    let probe = ConnectivityProbe::new(addr, remote.probe_interval());

    println!("Watching {} (Ctrl-C to stop)", remote.url);
    let mut stdout = std::io::stdout();
    let shown = runtime()?.block_on(watch(controller, probe, shutdown_signal(), &mut stdout))?;
    println!("Stopped; {} entr{} delivered", shown, if shown == 1 { "y" } else { "ies" });
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Flush the queue, then deliver whenever the probe sees the remote store,
/// printing each published entry until `shutdown` resolves.
///
/// Returns the number of entries printed.
pub(crate) async fn watch<W: Write>(
    controller: Arc<SyncController>,
    probe: ConnectivityProbe,
    shutdown: impl Future<Output = ()>,
    out: &mut W,
) -> Result<usize> {
    let mut published = controller.subscribe_published();

    // A failed startup pass is retried by the probe.
    match controller.start().await {
        Ok(TriggerResult::Ran(summary)) => info!(%summary, "startup sync"),
        Ok(TriggerResult::Coalesced) => info!("startup sync skipped, another pass is running"),
        Err(e) => warn!(error = %e, "startup sync failed"),
    }

    let cancel = probe.cancel_token();
    let probe_task = probe.spawn(Arc::clone(&controller));
    tokio::pin!(shutdown);

    let mut shown = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            received = published.recv() => match received {
                Ok(entry) => {
                    for line in format_published(&entry) {
                        writeln!(out, "{}", line)?;
                    }
                    out.flush()?;
                    shown += 1;
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "published entries dropped from the display");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    cancel.cancel();
    if let Err(e) = probe_task.await {
        warn!(error = %e, "connectivity probe ended abnormally");
    }
    Ok(shown)
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
