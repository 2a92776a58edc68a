use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use anyhow::{Context as _, Result};
use tokio::signal::unix::{SignalKind, signal};
use tracing::{error, warn};

/// Exit status used when the operator insists on quitting immediately.
const FORCED_EXIT_CODE: i32 = 130;

/// Sets the returned flag on the first SIGINT or SIGTERM.
///
/// A second signal exits the process right away, for when the flag holder is stuck in a
/// blocking call. Must be called from within a tokio runtime.
pub fn stop_on_signal() -> Arc<AtomicBool> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();

    tokio::spawn(async move {
        if let Err(e) = wait_for_signal().await {
            error!(error = %e, "Signal handling unavailable");
            return;
        }
        warn!("Interrupt received, shutting down (press Ctrl-C again to quit immediately)");
        flag.store(true, Ordering::Release);

        if wait_for_signal().await.is_ok() {
            std::process::exit(FORCED_EXIT_CODE);
        }
    });

    stop
}

async fn wait_for_signal() -> Result<()> {
    let mut terminate =
        signal(SignalKind::terminate()).context("failed to listen for SIGTERM")?;

    tokio::select! {
        result = tokio::signal::ctrl_c() => result.context("failed to listen for Ctrl-C")?,
        _ = terminate.recv() => {}
    }

    Ok(())
}
