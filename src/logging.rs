use std::{fs::OpenOptions, path::Path, sync::Mutex};

use anyhow::{Context as _, Result};
use tracing_subscriber::{
    EnvFilter, fmt, fmt::time::ChronoLocal, layer::SubscriberExt as _,
    util::SubscriberInitExt as _,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Logs to the console and, when `log_file` is given, appends the same events to that file.
///
/// The level defaults to `info` and can be overridden through `RUST_LOG`.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let timer = ChronoLocal::new(TIMESTAMP_FORMAT.to_owned());

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file: {}", path.display()))?;

            Some(
                fmt::layer()
                    .with_timer(timer.clone())
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_timer(timer).with_target(false))
        .with(file_layer)
        .try_init()
        .context("failed to initialize logging")?;

    Ok(())
}
