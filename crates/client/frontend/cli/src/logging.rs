//! File logging for the terminal UI.
//!
//! The TUI owns stdout, so log output goes to a per-run file only.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber writing to `<log_dir>/<run>.log`.
///
/// The returned guard flushes buffered lines when dropped; keep it alive for
/// the whole run.
pub fn setup_logging(log_dir: &Path) -> Result<(WorkerGuard, PathBuf)> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let file_name = format!("ticktracker-{}.log", chrono::Local::now().format("%Y%m%d-%H%M%S"));
    let file_appender = tracing_appender::rolling::never(log_dir, &file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("logging already initialised")?;

    let path = log_dir.join(file_name);
    tracing::info!("Log file: {}", path.display());
    Ok((guard, path))
}
