//! File logging for the terminal client.
//!
//! The terminal belongs to the combat pane, so log output only goes to a
//! per-session file under the platform cache directory.
use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Platform log directory, e.g. `~/.cache/dudes/logs` on Linux.
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "dudes")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/dudes"))
        .join("logs")
}

pub fn setup_logging(session_id: &str) -> Result<PathBuf> {
    let session_log_dir = log_dir().join(session_id);
    std::fs::create_dir_all(&session_log_dir)?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "client.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    // Keeps the writer thread alive for the rest of the process.
    std::mem::forget(guard);

    tracing::info!(session = session_id, "logging initialized");
    Ok(session_log_dir.join("client.log"))
}
