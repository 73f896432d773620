//! File logging for the terminal front end.
//!
//! The TUI owns stdout, so log lines only ever go to
//! `$HOME/.local/state/flinch/flinch.log`. Logging is off unless requested;
//! `RUST_LOG` overrides the default filter.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app_dirs::AppDirs;

const DEFAULT_FILTER: &str = "info,flinch=debug";

/// Install the file subscriber.
///
/// The returned guard flushes buffered lines on drop and must be held for as
/// long as the app runs. Returns `None` when no log file could be opened.
pub fn init() -> Option<WorkerGuard> {
    let path = AppDirs::log_path()?;
    init_at(&path)
}

pub fn init_at(path: &Path) -> Option<WorkerGuard> {
    let dir = path.parent()?;
    let file_name = path.file_name()?;

    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("failed to create log directory {:?}: {}", dir, e);
        return None;
    }

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    if tracing_subscriber::registry()
        .with(file_layer)
        .with(filter)
        .try_init()
        .is_err()
    {
        return None;
    }

    tracing::info!(log_file = ?path, "logging initialized");
    Some(guard)
}
