//! Tracing setup: a compact stdout layer, plus a file layer when `STUDENTS_LOG_FILE` is set.
use std::ffi::OsStr;
use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber. `RUST_LOG` controls filtering and defaults to `info`.
///
/// A log file that cannot be prepared is reported on stderr and skipped; stdout logging is
/// always installed.
pub fn init_tracing(log_file: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = log_file.and_then(file_writer).map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).compact())
        .with(file_layer)
        .init();
}

fn file_writer(path: &Path) -> Option<NonBlocking> {
    let Some((dir, file_name)) = split_log_path(path) else {
        eprintln!("Log file path has no file name: {}", path.display());
        return None;
    };
    if let Err(err) = std::fs::create_dir_all(dir) {
        eprintln!("Failed to create log directory {}: {err}", dir.display());
        return None;
    }
    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(writer)
}

/// Split a log path into the directory to create and the file name to append to. A bare
/// file name resolves against the working directory.
fn split_log_path(path: &Path) -> Option<(&Path, &OsStr)> {
    let file_name = path.file_name()?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Some((dir, file_name))
}
