//! Logging setup.
//!
//! Two `fmt` layers under one `EnvFilter`: colored output on stderr, and a
//! plain append-only `impresion.log` in the per-user data directory. The file
//! writer is non-blocking; keep the returned guard alive until exit or the
//! tail of the log is lost.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log file name inside the log directory.
pub const LOG_FILE: &str = "impresion.log";

const APP_DIR: &str = "ticketera";

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info,tower_http=info,hyper=warn,reqwest=warn";

/// Per-user application data directory.
///
/// `%APPDATA%\ticketera` on Windows; `$XDG_DATA_HOME/ticketera` or
/// `~/.local/share/ticketera` elsewhere. `None` if no home can be found.
pub fn default_log_dir() -> Option<PathBuf> {
    let base = if cfg!(windows) {
        env::var_os("APPDATA").map(PathBuf::from)
    } else {
        env::var_os("XDG_DATA_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".local/share")))
    };
    base.map(|dir| dir.join(APP_DIR))
}

/// Install the global subscriber.
///
/// With `log_dir = None` only stderr is used. If the directory cannot be
/// created, file logging is skipped and a warning is logged once the
/// subscriber is up.
pub fn init(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let (file_layer, guard, failure) = match log_dir.map(|dir| (dir, fs::create_dir_all(dir))) {
        Some((dir, Ok(()))) => {
            let (writer, guard) = tracing_appender::non_blocking(rolling::never(dir, LOG_FILE));
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(writer);
            (Some(layer), Some(guard), None)
        }
        Some((dir, Err(e))) => (None, None, Some((dir, e))),
        None => (None, None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    match (failure, log_dir) {
        (Some((dir, e)), _) => {
            tracing::warn!(dir = %dir.display(), error = %e, "log directory unavailable, logging to stderr only")
        }
        (None, Some(dir)) => tracing::info!(file = %dir.join(LOG_FILE).display(), "logging to file"),
        (None, None) => {}
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_dir_ends_with_app_name() {
        if let Some(dir) = default_log_dir() {
            assert!(dir.ends_with(APP_DIR));
        }
    }
}
