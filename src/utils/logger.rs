//! Logging initialization and configuration.
//!
//! Standard output carries the result of each verb back to the shell, so
//! logs are written to files in the cache directory instead. Log files are
//! rotated daily, which keeps one file per day even though every keystroke
//! starts a new process.
//!
//! # Configuration
//!
//! The log level can be controlled via the `RUST_LOG` environment variable:
//! - `RUST_LOG=debug` - Show debug and higher level logs
//! - `RUST_LOG=info` - Show info and higher level logs (default)
//! - `RUST_LOG=warn` - Show warnings and errors only
//! - `RUST_LOG=error` - Show errors only

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use super::paths;

const LOG_FILE_PREFIX: &str = "histrank.log";

/// Initialize the logging system.
///
/// Logs go to `<log_dir>/histrank.log.YYYY-MM-DD`. The returned guard flushes
/// the non-blocking writer when dropped and must be kept alive until the
/// process exits. Returns `None` if the log directory cannot be created, in
/// which case logging is disabled.
pub fn init_logging(log_dir: &Path) -> Option<WorkerGuard> {
    if let Err(e) = paths::ensure_private_dir(log_dir) {
        eprintln!("Warning: logging disabled: {:#}", e);
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI colors in log files
        .with_target(true)
        .with_line_number(true);

    // Default to "info" level if RUST_LOG is not set
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
    {
        eprintln!("Warning: logging already initialized: {}", e);
        return None;
    }

    tracing::debug!(pid = std::process::id(), "Logging initialized in {}", log_dir.display());
    Some(guard)
}
