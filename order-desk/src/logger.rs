//! Logging Infrastructure
//!
//! Console output filtered by `RUST_LOG` (or the `--log-level` flag), with
//! an optional daily rolling file.

use std::path::Path;

use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "order_desk=info,desk_client=info";

fn env_filter(log_level: Option<&str>) -> EnvFilter {
    match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()),
    }
}

/// Initialize the logger.
///
/// With a log directory, output goes to a daily rolling file instead of
/// stderr. The returned guard must be held until exit so buffered lines
/// are flushed.
pub fn init_logger(log_level: Option<&str>, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(log_level))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let unavailable = match log_dir {
        Some(dir) => match std::fs::create_dir_all(dir) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(dir, "order-desk");
                let (writer, guard) = tracing_appender::non_blocking(file_appender);
                subscriber.with_ansi(false).with_writer(writer).init();
                return Some(guard);
            }
            Err(e) => Some((dir, e)),
        },
        None => None,
    };

    subscriber.init();
    if let Some((dir, e)) = unavailable {
        warn!(dir = %dir.display(), error = %e, "Log directory unavailable, logging to stderr");
    }
    None
}
