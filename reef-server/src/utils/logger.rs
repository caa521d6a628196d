//! Logging Infrastructure
//!
//! Structured logging setup for development and production environments.
//! The filter comes from `RUST_LOG` when set, otherwise a crate-scoped
//! default; an optional log directory enables daily-rolling file output.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Default filter when RUST_LOG is not set
const DEFAULT_FILTER: &str = "reef_server=info,tower_http=info";

/// Initialize the logger with stdout output only
pub fn init_logger() {
    init_logger_with_file(None);
}

/// Initialize the logger, optionally adding a daily-rolling file appender
///
/// The directory must already exist; a missing directory silently falls
/// back to stdout-only so a bad LOG_DIR cannot take the server down.
pub fn init_logger_with_file(log_dir: Option<&str>) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "reef-server");
            subscriber.with_writer(file_appender).init();
            return;
        }
        eprintln!("log directory {dir} does not exist, logging to stdout");
    }

    subscriber.init();
}
