//! Logging Infrastructure
//!
//! `RUST_LOG` controls the filter. With a log directory the output goes to a
//! daily rolling file instead of stdout.

use std::path::Path;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "booking_server=info,tower_http=info";

/// Initialize the logger with optional file output
///
/// The returned guard flushes the file writer on drop and must be kept alive
/// for the lifetime of the process.
pub fn init_logger(log_dir: Option<&str>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if let Some(dir) = log_dir
        && Path::new(dir).is_dir()
    {
        let file_appender = tracing_appender::rolling::daily(dir, "booking-server");
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        subscriber.with_writer(writer).with_ansi(false).init();
        return Some(guard);
    }

    subscriber.init();
    None
}
