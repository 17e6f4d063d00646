//! Logging Infrastructure
//!
//! Structured logging setup shared by binaries and integration tests.

/// Initialize the logger with the given level (falls back to `info`).
///
/// Safe to call more than once; subsequent calls are no-ops.
pub fn init_logger(log_level: Option<&str>) {
    let level = log_level.unwrap_or("info");

    let _ = tracing_subscriber::fmt()
        .with_max_level(level.parse().unwrap_or(tracing::Level::INFO))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .try_init();
}
