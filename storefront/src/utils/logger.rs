//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments.

use std::path::Path;

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Initialize the logger with optional file output
///
/// `json` switches the formatter to one JSON object per line, which is what
/// production log shipping expects. File output is only enabled when
/// `log_dir` already exists.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let max_level = level.parse().unwrap_or(tracing::Level::INFO);

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_dir = log_dir
        .map(Path::new)
        .filter(|p| p.exists())
        .and_then(|p| p.to_str());

    // try_init: tests and embedders may have installed a subscriber already
    let result = match (file_dir, json.unwrap_or(false)) {
        (Some(dir), true) => {
            let file_appender = tracing_appender::rolling::daily(dir, "storefront");
            subscriber.json().with_writer(file_appender).try_init()
        }
        (Some(dir), false) => {
            let file_appender = tracing_appender::rolling::daily(dir, "storefront");
            subscriber.with_ansi(false).with_writer(file_appender).try_init()
        }
        (None, true) => subscriber.json().try_init(),
        (None, false) => subscriber.try_init(),
    };

    if let Err(e) = result {
        eprintln!("Logger already initialized: {}", e);
    }
}
