use tracing_appender::{
    non_blocking,
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|val| val == "true" || val == "1")
        .unwrap_or(false)
}

/// Installs the global subscriber: pretty console output filtered by
/// `RUST_LOG`, plus a daily-rolling JSON file when `ENABLE_FILE_LOG` is set.
///
/// The returned guard flushes the file writer and must live as long as the
/// process.
pub fn init_logger(component: &str) -> Option<WorkerGuard> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer()
        .pretty()
        .with_thread_names(true)
        .with_ansi(true)
        .with_filter(console_filter);

    if !env_flag("ENABLE_FILE_LOG") {
        tracing_subscriber::registry().with(console_layer).init();
        return None;
    }

    let log_dir = if env_flag("DEV_MODE") {
        "./logs"
    } else {
        "/var/log/app"
    };

    let file_name = format!("rust_app_{component}.log");
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, file_name);
    let (file_writer, guard) = non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .json()
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    Some(guard)
}
