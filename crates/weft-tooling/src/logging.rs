//! Structured logging setup (§6 "Configuration surface"): a
//! `tracing-subscriber` env-filter layer to stderr, plus an optional
//! daily-rotating file sink selected by `LOG_FILE_PATH`. Adapted from
//! `tooling::logging`'s helpers (`format_duration`, `LogGuard`) and the
//! teacher's general `RUST_LOG`-driven subscriber init pattern.

use crate::env::get_env;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber. Returns a [`WorkerGuard`]
/// when `LOG_FILE_PATH` is set — the guard must be kept alive for the
/// process lifetime so buffered file writes are flushed on shutdown.
pub fn init_logging() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match get_env("LOG_FILE_PATH").ok().flatten() {
        Some(path) => {
            let path = std::path::PathBuf::from(path);
            let directory = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_else(|| "weft.log".to_string());
            let appender = tracing_appender::rolling::daily(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}

/// Logs a future's start/completion at debug level with its elapsed time.
pub async fn timed<F, T>(name: &str, future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let start = Instant::now();
    debug!("starting: {name}");
    let result = future.await;
    debug!("completed: {name} in {}", format_duration(start.elapsed()));
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// RAII guard that logs scope entry/exit with elapsed time, matching
/// `tooling::logging::LogGuard`.
pub struct LogGuard {
    name: String,
    start: Instant,
    level: LogLevel,
}

impl LogGuard {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_level(name, LogLevel::Debug)
    }

    pub fn with_level(name: impl Into<String>, level: LogLevel) -> Self {
        let name = name.into();
        log_at(level, &format!("entering: {name}"));
        Self { name, start: Instant::now(), level }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        log_at(self.level, &format!("exiting: {} (elapsed: {})", self.name, format_duration(self.start.elapsed())));
    }
}

fn log_at(level: LogLevel, message: &str) {
    match level {
        LogLevel::Debug => debug!("{message}"),
        LogLevel::Info => info!("{message}"),
        LogLevel::Warn => warn!("{message}"),
        LogLevel::Error => error!("{message}"),
    }
}

/// Human-readable duration formatting for log lines.
pub fn format_duration(duration: std::time::Duration) -> String {
    let micros = duration.as_micros();
    if micros < 1_000 {
        format!("{micros}\u{3bc}s")
    } else if micros < 1_000_000 {
        format!("{}ms", micros / 1_000)
    } else if micros < 60_000_000 {
        format!("{:.2}s", micros as f64 / 1_000_000.0)
    } else {
        let seconds = micros / 1_000_000;
        format!("{}m{}s", seconds / 60, seconds % 60)
    }
}
