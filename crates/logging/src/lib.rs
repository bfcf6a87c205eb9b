//! Logging initialization for the jkg binary.
//!
//! Two modes are supported:
//! - CLI mode: human-readable lines on STDERR, so STDOUT stays free for
//!   command output.
//! - File mode: the same lines on STDERR plus JSON lines in a rolling file
//!   `jkg.log` inside the chosen directory.
//!
//! The log file is rolled over when it reaches 5 MB. Rotated logs are
//! compressed and at most 10 of them are kept.

use anyhow::{Context, Result};
use file_rotate::{ContentLimit, FileRotate, compression::Compression, suffix::AppendCount};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_NAME: &str = "jkg.log";
const MAX_LOG_BYTES: usize = 5 * 1024 * 1024;
const MAX_ROTATED_LOGS: usize = 10;

pub enum LogMode {
    Cli,
    File(PathBuf),
}

/// Guard that keeps background logging workers alive.
pub struct LoggingGuards {
    _guards: Vec<WorkerGuard>,
}

fn env_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

pub fn rotating_writer(log_dir: &Path) -> Result<FileRotate<AppendCount>> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    Ok(FileRotate::new(
        log_dir.join(LOG_FILE_NAME),
        AppendCount::new(MAX_ROTATED_LOGS),
        ContentLimit::Bytes(MAX_LOG_BYTES),
        Compression::OnRotate(1),
        None,
    ))
}

pub fn init(mode: LogMode, verbose: bool) -> Result<Option<LoggingGuards>> {
    let filter = env_filter(verbose);

    match mode {
        LogMode::Cli => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
        LogMode::File(log_dir) => {
            let (file_non_blocking, file_guard) =
                tracing_appender::non_blocking(rotating_writer(&log_dir)?);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                .with(
                    fmt::layer()
                        .json()
                        .with_ansi(false)
                        .with_writer(file_non_blocking),
                )
                .init();

            Ok(Some(LoggingGuards {
                _guards: vec![file_guard],
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_rotating_writer_creates_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("nested/logs");

        let mut writer = rotating_writer(&log_dir).unwrap();
        writer.write_all(b"{\"level\":\"INFO\"}\n").unwrap();
        writer.flush().unwrap();

        let content = std::fs::read_to_string(log_dir.join(LOG_FILE_NAME)).unwrap();
        assert!(content.contains("INFO"));
    }
}
