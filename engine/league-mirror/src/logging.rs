//! Logging and tracing setup

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    filter::LevelFilter, fmt, fmt::time::ChronoLocal, prelude::*, EnvFilter,
};

const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Initialize logging: INFO and above are appended to `history_log`, and
/// `RUST_LOG` (default `warn`) controls what reaches stderr.
///
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn initialize_logging(history_log: &Path) -> Result<WorkerGuard> {
    let directory = history_log
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = history_log
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", history_log.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(directory)
        .with_context(|| format!("Failed to open log file {}", history_log.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string()))
        .with_filter(LevelFilter::INFO);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracing::{debug, info};

    #[test]
    fn test_history_log_receives_info_lines() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("history.log");

        let guard = initialize_logging(&log_path).unwrap();
        info!("Exported: League Table_results");
        debug!("not recorded");
        drop(guard);

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("INFO"));
        assert!(content.contains("Exported: League Table_results"));
        assert!(!content.contains("not recorded"));
    }
}
