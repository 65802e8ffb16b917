use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const LOG_FILE: &str = "party_time.log";

/// Installs the global subscriber: stderr always, plus a daily rolling file
/// under `log_dir` when given. Keep the guard alive until exit.
pub fn init(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = daily_appender(dir)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
    Ok(guard)
}

fn daily_appender(dir: &Path) -> Result<RollingFileAppender> {
    fs::create_dir_all(dir).with_context(|| format!("create log dir {}", dir.display()))?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE)
        .build(dir)
        .with_context(|| format!("open log file in {}", dir.display()))
}

/// Routes a `[LEVEL] message` console line to the matching tracing macro.
pub fn forward_console_line(line: &str) {
    if let Some(msg) = line.strip_prefix("[WARN] ") {
        tracing::warn!("{msg}");
    } else if let Some(msg) = line.strip_prefix("[ERROR] ") {
        tracing::error!("{msg}");
    } else if let Some(msg) = line.strip_prefix("[INFO] ") {
        tracing::info!("{msg}");
    } else {
        tracing::debug!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unusable_log_dir_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = daily_appender(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("create log dir"));
    }

    #[test]
    fn creates_missing_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("logs");
        daily_appender(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
