//! Tracing setup.
//!
//! Logs go to a single never-rotated file, `spoolwise.log`, in the OS data
//! dir unless the caller picks another directory:
//!   Linux    ~/.local/share/spoolwise/spoolwise.log
//!   macOS    ~/Library/Application Support/spoolwise/spoolwise.log
//!   Windows  %LOCALAPPDATA%\spoolwise\spoolwise.log
//!
//! Log level is controlled by the `RUST_LOG` environment variable; defaults
//! to INFO when the variable is absent.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use crate::error::AppError;

pub const LOG_FILE_NAME: &str = "spoolwise.log";

/// `<data_local_dir>/spoolwise`, or a relative `spoolwise` when the platform
/// has no data dir.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir().unwrap_or_default().join("spoolwise")
}

/// Install the global subscriber writing to `log_dir` (or
/// [`default_log_dir`]).
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the background writer.
///
/// # Errors
///
/// [`AppError::Io`] if the directory or file cannot be created, or a global
/// subscriber is already installed.
pub fn init_tracing(log_dir: Option<&Path>) -> Result<WorkerGuard, AppError> {
    let dir = log_dir.map(Path::to_path_buf).unwrap_or_else(default_log_dir);
    std::fs::create_dir_all(&dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(&dir)
        .map_err(|e| AppError::Io(format!("cannot open log file in {}: {e}", dir.display())))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .try_init()
        .map_err(|e| AppError::Io(format!("tracing already initialised: {e}")))?;

    tracing::info!(dir = %dir.display(), "spoolwise logging started");
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_dir_ends_in_app_name() {
        assert!(default_log_dir().ends_with("spoolwise"));
    }

    #[test]
    fn init_writes_log_file_and_refuses_second_install() {
        let dir = tempfile::tempdir().expect("tempdir");
        let logs = dir.path().join("logs");

        let guard = init_tracing(Some(&logs)).expect("first init");
        tracing::info!("hello from the test");
        drop(guard);

        assert!(logs.join(LOG_FILE_NAME).exists());
        assert!(matches!(init_tracing(Some(&logs)), Err(AppError::Io(_))));
    }
}
