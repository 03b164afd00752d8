//! One-call logging setup for Vibration Monitor programs.

use std::path::PathBuf;

use crate::config::LoggingSettings;
use crate::logger::{log_build_date, LoggerGuard};
use crate::Result;

/// Install the standard process-wide logger and log the build date.
///
/// - Console: DEBUG and above
/// - `<program dir>/1_Log-<fragment>.json`: TRACE and above, daily, 30 files
/// - Error store in the app data directory: ERROR and above, 60 days
///
/// `build_time` is the host program's own RFC 3339 build stamp (for example
/// shadow-rs `build::BUILD_TIME_3339`); `None` logs the date as unknown.
///
/// Sink construction errors are returned. A bad stamp or a failure while
/// emitting the build date record is printed to stderr and does not abort
/// startup.
pub fn setup_standard_logging(
    name_fragment: &str,
    build_time: Option<&str>,
) -> Result<LoggerGuard> {
    // Load .env file if present (for development)
    dotenvy::dotenv().ok();

    setup_standard_logging_with(&LoggingSettings::from_env(), name_fragment, build_time)
}

/// Like [`setup_standard_logging`] with the log file and error store in
/// `directory`.
pub fn setup_standard_logging_in(
    directory: impl Into<PathBuf>,
    name_fragment: &str,
    build_time: Option<&str>,
) -> Result<LoggerGuard> {
    setup_standard_logging_with(
        &LoggingSettings::in_directory(directory),
        name_fragment,
        build_time,
    )
}

/// Like [`setup_standard_logging`] with explicit settings.
pub fn setup_standard_logging_with(
    settings: &LoggingSettings,
    name_fragment: &str,
    build_time: Option<&str>,
) -> Result<LoggerGuard> {
    let guard = settings
        .configuration(name_fragment)
        .create_logger()?
        .install()?;

    if let Err(e) = log_build_date(vmu_core::build_date(build_time)) {
        eprintln!("Warning: {}", e);
    }

    Ok(guard)
}
