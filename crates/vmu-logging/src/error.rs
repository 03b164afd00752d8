//! Logging setup errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("log file name fragment must not be empty")]
    EmptyNameFragment,

    #[error("log file name fragment {0:?} must not contain path separators")]
    InvalidNameFragment(String),

    #[error("failed to open log file in {path:?}: {source}")]
    RollingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open error log store: {0:#}")]
    Storage(#[from] anyhow::Error),

    #[error("invalid log filter directive: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("a process-wide logger is already installed")]
    AlreadyInstalled,

    #[error("failed to emit log record: {0}")]
    Emission(String),
}

pub type Result<T> = std::result::Result<T, LoggingError>;
