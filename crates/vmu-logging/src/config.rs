//! Logger configuration: which sinks exist and how each is set up.
//!
//! A [`LoggerConfiguration`] only describes sinks. Nothing is opened until
//! [`LoggerConfiguration::create_logger`] finalizes it, so composing steps never
//! fails; construction errors surface once, at finalization.

use std::fmt;
use std::path::PathBuf;

use chrono::Duration;
use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use vmu_core::{branding, location};

/// Minimum level written to the console.
pub const CONSOLE_MIN_LEVEL: Level = Level::DEBUG;

/// Minimum level written to the rolling JSON file.
pub const FILE_MIN_LEVEL: Level = Level::TRACE;

/// Minimum level persisted in the error store.
pub const ERROR_STORE_MIN_LEVEL: Level = Level::ERROR;

/// Rolling files kept, the active file included.
pub const RETAINED_FILE_COUNT: usize = 30;

/// Extension of rolling log files.
pub const LOG_FILE_EXTENSION: &str = "json";

/// Days an error record is kept in the store.
pub const ERROR_RETENTION_DAYS: i64 = 60;

/// Days between checks for expired error records.
pub const ERROR_RETENTION_CHECK_DAYS: i64 = 1;

/// Environment variable that moves rolling log files out of the program directory.
pub const LOG_DIR_ENV: &str = "VMU_LOG_DIR";

/// Where console output goes.
pub enum ConsoleTarget {
    Stdout,
    /// Any writer, e.g. an in-memory buffer in tests.
    Writer(BoxMakeWriter),
}

impl fmt::Debug for ConsoleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("Stdout"),
            Self::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

/// One configured log destination.
#[derive(Debug)]
pub enum SinkConfig {
    /// Human-readable lines on a console stream.
    Console {
        min_level: Level,
        ansi: bool,
        target: ConsoleTarget,
    },
    /// Compact JSON records in a daily rolling file
    /// `<directory>/<LOG_PREFIX>-<name_fragment>.<extension>`.
    RollingFile {
        directory: PathBuf,
        name_fragment: String,
        extension: String,
        min_level: Level,
        retained_file_count: usize,
    },
    /// Error records in the SQLite `ErrorLogs` table.
    ErrorStore {
        database_path: PathBuf,
        min_level: Level,
        retention_period: Duration,
        retention_check_interval: Duration,
    },
}

impl SinkConfig {
    /// Console sink with the default level, colored.
    pub fn console() -> Self {
        Self::Console {
            min_level: CONSOLE_MIN_LEVEL,
            ansi: true,
            target: ConsoleTarget::Stdout,
        }
    }

    /// Rolling JSON file sink with the default level and retention.
    pub fn rolling_file(directory: impl Into<PathBuf>, name_fragment: impl Into<String>) -> Self {
        Self::RollingFile {
            directory: directory.into(),
            name_fragment: name_fragment.into(),
            extension: LOG_FILE_EXTENSION.to_string(),
            min_level: FILE_MIN_LEVEL,
            retained_file_count: RETAINED_FILE_COUNT,
        }
    }

    /// Error store sink with the default level and retention.
    pub fn error_store(database_path: impl Into<PathBuf>) -> Self {
        Self::ErrorStore {
            database_path: database_path.into(),
            min_level: ERROR_STORE_MIN_LEVEL,
            retention_period: Duration::days(ERROR_RETENTION_DAYS),
            retention_check_interval: Duration::days(ERROR_RETENTION_CHECK_DAYS),
        }
    }

    pub fn min_level(&self) -> Level {
        match self {
            Self::Console { min_level, .. }
            | Self::RollingFile { min_level, .. }
            | Self::ErrorStore { min_level, .. } => *min_level,
        }
    }
}

/// Ordered list of sinks plus an optional global filter directive.
#[derive(Debug, Default)]
pub struct LoggerConfiguration {
    sinks: Vec<SinkConfig>,
    filter: Option<String>,
}

impl LoggerConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append any sink.
    pub fn with_sink(mut self, sink: SinkConfig) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Append a colored console sink at DEBUG and above.
    pub fn with_console(self) -> Self {
        self.with_sink(SinkConfig::console())
    }

    /// Append an uncolored DEBUG console sink writing to `writer`.
    pub fn with_console_writer(self, writer: BoxMakeWriter) -> Self {
        self.with_sink(SinkConfig::Console {
            min_level: CONSOLE_MIN_LEVEL,
            ansi: false,
            target: ConsoleTarget::Writer(writer),
        })
    }

    /// Append the rolling JSON file (in the program directory) and the
    /// persistent error store (in the app data directory).
    pub fn with_rolling_file(self, name_fragment: impl Into<String>) -> Self {
        self.with_rolling_file_in(location::program_directory(), name_fragment)
    }

    /// Like [`with_rolling_file`](Self::with_rolling_file) with the JSON file in
    /// `directory`.
    pub fn with_rolling_file_in(
        self,
        directory: impl Into<PathBuf>,
        name_fragment: impl Into<String>,
    ) -> Self {
        self.with_json_file_in(directory, name_fragment)
            .with_error_store_at(location::error_db_path())
    }

    /// Append only the rolling JSON file sink.
    pub fn with_json_file_in(
        self,
        directory: impl Into<PathBuf>,
        name_fragment: impl Into<String>,
    ) -> Self {
        self.with_sink(SinkConfig::rolling_file(directory, name_fragment))
    }

    /// Append only the persistent error store sink.
    pub fn with_error_store_at(self, database_path: impl Into<PathBuf>) -> Self {
        self.with_sink(SinkConfig::error_store(database_path))
    }

    /// Global `EnvFilter` directive applied in front of every sink.
    pub fn with_filter(mut self, directive: impl Into<String>) -> Self {
        self.filter = Some(directive.into());
        self
    }

    pub fn sinks(&self) -> &[SinkConfig] {
        &self.sinks
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub(crate) fn into_parts(self) -> (Vec<SinkConfig>, Option<String>) {
        (self.sinks, self.filter)
    }
}

/// File name stem for a rolling log, validating the name fragment.
pub(crate) fn rolling_file_stem(name_fragment: &str) -> crate::Result<String> {
    if name_fragment.trim().is_empty() {
        return Err(crate::LoggingError::EmptyNameFragment);
    }
    if name_fragment.contains(['/', '\\']) {
        return Err(crate::LoggingError::InvalidNameFragment(
            name_fragment.to_string(),
        ));
    }
    Ok(branding::log_file_stem(name_fragment))
}

/// Environment-derived settings for the standard setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Directory of the rolling JSON file
    pub log_dir: PathBuf,
    /// Path of the persistent error store
    pub error_db_path: PathBuf,
    /// Global filter directive (`RUST_LOG`)
    pub filter: Option<String>,
}

impl LoggingSettings {
    /// Read `VMU_LOG_DIR`, `VMU_DATA_DIR` and `RUST_LOG`.
    ///
    /// Call after `.env` has been loaded so its values are visible.
    pub fn from_env() -> Self {
        let log_dir = std::env::var_os(LOG_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(location::program_directory);

        Self {
            log_dir,
            error_db_path: location::error_db_path(),
            filter: std::env::var("RUST_LOG")
                .ok()
                .filter(|directive| !directive.trim().is_empty()),
        }
    }

    /// Keep both the rolling file and the error store in `directory`.
    pub fn in_directory(directory: impl Into<PathBuf>) -> Self {
        let directory = directory.into();
        Self {
            error_db_path: directory.join(branding::ERROR_DB_FILE),
            log_dir: directory,
            filter: None,
        }
    }

    /// Standard configuration: console, rolling JSON file, error store.
    pub fn configuration(&self, name_fragment: impl Into<String>) -> LoggerConfiguration {
        let configuration = LoggerConfiguration::new()
            .with_console()
            .with_json_file_in(&self.log_dir, name_fragment)
            .with_error_store_at(&self.error_db_path);

        match &self.filter {
            Some(directive) => configuration.with_filter(directive.clone()),
            None => configuration,
        }
    }
}
