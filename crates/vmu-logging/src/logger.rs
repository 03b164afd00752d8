//! Finalized logging pipeline.
//!
//! [`LoggerConfiguration::create_logger`] opens every sink and wraps the
//! resulting subscriber in a [`Logger`]. A logger can be used as an explicit
//! handle (`in_scope`) or installed once as the process-wide default.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::dispatcher::{self, Dispatch};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::config::{rolling_file_stem, ConsoleTarget, LoggerConfiguration, SinkConfig};
use crate::error_layer::ErrorStoreLayer;
use crate::rolling::DailyRollingFile;
use crate::{LoggingError, Result};

type BaseSubscriber = Layered<Option<EnvFilter>, Registry>;
type BoxedLayer = Box<dyn Layer<BaseSubscriber> + Send + Sync + 'static>;

/// A live logging pipeline.
///
/// Dropping the logger flushes buffered file records.
pub struct Logger {
    dispatch: Dispatch,
    log_files: Vec<PathBuf>,
    guards: Vec<WorkerGuard>,
}

/// Keeps the installed logger's background writers alive.
///
/// Hold this until the program exits; dropping it flushes buffered records.
#[must_use = "dropping the guard stops background log writers"]
pub struct LoggerGuard {
    _guards: Vec<WorkerGuard>,
}

impl LoggerConfiguration {
    /// Open every sink and build the logger.
    ///
    /// Fails if any sink cannot be constructed; nothing is retried.
    pub fn create_logger(self) -> Result<Logger> {
        let (sinks, filter) = self.into_parts();

        let filter = filter
            .as_deref()
            .map(EnvFilter::try_new)
            .transpose()?;

        let mut layers: Vec<BoxedLayer> = Vec::with_capacity(sinks.len());
        let mut guards = Vec::new();
        let mut log_files = Vec::new();

        for sink in sinks {
            let level = LevelFilter::from_level(sink.min_level());

            match sink {
                SinkConfig::Console { ansi, target, .. } => {
                    let layer = fmt::layer().with_ansi(ansi).compact().with_target(true);
                    let layer = match target {
                        ConsoleTarget::Stdout => layer.with_writer(std::io::stdout).with_filter(level).boxed(),
                        ConsoleTarget::Writer(writer) => layer.with_writer(writer).with_filter(level).boxed(),
                    };
                    layers.push(layer);
                }
                SinkConfig::RollingFile {
                    directory,
                    name_fragment,
                    extension,
                    retained_file_count,
                    ..
                } => {
                    let stem = rolling_file_stem(&name_fragment)?;
                    let writer =
                        DailyRollingFile::open(&directory, stem, extension, retained_file_count)
                            .map_err(|source| LoggingError::RollingFile {
                                path: directory.clone(),
                                source,
                            })?;
                    log_files.push(writer.active_path());

                    let (non_blocking, guard) = tracing_appender::non_blocking(writer);
                    guards.push(guard);

                    let layer = fmt::layer()
                        .json()
                        .flatten_event(true)
                        .with_current_span(false)
                        .with_span_list(false)
                        .with_ansi(false)
                        .with_writer(non_blocking)
                        .with_filter(level)
                        .boxed();
                    layers.push(layer);
                }
                SinkConfig::ErrorStore {
                    database_path,
                    retention_period,
                    retention_check_interval,
                    ..
                } => {
                    let layer = ErrorStoreLayer::open(
                        &database_path,
                        retention_period,
                        retention_check_interval,
                    )?;
                    layers.push(layer.with_filter(level).boxed());
                }
            }
        }

        let subscriber = tracing_subscriber::registry().with(filter).with(layers);
        let logger = Logger {
            dispatch: Dispatch::new(subscriber),
            log_files,
            guards,
        };

        logger.in_scope(|| debug!(files = ?logger.log_files, "Logger created"));

        Ok(logger)
    }
}

impl Logger {
    /// The dispatcher behind this logger.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Active rolling log files, in sink order.
    pub fn log_files(&self) -> &[PathBuf] {
        &self.log_files
    }

    /// Run `f` with this logger as the current thread's default.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        dispatcher::with_default(&self.dispatch, f)
    }

    /// Emit the build date record through this logger.
    pub fn log_build_date(&self, build_date: Option<DateTime<Utc>>) -> Result<()> {
        self.in_scope(|| log_build_date(build_date))
    }

    /// Install as the process-wide default logger.
    ///
    /// Only one logger can ever be installed per process.
    pub fn install(self) -> Result<LoggerGuard> {
        dispatcher::set_global_default(self.dispatch)
            .map_err(|_| LoggingError::AlreadyInstalled)?;

        Ok(LoggerGuard {
            _guards: self.guards,
        })
    }
}

/// Emit one INFO record carrying the build date to the current default logger.
///
/// A panic raised while the record is processed is returned as
/// [`LoggingError::Emission`].
pub fn log_build_date(build_date: Option<DateTime<Utc>>) -> Result<()> {
    let build_date = vmu_core::describe_build_date(build_date);

    catch_unwind(AssertUnwindSafe(|| {
        info!(build_date = %build_date, "Build date: {}", build_date);
    }))
    .map_err(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        LoggingError::Emission(reason)
    })
}
