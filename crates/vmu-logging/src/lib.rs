//! VMU Logging
//!
//! Sets up structured logging for Vibration Monitor programs:
//! - Colored console output (DEBUG and above)
//! - Compact JSON records in a daily rolling file (TRACE and above)
//! - Error records persisted to SQLite with age-based retention
//!
//! # Usage
//!
//! The host stamps its own build time (here with shadow-rs, whose build
//! script is `fn main() -> shadow_rs::SdResult<()> { shadow_rs::new() }`):
//!
//! ```rust,ignore
//! shadow_rs::shadow!(build);
//!
//! fn main() -> anyhow::Result<()> {
//!     // Keep the guard alive for the whole program
//!     let _logging =
//!         vmu_logging::setup_standard_logging("collector", Some(build::BUILD_TIME_3339))?;
//!
//!     tracing::info!(token = %vmu_core::random_string(8), "Collector started");
//!     Ok(())
//! }
//! ```
//!
//! Programs that prefer an explicit handle compose the configuration
//! themselves:
//!
//! ```rust,ignore
//! use vmu_logging::LoggerConfiguration;
//!
//! let logger = LoggerConfiguration::new()
//!     .with_console()
//!     .with_rolling_file("collector")
//!     .create_logger()?;
//!
//! logger.in_scope(|| tracing::info!("scoped to this logger"));
//! ```

pub mod config;
mod error;
pub mod error_layer;
mod logger;
pub mod rolling;
mod standard;

pub use config::{ConsoleTarget, LoggerConfiguration, LoggingSettings, SinkConfig};
pub use error::{LoggingError, Result};
pub use error_layer::ErrorStoreLayer;
pub use logger::{log_build_date, Logger, LoggerGuard};
pub use rolling::DailyRollingFile;
pub use standard::{setup_standard_logging, setup_standard_logging_in, setup_standard_logging_with};
