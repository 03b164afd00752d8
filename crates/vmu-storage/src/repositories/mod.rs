//! SQLite repository implementations.

mod error_log_repository;

pub use error_log_repository::{ErrorLogRecord, SqliteErrorLogRepository, ERROR_LOG_TABLE};
