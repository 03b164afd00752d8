//! VMU Storage Layer
//!
//! SQLite persistence for error-level log records.
//!
//! # Usage
//!
//! ```rust,ignore
//! use parking_lot::Mutex;
//! use std::path::Path;
//! use std::sync::Arc;
//! use vmu_storage::{Database, ErrorLogRecord, SqliteErrorLogRepository};
//!
//! let db = Database::open(Path::new("VibrationMonitorErrorLog.db"))?;
//! let repo = SqliteErrorLogRepository::new(Arc::new(Mutex::new(db)));
//!
//! repo.insert(&ErrorLogRecord::new("ERROR", "sensor 4 disconnected"))?;
//! ```

mod database;
mod repositories;

pub use database::Database;
pub use repositories::*;
