//! SQLite repository for the `ErrorLogs` table.
//!
//! Records are appended by the logging layer and pruned by age. Timestamps are
//! stored as fixed-width RFC 3339 UTC text, so string order is time order.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::Database;

/// Name of the table holding persisted error records.
pub const ERROR_LOG_TABLE: &str = "ErrorLogs";

/// One persisted error record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorLogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub exception: Option<String>,
    pub rendered_message: String,
    /// Remaining event fields as a JSON object
    pub properties: serde_json::Value,
}

impl ErrorLogRecord {
    pub fn new(level: impl Into<String>, rendered_message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level: level.into(),
            exception: None,
            rendered_message: rendered_message.into(),
            properties: serde_json::Value::Object(Default::default()),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_exception(mut self, exception: impl Into<String>) -> Self {
        self.exception = Some(exception.into());
        self
    }

    pub fn with_properties(mut self, properties: serde_json::Value) -> Self {
        self.properties = properties;
        self
    }
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<ErrorLogRecord> {
    let timestamp: String = row.get(0)?;
    let properties: String = row.get(4)?;

    let timestamp = DateTime::parse_from_rfc3339(&timestamp)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(ErrorLogRecord {
        timestamp,
        level: row.get(1)?,
        exception: row.get(2)?,
        rendered_message: row.get(3)?,
        properties: serde_json::from_str(&properties).unwrap_or(serde_json::Value::Null),
    })
}

/// SQLite-backed error log repository.
#[derive(Clone)]
pub struct SqliteErrorLogRepository {
    db: Arc<Mutex<Database>>,
}

impl SqliteErrorLogRepository {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    /// Append a record.
    pub fn insert(&self, record: &ErrorLogRecord) -> Result<()> {
        let db = self.db.lock();
        let conn = db.connection();

        conn.execute(
            "INSERT INTO ErrorLogs (Timestamp, Level, Exception, RenderedMessage, Properties)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                format_timestamp(&record.timestamp),
                record.level,
                record.exception,
                record.rendered_message,
                record.properties.to_string(),
            ],
        )?;

        Ok(())
    }

    /// Delete records older than `cutoff`. Returns the number removed.
    pub fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let db = self.db.lock();
        let conn = db.connection();

        let removed = conn.execute(
            "DELETE FROM ErrorLogs WHERE Timestamp < ?1",
            params![format_timestamp(&cutoff)],
        )?;

        Ok(removed)
    }

    /// Most recent records first.
    pub fn list_recent(&self, limit: usize) -> Result<Vec<ErrorLogRecord>> {
        let db = self.db.lock();
        let conn = db.connection();

        let mut stmt = conn.prepare(
            "SELECT Timestamp, Level, Exception, RenderedMessage, Properties
             FROM ErrorLogs ORDER BY Timestamp DESC, id DESC LIMIT ?1",
        )?;

        let rows = stmt
            .query_map(params![limit as i64], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    pub fn count(&self) -> Result<usize> {
        let db = self.db.lock();
        let count: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM ErrorLogs", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
