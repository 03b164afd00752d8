//! Tracing layer that persists error records to SQLite.
//!
//! Each event reaching this layer becomes one `ErrorLogs` row. Rows older than
//! the retention period are purged when the store opens and then whenever the
//! check interval has elapsed since the last purge.
//!
//! The level restriction is applied by the caller with a per-layer filter.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;
use vmu_storage::{Database, ErrorLogRecord, SqliteErrorLogRepository};

/// Field names stored in the `Exception` column instead of `Properties`.
const EXCEPTION_FIELDS: &[&str] = &["error", "exception"];

/// A tracing layer writing events to the `ErrorLogs` table.
pub struct ErrorStoreLayer {
    repo: SqliteErrorLogRepository,
    retention_period: Duration,
    retention_check_interval: Duration,
    last_purge: Mutex<DateTime<Utc>>,
}

impl ErrorStoreLayer {
    /// Open the store at `path` and purge expired rows.
    pub fn open(
        path: &Path,
        retention_period: Duration,
        retention_check_interval: Duration,
    ) -> anyhow::Result<Self> {
        let db = Database::open(path)?;
        Self::with_repository(
            SqliteErrorLogRepository::new(Arc::new(Mutex::new(db))),
            retention_period,
            retention_check_interval,
        )
    }

    /// Build on an existing repository and purge expired rows.
    pub fn with_repository(
        repo: SqliteErrorLogRepository,
        retention_period: Duration,
        retention_check_interval: Duration,
    ) -> anyhow::Result<Self> {
        let now = Utc::now();
        repo.delete_older_than(now - retention_period)?;

        Ok(Self {
            repo,
            retention_period,
            retention_check_interval,
            last_purge: Mutex::new(now),
        })
    }

    pub fn repository(&self) -> &SqliteErrorLogRepository {
        &self.repo
    }

    /// Purge expired rows if the check interval has elapsed at `now`.
    /// Returns the number of rows removed.
    pub fn purge_if_due(&self, now: DateTime<Utc>) -> anyhow::Result<usize> {
        let mut last_purge = self.last_purge.lock();
        if now - *last_purge < self.retention_check_interval {
            return Ok(0);
        }

        let removed = self.repo.delete_older_than(now - self.retention_period)?;
        *last_purge = now;
        Ok(removed)
    }

    fn record_from_event(event: &Event<'_>, now: DateTime<Utc>) -> ErrorLogRecord {
        let metadata = event.metadata();

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut properties = visitor.properties;
        properties.insert(
            "target".to_string(),
            Value::String(metadata.target().to_string()),
        );

        let mut record = ErrorLogRecord::new(
            metadata.level().to_string(),
            visitor.message.unwrap_or_default(),
        )
        .with_timestamp(now)
        .with_properties(Value::Object(properties));

        if let Some(exception) = visitor.exception {
            record = record.with_exception(exception);
        }

        record
    }
}

impl<S> Layer<S> for ErrorStoreLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let now = Utc::now();

        // This layer is part of the logging pipeline, so failures go to stderr
        if let Err(e) = self.purge_if_due(now) {
            eprintln!("Warning: Failed to purge expired error logs: {:#}", e);
        }

        let record = Self::record_from_event(event, now);
        if let Err(e) = self.repo.insert(&record) {
            eprintln!("Warning: Failed to store error log record: {:#}", e);
        }
    }
}

/// Visitor that splits event fields into message, exception and properties.
#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    exception: Option<String>,
    properties: Map<String, Value>,
}

impl FieldVisitor {
    fn record_value(&mut self, field: &Field, value: Value) {
        let name = field.name();

        if name == "message" {
            self.message = Some(match value {
                Value::String(text) => text,
                other => other.to_string(),
            });
        } else if EXCEPTION_FIELDS.contains(&name) && self.exception.is_none() {
            self.exception = Some(match value {
                Value::String(text) => text,
                other => other.to_string(),
            });
        } else {
            self.properties.insert(name.to_string(), value);
        }
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, Value::String(format!("{:?}", value)));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, Value::String(value.to_string()));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record_value(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.record_value(field, Value::String(value.to_string()));
    }
}
