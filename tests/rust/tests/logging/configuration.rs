//! Logger composition tests

use tests::capture::SharedBuffer;
use tests::json_log::{read_records, with_message};
use vmu_logging::{LoggerConfiguration, LoggingError, SinkConfig};
use vmu_storage::{Database, SqliteErrorLogRepository};

#[test]
fn test_console_then_file_composition_succeeds() {
    let temp_dir = tempfile::tempdir().unwrap();

    let logger = LoggerConfiguration::new()
        .with_console()
        .with_json_file_in(temp_dir.path(), "compose")
        .with_error_store_at(temp_dir.path().join("errors.db"))
        .create_logger()
        .expect("logger should build in a writable directory");

    assert_eq!(logger.log_files(), [temp_dir.path().join("1_Log-compose.json")]);
    assert!(logger.log_files()[0].exists());
}

#[test]
fn test_each_sink_gets_its_own_levels() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("errors.db");
    let console = SharedBuffer::new();

    let logger = LoggerConfiguration::new()
        .with_console_writer(console.make_writer())
        .with_json_file_in(temp_dir.path(), "levels")
        .with_error_store_at(&db_path)
        .create_logger()
        .unwrap();
    let log_file = logger.log_files()[0].clone();

    logger.in_scope(|| {
        tracing::trace!("trace record");
        tracing::debug!("debug record");
        tracing::info!(machine = "fan-3", "info record");
        tracing::error!(error = "timeout", "error record");
    });

    // Dropping the logger flushes the background file writer
    drop(logger);

    let console = console.contents();
    assert!(!console.contains("trace record"));
    assert!(console.contains("debug record"));
    assert!(console.contains("error record"));

    let records = read_records(&log_file);
    for message in ["trace record", "debug record", "info record", "error record"] {
        assert_eq!(with_message(&records, message).len(), 1, "{message} missing from file");
    }
    let info = with_message(&records, "info record")[0];
    assert_eq!(info["level"], "INFO");
    assert_eq!(info["machine"], "fan-3");

    let db = Database::open(&db_path).unwrap();
    let repo = SqliteErrorLogRepository::new(std::sync::Arc::new(parking_lot::Mutex::new(db)));
    let rows = repo.list_recent(10).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].rendered_message, "error record");
    assert_eq!(rows[0].exception.as_deref(), Some("timeout"));
}

#[test]
fn test_unwritable_directory_propagates() {
    let temp_dir = tempfile::tempdir().unwrap();
    let blocker = temp_dir.path().join("not-a-directory");
    std::fs::write(&blocker, "file in the way").unwrap();

    let result = LoggerConfiguration::new()
        .with_json_file_in(&blocker, "blocked")
        .create_logger();

    assert!(matches!(result, Err(LoggingError::RollingFile { .. })));
}

#[test]
fn test_unopenable_error_store_propagates() {
    let temp_dir = tempfile::tempdir().unwrap();
    let blocker = temp_dir.path().join("not-a-directory");
    std::fs::write(&blocker, "file in the way").unwrap();

    let result = LoggerConfiguration::new()
        .with_error_store_at(blocker.join("errors.db"))
        .create_logger();

    assert!(matches!(result, Err(LoggingError::Storage(_))));
}

#[test]
fn test_sink_defaults() {
    let config = LoggerConfiguration::new()
        .with_console()
        .with_rolling_file("defaults");

    assert_eq!(config.sinks().len(), 3);
    assert!(matches!(config.sinks()[0], SinkConfig::Console { .. }));
    assert!(matches!(config.sinks()[1], SinkConfig::RollingFile { .. }));
    assert!(matches!(config.sinks()[2], SinkConfig::ErrorStore { .. }));
}
