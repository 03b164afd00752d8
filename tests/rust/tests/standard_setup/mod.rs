//! Standard process-wide setup.
//!
//! The process-wide logger can be installed only once, so this binary holds a
//! single test that walks through the whole startup sequence.

use tests::build;
use tests::json_log::{read_records, with_message};
use vmu_core::{build_date, describe_build_date};
use vmu_logging::{setup_standard_logging_in, LoggingError};
use vmu_storage::{Database, SqliteErrorLogRepository};

#[test]
fn test_standard_setup_in_temp_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    let log_file = temp_dir.path().join("1_Log-test.json");

    let guard = setup_standard_logging_in(temp_dir.path(), "test", Some(build::BUILD_TIME_3339))
        .expect("standard setup should succeed in a writable directory");
    assert!(log_file.exists(), "rolling log file should be created at setup");

    tracing::error!(error = "disk full", "capture aborted");

    // A second installation is refused instead of replacing the first
    let second = setup_standard_logging_in(temp_dir.path(), "again", None);
    assert!(matches!(second, Err(LoggingError::AlreadyInstalled)));

    // Flush the background writer
    drop(guard);

    // The record carries the host's build date, not the library's
    let expected = describe_build_date(build_date(Some(build::BUILD_TIME_3339)));
    assert_ne!(expected, "unknown");
    let records = read_records(&log_file);
    let startup = with_message(&records, "Build date:");
    assert_eq!(startup.len(), 1);
    assert_eq!(startup[0]["level"], "INFO");
    assert_eq!(startup[0]["build_date"], expected.as_str());

    let db = Database::open(&temp_dir.path().join(vmu_core::branding::ERROR_DB_FILE)).unwrap();
    let repo = SqliteErrorLogRepository::new(std::sync::Arc::new(parking_lot::Mutex::new(db)));
    let rows = repo.list_recent(10).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].rendered_message, "capture aborted");
    assert_eq!(rows[0].exception.as_deref(), Some("disk full"));
}
