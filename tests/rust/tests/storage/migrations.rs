//! Migration tests

use tests::db::TestDatabase;
use vmu_storage::{Database, ERROR_LOG_TABLE};

#[test]
fn test_migrations_run_successfully() {
    // Database::open runs migrations automatically
    let test_db = TestDatabase::new();
    assert!(test_db.db_path().exists());
}

#[test]
fn test_migrations_are_idempotent() {
    let test_db = TestDatabase::new();

    let db = Database::open(test_db.db_path()).expect("reopen should succeed");
    assert_eq!(db.schema_version().unwrap(), 1);
}

#[test]
fn test_error_logs_table_exists() {
    let db = Database::open_in_memory().expect("Failed to open in-memory database");

    let exists: bool = db
        .connection()
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
            [ERROR_LOG_TABLE],
            |row| row.get(0),
        )
        .unwrap();
    assert!(exists);
}
