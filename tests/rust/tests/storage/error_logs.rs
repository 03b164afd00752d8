//! Error log repository tests

use chrono::{Duration, Utc};
use serde_json::json;
use tests::db::TestDatabase;
use vmu_storage::ErrorLogRecord;

#[test]
fn test_records_survive_reopen() {
    let test_db = TestDatabase::new();

    test_db
        .repository()
        .insert(
            &ErrorLogRecord::new("ERROR", "accelerometer saturated")
                .with_properties(json!({"channel": 3})),
        )
        .unwrap();

    let rows = test_db.repository().list_recent(5).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].rendered_message, "accelerometer saturated");
    assert_eq!(rows[0].properties, json!({"channel": 3}));
    assert_eq!(rows[0].exception, None);
}

#[test]
fn test_sixty_day_retention() {
    let test_db = TestDatabase::new();
    let repo = test_db.repository();
    let now = Utc::now();

    for age in [0, 30, 59, 60, 61, 365] {
        repo.insert(
            &ErrorLogRecord::new("ERROR", format!("age {age}"))
                .with_timestamp(now - Duration::days(age)),
        )
        .unwrap();
    }

    // Exactly 60 days old is not older than the cutoff
    let removed = repo.delete_older_than(now - Duration::days(60)).unwrap();
    assert_eq!(removed, 2);
    assert_eq!(repo.count().unwrap(), 4);
}
