//! Shared test utilities and fixtures for VMU integration tests.

// Build metadata of this crate, the way a host program stamps itself
shadow_rs::shadow!(build);

/// Database fixtures
pub mod db {
    use parking_lot::Mutex;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tempfile::TempDir;
    use vmu_storage::{Database, SqliteErrorLogRepository};

    /// Test database file name
    pub const DB_FILE: &str = "errors-test.db";

    /// A database in a temporary directory, removed on drop.
    pub struct TestDatabase {
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestDatabase {
        /// Create a new test database in a temporary directory
        pub fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let db_path = temp_dir.path().join(DB_FILE);
            Database::open(&db_path).expect("Failed to open test database");
            Self {
                _temp_dir: temp_dir,
                db_path,
            }
        }

        /// Get the database file path
        pub fn db_path(&self) -> &Path {
            &self.db_path
        }

        /// Open a fresh repository on the test database
        pub fn repository(&self) -> SqliteErrorLogRepository {
            let db = Database::open(&self.db_path).expect("Failed to reopen test database");
            SqliteErrorLogRepository::new(Arc::new(Mutex::new(db)))
        }
    }

    impl Default for TestDatabase {
        fn default() -> Self {
            Self::new()
        }
    }
}

/// Capturing writers for console output
pub mod capture {
    use parking_lot::Mutex;
    use std::io::Write;
    use std::sync::Arc;
    use tracing_subscriber::fmt::writer::BoxMakeWriter;

    /// In-memory buffer that can stand in for a console stream.
    #[derive(Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn new() -> Self {
            Self::default()
        }

        /// A make-writer handing out clones of this buffer
        pub fn make_writer(&self) -> BoxMakeWriter {
            let buffer = self.clone();
            BoxMakeWriter::new(move || buffer.clone())
        }

        /// Everything written so far
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).to_string()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}

/// Helpers for reading rolling JSON log files
pub mod json_log {
    use std::path::Path;

    /// Parse every line of a JSON log file.
    pub fn read_records(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .expect("Failed to read log file")
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).expect("log line is not JSON"))
            .collect()
    }

    /// Records whose message contains `needle`.
    pub fn with_message<'a>(
        records: &'a [serde_json::Value],
        needle: &str,
    ) -> Vec<&'a serde_json::Value> {
        records
            .iter()
            .filter(|record| {
                record["message"]
                    .as_str()
                    .is_some_and(|message| message.contains(needle))
            })
            .collect()
    }
}
