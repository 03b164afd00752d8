//! Well-known file locations.
//!
//! - Program directory: where the running executable lives (rolling log files)
//! - App data directory: machine-local data (persistent error database)
//!   - Windows: %LOCALAPPDATA%/<identifier>/
//!   - macOS: ~/Library/Application Support/<identifier>/
//!   - Linux: ~/.local/share/<identifier>/

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::branding;

/// Environment variable that overrides the app data directory.
pub const DATA_DIR_ENV: &str = "VMU_DATA_DIR";

/// Directory containing the running executable, or `.` if unknown.
pub fn program_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// App data directory, honoring `VMU_DATA_DIR`.
pub fn app_data_dir() -> PathBuf {
    app_data_dir_from(std::env::var_os(DATA_DIR_ENV))
}

/// App data directory for an explicit override value.
pub fn app_data_dir_from(override_dir: Option<OsString>) -> PathBuf {
    match override_dir.filter(|dir| !dir.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(branding::IDENTIFIER),
    }
}

/// Path of the persistent error log database.
pub fn error_db_path() -> PathBuf {
    app_data_dir().join(branding::ERROR_DB_FILE)
}
