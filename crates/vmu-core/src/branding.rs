//! Centralized branding constants
//!
//! Generated from branding.toml at build time.
//!
//! ```rust
//! use vmu_core::branding;
//!
//! assert_eq!(branding::log_file_stem("pump"), format!("{}-pump", branding::LOG_PREFIX));
//! ```

include!(concat!(env!("OUT_DIR"), "/branding_generated.rs"));

/// Stem of the rolling log file for a program (e.g. `1_Log-collector`).
pub fn log_file_stem(name_fragment: &str) -> String {
    format!("{}-{}", LOG_PREFIX, name_fragment)
}
