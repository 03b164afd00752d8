//! # VMU Core Library
//!
//! Small helpers shared by Vibration Monitor tools.
//!
//! ## Modules
//!
//! - `branding` - Product naming constants (generated from branding.toml)
//! - `build_info` - Build date stamped into the host binary
//! - `dump` - Depth-limited value dumps for log messages
//! - `location` - Program and data directories
//! - `token` - Random alphanumeric correlation tokens

pub mod branding;
pub mod build_info;
pub mod dump;
pub mod location;
pub mod token;

// Re-export commonly used items
pub use build_info::{build_date, describe_build_date, parse_build_time, BuildInfoError};
pub use dump::{dump_with, safe_dump, DumpOptions, DumpStyle};
pub use token::{random_string, random_string_with, TokenGenerator};
