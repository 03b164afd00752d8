//! Build date of the running program.
//!
//! The stamp belongs to the host binary, not to this library: a host stamps
//! itself at build time (typically with `shadow-rs`) and hands the RFC 3339
//! text in.
//!
//! ```rust,ignore
//! // build.rs
//! fn main() -> shadow_rs::SdResult<()> {
//!     shadow_rs::new()
//! }
//!
//! // main.rs
//! shadow_rs::shadow!(build);
//!
//! let built = vmu_core::build_date(Some(build::BUILD_TIME_3339));
//! ```
//!
//! A host without a stamp simply has no known build date.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Text used in log records when no build date is known.
pub const UNKNOWN_BUILD_DATE: &str = "unknown";

/// Errors reading a build stamp.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildInfoError {
    #[error("build timestamp {0:?} is not an RFC 3339 date")]
    InvalidTimestamp(String),
}

/// Parse a build stamp. Missing or blank stamps are `Ok(None)`.
pub fn parse_build_time(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, BuildInfoError> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };

    DateTime::parse_from_rfc3339(raw)
        .map(|date| Some(date.with_timezone(&Utc)))
        .map_err(|_| BuildInfoError::InvalidTimestamp(raw.to_string()))
}

/// Build date from a host's stamp, or `None` when unknown.
///
/// Never fails: a malformed stamp is reported on stderr and treated as absent.
pub fn build_date(stamp: Option<&str>) -> Option<DateTime<Utc>> {
    match parse_build_time(stamp) {
        Ok(date) => date,
        Err(e) => {
            eprintln!("Warning: Failed to read build date: {}", e);
            None
        }
    }
}

/// Text form of a build date for log records.
pub fn describe_build_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|date| date.to_rfc3339())
        .unwrap_or_else(|| UNKNOWN_BUILD_DATE.to_string())
}
