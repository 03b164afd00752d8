//! Build date reader tests

use chrono::{Datelike, Utc};
use vmu_core::build_info::{parse_build_time, UNKNOWN_BUILD_DATE};
use vmu_core::{build_date, describe_build_date};

#[test]
fn test_missing_metadata_is_no_value() {
    // A host without a build stamp has no known build date, and that is not an error
    assert_eq!(parse_build_time(None), Ok(None));
    assert_eq!(describe_build_date(build_date(None)), UNKNOWN_BUILD_DATE);
}

#[test]
fn test_malformed_stamp_is_an_error_not_a_panic() {
    assert!(parse_build_time(Some("2024-01-01")).is_err());
    assert_eq!(build_date(Some("2024-01-01")), None);
}

#[test]
fn test_host_stamp_is_readable() {
    // This crate stamps itself the way a host program does
    let built = build_date(Some(tests::build::BUILD_TIME_3339))
        .expect("the host's own build stamp should parse");
    assert!(built <= Utc::now());
    assert!(built.year() >= 2024);
}
