//! Object dump tests

use pretty_assertions::assert_eq;
use serde::Serialize;
use vmu_core::{dump_with, safe_dump, DumpOptions, DumpStyle};

#[derive(Serialize)]
struct Machine {
    name: String,
    running: bool,
    bearings: Vec<Bearing>,
}

#[derive(Serialize)]
struct Bearing {
    position: String,
    sensor: Sensor,
}

#[derive(Serialize)]
struct Sensor {
    serial: String,
}

fn machine() -> Machine {
    Machine {
        name: "fan-3".to_string(),
        running: true,
        bearings: vec![Bearing {
            position: "inboard".to_string(),
            sensor: Sensor {
                serial: "S-100".to_string(),
            },
        }],
    }
}

#[test]
fn test_absent_value_is_null() {
    let missing: Option<&Machine> = None;
    assert_eq!(safe_dump(missing), "null");
}

#[test]
fn test_nested_value_is_cut_at_two_levels() {
    let expected = [
        "name: \"fan-3\"",
        "running: true",
        "bearings:",
        "  - {...} (2 fields)",
    ]
    .join("\n");

    assert_eq!(safe_dump(Some(&machine())), expected);
}

#[test]
fn test_custom_depth_and_style() {
    let options = DumpOptions::default()
        .with_max_depth(3)
        .with_style(DumpStyle::Compact);

    assert_eq!(
        dump_with(&machine(), &options),
        r#"{"name":"fan-3","running":true,"bearings":[{"position":"inboard","sensor":"{...} (1 field)"}]}"#
    );
}
