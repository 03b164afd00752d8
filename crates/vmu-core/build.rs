//! Build script that generates branding constants from branding.toml.

use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=../../branding.toml");

    generate_branding();
}

fn generate_branding() {
    // Find branding.toml relative to this crate (2 levels up to workspace root)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir).parent().unwrap().parent().unwrap();
    let branding_path = workspace_root.join("branding.toml");

    let content = fs::read_to_string(&branding_path).unwrap_or_default();

    let identifier = extract_toml_string(&content, "identifier").unwrap_or("VibrationMonitor");
    let log_prefix = extract_toml_string(&content, "log_prefix").unwrap_or("1_Log");
    let error_db_file = extract_toml_string(&content, "error_db_file")
        .unwrap_or("VibrationMonitorErrorLog.db");

    let out_dir = env::var("OUT_DIR").unwrap();
    let rust_path = Path::new(&out_dir).join("branding_generated.rs");

    let rust_code = format!(
        r#"// Auto-generated branding constants from branding.toml
// DO NOT EDIT - regenerate with `cargo build`

/// Directory name used under the platform data directory
pub const IDENTIFIER: &str = {identifier:?};

/// Prefix of rolling log file names (`<prefix>-<fragment>.json`)
pub const LOG_PREFIX: &str = {log_prefix:?};

/// File name of the persistent error log database
pub const ERROR_DB_FILE: &str = {error_db_file:?};
"#
    );

    fs::write(&rust_path, rust_code).expect("Failed to write branding_generated.rs");
}

/// Extract a string value from TOML content (simple parser, no dependencies)
fn extract_toml_string<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        let Some((name, value)) = line.split_once('=') else {
            continue;
        };
        if name.trim() != key {
            continue;
        }
        let value = value.trim();
        if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
            return Some(&value[1..value.len() - 1]);
        }
    }
    None
}
