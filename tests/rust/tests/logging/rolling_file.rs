//! Rolling file tests

use std::io::Write;

use vmu_logging::DailyRollingFile;

#[test]
fn test_reopen_appends_to_active_file() {
    let temp_dir = tempfile::tempdir().unwrap();

    {
        let mut writer = DailyRollingFile::open(temp_dir.path(), "1_Log-append", "json", 30).unwrap();
        writer.write_all(b"{\"n\":1}\n").unwrap();
    }
    {
        let mut writer = DailyRollingFile::open(temp_dir.path(), "1_Log-append", "json", 30).unwrap();
        writer.write_all(b"{\"n\":2}\n").unwrap();
    }

    let content = std::fs::read_to_string(temp_dir.path().join("1_Log-append.json")).unwrap();
    assert_eq!(content, "{\"n\":1}\n{\"n\":2}\n");
}

#[test]
fn test_open_prunes_excess_archives() {
    let temp_dir = tempfile::tempdir().unwrap();
    for day in 1..=9 {
        let name = format!("app.2024-01-0{day}.json");
        std::fs::write(temp_dir.path().join(name), "").unwrap();
    }

    let writer = DailyRollingFile::open(temp_dir.path(), "app", "json", 5).unwrap();

    let names: Vec<String> = writer
        .archived_files()
        .unwrap()
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "app.2024-01-06.json",
            "app.2024-01-07.json",
            "app.2024-01-08.json",
            "app.2024-01-09.json",
        ]
    );
}
