//! Daily rolling log file.
//!
//! The active file is always `<stem>.<ext>`. On the first write of a new
//! calendar day it is renamed to `<stem>.<YYYY-MM-DD>.<ext>` (the day it
//! covered) and a fresh active file is started. Archives beyond the retained
//! count are deleted oldest first; the active file counts towards the limit.
//!
//! This writer runs on the `tracing-appender` worker thread, so it must not
//! log through `tracing` itself. Problems go to stderr.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate};

/// Source of the current local date.
pub type Clock = Box<dyn Fn() -> NaiveDate + Send + Sync>;

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Writer for one daily rolling log file.
pub struct DailyRollingFile {
    directory: PathBuf,
    file_stem: String,
    extension: String,
    retained_file_count: usize,
    current_file: File,
    opened_on: NaiveDate,
    /// The active file was archived but its replacement could not be opened.
    reopen_pending: bool,
    clock: Clock,
}

impl DailyRollingFile {
    /// Open (or continue) the active file in `directory`.
    pub fn open(
        directory: impl Into<PathBuf>,
        file_stem: impl Into<String>,
        extension: impl Into<String>,
        retained_file_count: usize,
    ) -> io::Result<Self> {
        Self::open_with_clock(
            directory,
            file_stem,
            extension,
            retained_file_count,
            Box::new(local_today),
        )
    }

    /// Like [`DailyRollingFile::open`] with a custom source for "today".
    pub fn open_with_clock(
        directory: impl Into<PathBuf>,
        file_stem: impl Into<String>,
        extension: impl Into<String>,
        retained_file_count: usize,
        clock: Clock,
    ) -> io::Result<Self> {
        let directory = directory.into();
        let file_stem = file_stem.into();
        let extension = extension.into();

        fs::create_dir_all(&directory)?;

        let active_path = directory.join(format!("{}.{}", file_stem, extension));
        let current_file = open_append(&active_path)?;

        // A file left over from an earlier day is rolled on the first write
        let today = clock();
        let opened_on = current_file
            .metadata()
            .ok()
            .filter(|metadata| metadata.len() > 0)
            .and_then(|metadata| metadata.modified().ok())
            .map(|modified| DateTime::<Local>::from(modified).date_naive())
            .filter(|day| *day < today)
            .unwrap_or(today);

        let writer = Self {
            directory,
            file_stem,
            extension,
            retained_file_count,
            current_file,
            opened_on,
            reopen_pending: false,
            clock,
        };
        writer.cleanup_old_files()?;

        Ok(writer)
    }

    /// Path of the active file.
    pub fn active_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}.{}", self.file_stem, self.extension))
    }

    fn archive_path(&self, day: NaiveDate) -> PathBuf {
        let date = day.format("%Y-%m-%d");
        let mut path = self
            .directory
            .join(format!("{}.{}.{}", self.file_stem, date, self.extension));
        let mut sequence = 1;
        while path.exists() {
            path = self.directory.join(format!(
                "{}.{}-{}.{}",
                self.file_stem, date, sequence, self.extension
            ));
            sequence += 1;
        }
        path
    }

    fn roll_if_needed(&mut self) -> io::Result<()> {
        let today = (self.clock)();
        if today != self.opened_on {
            self.rotate(today)?;
        } else if self.reopen_pending {
            self.reopen()?;
        }
        Ok(())
    }

    fn rotate(&mut self, today: NaiveDate) -> io::Result<()> {
        self.current_file.flush()?;

        // With a reopen pending there is no active file left to archive
        if !self.reopen_pending {
            let archive_path = self.archive_path(self.opened_on);
            fs::rename(self.active_path(), &archive_path)?;
        }

        // The old day is archived; only opening the new file is left to retry
        self.opened_on = today;
        self.reopen_pending = true;
        self.reopen()?;

        self.cleanup_old_files()
    }

    fn reopen(&mut self) -> io::Result<()> {
        self.current_file = open_append(&self.active_path())?;
        self.reopen_pending = false;
        Ok(())
    }

    /// Archived files of this log, oldest first.
    pub fn archived_files(&self) -> io::Result<Vec<PathBuf>> {
        let prefix = format!("{}.", self.file_stem);
        let suffix = format!(".{}", self.extension);

        let mut archives = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(middle) = name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(&suffix))
            else {
                continue;
            };
            if let Some(key) = parse_archive_key(middle) {
                archives.push((key, path));
            }
        }

        archives.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(archives.into_iter().map(|(_, path)| path).collect())
    }

    fn cleanup_old_files(&self) -> io::Result<()> {
        let archives = self.archived_files()?;
        let keep = self.retained_file_count.saturating_sub(1);

        if archives.len() > keep {
            let to_remove = archives.len() - keep;
            for path in archives.iter().take(to_remove) {
                if let Err(e) = fs::remove_file(path) {
                    eprintln!("Warning: Failed to remove old log file {:?}: {}", path, e);
                }
            }
        }

        Ok(())
    }
}

impl Write for DailyRollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Err(e) = self.roll_if_needed() {
            // Keep writing to the current file rather than losing records
            eprintln!("Warning: Failed to roll log file {:?}: {}", self.active_path(), e);
        }
        self.current_file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.current_file.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Sort key of an archive name part: `2024-05-01` or `2024-05-01-2`.
fn parse_archive_key(middle: &str) -> Option<(NaiveDate, u32)> {
    let date = NaiveDate::parse_from_str(middle.get(..10)?, "%Y-%m-%d").ok()?;
    let sequence = match &middle[10..] {
        "" => 0,
        rest => rest.strip_prefix('-')?.parse().ok()?,
    };
    Some((date, sequence))
}
