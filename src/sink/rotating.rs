//! # Size-rotated, append-only file sink.
//!
//! One [`RotatingSink`] per unit. Appends serialized [`LogRecord`]s to
//! an active file; once a write would push the active file past the
//! size threshold, the sink shifts numbered backups (`<path>.1` is the
//! newest, `<path>.<keep>` the oldest, which gets discarded) and
//! reopens a fresh active file.
//!
//! ## Invariants
//! - The active file exceeds the threshold by at most one record.
//! - At most `keep` backup generations exist at any time.
//! - A rotation boundary falls between two appends; no record is split
//!   or reordered across it.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::SinkError;

use super::LogRecord;

/// Append-only destination with size-based rollover.
///
/// Single-writer: owned exclusively by one unit's worker.
#[derive(Debug)]
pub struct RotatingSink {
    path: PathBuf,
    max_bytes: u64,
    keep: usize,
    file: File,
    written: u64,
}

impl RotatingSink {
    /// Opens (or creates) the active file in append mode, creating
    /// parent directories as needed. The running size is seeded from
    /// the existing file length so restarts keep honoring the
    /// threshold.
    pub fn create(path: impl Into<PathBuf>, max_bytes: u64, keep: usize) -> Result<Self, SinkError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| SinkError::Create {
                    path: path.clone(),
                    source,
                })?;
            }
        }
        let file = Self::open_append(&path)?;
        let written = file
            .metadata()
            .map_err(|source| SinkError::Create {
                path: path.clone(),
                source,
            })?
            .len();
        Ok(Self {
            path,
            max_bytes: max_bytes.max(1),
            keep,
            file,
            written,
        })
    }

    /// Path of the active log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record, rotating first if the write would push the
    /// active file past the threshold.
    pub fn append(&mut self, record: &LogRecord) -> Result<(), SinkError> {
        let line = record.to_line();
        if self.written > 0 && self.written + line.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        self.file
            .write_all(line.as_bytes())
            .map_err(|source| SinkError::Append {
                path: self.path.clone(),
                source,
            })?;
        self.written += line.len() as u64;
        Ok(())
    }

    /// Closes the active file and shifts backup generations.
    fn rotate(&mut self) -> Result<(), SinkError> {
        if self.keep == 0 {
            // No backups retained: truncate in place.
            self.file = OpenOptions::new()
                .write(true)
                .truncate(true)
                .open(&self.path)
                .map_err(|source| SinkError::Rotate {
                    path: self.path.clone(),
                    source,
                })?;
            self.written = 0;
            return Ok(());
        }

        // Oldest generation falls off the end.
        remove_if_exists(&self.backup_path(self.keep)).map_err(|source| SinkError::Rotate {
            path: self.path.clone(),
            source,
        })?;
        for i in (1..self.keep).rev() {
            rename_if_exists(&self.backup_path(i), &self.backup_path(i + 1)).map_err(|source| {
                SinkError::Rotate {
                    path: self.path.clone(),
                    source,
                }
            })?;
        }
        rename_if_exists(&self.path, &self.backup_path(1)).map_err(|source| SinkError::Rotate {
            path: self.path.clone(),
            source,
        })?;

        self.file = Self::open_append(&self.path)?;
        self.written = 0;
        Ok(())
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut os = self.path.clone().into_os_string();
        os.push(format!(".{index}"));
        PathBuf::from(os)
    }

    fn open_append(path: &Path) -> Result<File, SinkError> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| SinkError::Create {
                path: path.to_path_buf(),
                source,
            })
    }
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn rename_if_exists(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(msg: &str) -> LogRecord {
        LogRecord::now(msg)
    }

    fn line_len(msg: &str) -> u64 {
        record(msg).to_line().len() as u64
    }

    #[test]
    fn test_appends_accumulate_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unit.log");
        let mut sink = RotatingSink::create(&path, 1024, 3).unwrap();

        sink.append(&record("first")).unwrap();
        sink.append(&record("second")).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - first"));
        assert!(lines[1].ends_with(" - second"));
    }

    #[test]
    fn test_rotation_keeps_bounded_generations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unit.log");
        // Threshold of one record: every append after the first rotates.
        let max = line_len("msg-0");
        let mut sink = RotatingSink::create(&path, max, 2).unwrap();

        for i in 0..6 {
            sink.append(&record(&format!("msg-{i}"))).unwrap();
        }

        assert!(path.exists());
        assert!(dir.path().join("unit.log.1").exists());
        assert!(dir.path().join("unit.log.2").exists());
        assert!(!dir.path().join("unit.log.3").exists());

        // Newest backup holds the previous record, oldest the one before.
        let newest = fs::read_to_string(dir.path().join("unit.log.1")).unwrap();
        let oldest = fs::read_to_string(dir.path().join("unit.log.2")).unwrap();
        assert!(newest.contains("msg-4"));
        assert!(oldest.contains("msg-3"));
        assert!(fs::read_to_string(&path).unwrap().contains("msg-5"));
    }

    #[test]
    fn test_active_file_never_exceeds_threshold_by_more_than_one_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unit.log");
        let max = 3 * line_len("payload");
        let mut sink = RotatingSink::create(&path, max, 5).unwrap();

        for _ in 0..20 {
            sink.append(&record("payload")).unwrap();
            let len = fs::metadata(&path).unwrap().len();
            assert!(len <= max + line_len("payload"));
        }
    }

    #[test]
    fn test_zero_keep_truncates_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unit.log");
        let max = line_len("a");
        let mut sink = RotatingSink::create(&path, max, 0).unwrap();

        sink.append(&record("a")).unwrap();
        sink.append(&record("b")).unwrap();

        assert!(!dir.path().join("unit.log.1").exists());
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("b"));
        assert!(!contents.contains("a\n"));
    }

    #[test]
    fn test_reopen_seeds_size_from_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unit.log");
        let max = 2 * line_len("x");
        {
            let mut sink = RotatingSink::create(&path, max, 3).unwrap();
            sink.append(&record("x")).unwrap();
            sink.append(&record("x")).unwrap();
        }
        // A new sink over the same path must rotate on the next append.
        let mut sink = RotatingSink::create(&path, max, 3).unwrap();
        sink.append(&record("y")).unwrap();
        assert!(dir.path().join("unit.log.1").exists());
    }
}
