//! Operator-controlled trace file.
//!
//! At most one file is open at a time. Reopening closes the current file
//! before the new one is opened, and dropping the sink releases whatever is
//! still open.

use chrono::{Local, NaiveDateTime};
use raclient_types::{RaError, Result};
use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug)]
struct Target {
    path: PathBuf,
    file: File,
}

/// Append-only debug log owned by one client.
#[derive(Debug, Default)]
pub struct DebugSink {
    target: Option<Target>,
}

impl DebugSink {
    /// A sink with no file open; writes are ignored.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes the current file, if any, then opens `path` for appending.
    ///
    /// # Errors
    ///
    /// Returns [`RaError::ResourceUnavailable`] if `path` cannot be opened.
    /// The sink is left closed in that case.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        self.close();
        let file = open_append(path).map_err(|source| RaError::ResourceUnavailable {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "debug log opened");
        self.target = Some(Target {
            path: path.to_path_buf(),
            file,
        });
        Ok(())
    }

    /// Closes the current file and returns its path.
    pub fn close(&mut self) -> Option<PathBuf> {
        let target = self.target.take()?;
        tracing::debug!(path = %target.path.display(), "debug log closed");
        Some(target.path)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.target.as_ref().map(|t| t.path.as_path())
    }

    /// Appends `[timestamp] source - message`; does nothing when closed.
    ///
    /// # Errors
    ///
    /// Returns [`RaError::ResourceUnavailable`] if the write fails.
    pub fn write(&mut self, source: &str, message: &str) -> Result<()> {
        let Some(target) = self.target.as_mut() else {
            return Ok(());
        };
        let line = format_line(Local::now().naive_local(), source, message);
        target
            .file
            .write_all(line.as_bytes())
            .map_err(|source| RaError::ResourceUnavailable {
                path: target.path.display().to_string(),
                source,
            })
    }
}

fn format_line(at: NaiveDateTime, source: &str, message: &str) -> String {
    format!("[{}] {source} - {message}\n", at.format(TIMESTAMP_FORMAT))
}

fn open_append(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt as _;
        options.mode(0o600);
    }
    options.open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_format_line() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 1)
            .unwrap();
        assert_eq!(
            format_line(at, "op_var_set", "name value"),
            "[2024-03-09 07:05:01] op_var_set - name value\n"
        );
    }

    #[test]
    fn test_write_when_closed_is_noop() {
        let mut sink = DebugSink::new();
        sink.write("op_help", "").unwrap();
        assert!(!sink.is_open());
    }

    #[test]
    fn test_write_appends_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug.log");
        std::fs::write(&path, "existing\n").unwrap();

        let mut sink = DebugSink::new();
        sink.open(&path).unwrap();
        sink.write("op_token_status", "print_cert").unwrap();

        let content = read(&path);
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "existing");
        assert!(lines[1].starts_with('['));
        assert!(lines[1].ends_with("] op_token_status - print_cert"));
    }

    #[test]
    fn test_reopen_switches_target() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.log");
        let second = dir.path().join("second.log");

        let mut sink = DebugSink::new();
        sink.open(&first).unwrap();
        sink.write("a", "1").unwrap();
        sink.open(&second).unwrap();
        sink.write("b", "2").unwrap();

        assert_eq!(sink.path(), Some(second.as_path()));
        assert_eq!(read(&first).lines().count(), 1);
        assert!(read(&second).contains("] b - 2"));
    }

    #[test]
    fn test_failed_open_leaves_sink_closed() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.log");
        let bad = dir.path().join("missing").join("bad.log");

        let mut sink = DebugSink::new();
        sink.open(&good).unwrap();
        let err = sink.open(&bad).unwrap_err();
        assert!(matches!(err, RaError::ResourceUnavailable { .. }));
        assert!(!sink.is_open());
    }

    #[test]
    fn test_close_returns_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug.log");
        let mut sink = DebugSink::new();
        assert!(sink.close().is_none());
        sink.open(&path).unwrap();
        assert_eq!(sink.close(), Some(path));
        assert!(!sink.is_open());
    }
}
