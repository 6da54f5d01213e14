//! CSV persistence of finalized latency samples.
//!
//! A log lives from an explicit [`CsvLogSink::open`] to [`CsvLogSink::close`]. Opening creates
//! `InputLagLog_<YYYYmmdd_HHMMSS>.csv` in the log directory and writes the header
//!
//! ```text
//! Timestamp,FrameNumber,InputLag_ms,InputKey
//! ```
//!
//! followed by one row per sample, in the order samples were finalized:
//!
//! ```text
//! 2024-03-01 18:22:05.117,48211,14.262,MouseX
//! ```
//!
//! Rows go through a buffered writer and are not flushed individually; the buffer is flushed
//! once on close (or on drop, where a flush error cannot be reported).

use std::{
    fs::{self, File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};

use crate::{
    error::{DiagnosticsError, Result},
    events::TrackedInput,
};

/// Header row written at the top of every log.
pub const CSV_HEADER: &str = "Timestamp,FrameNumber,InputLag_ms,InputKey";

/// Prefix of generated log file names.
const FILE_PREFIX: &str = "InputLagLog_";

/// Returns the file name used for a log opened at `at`.
pub fn log_file_name(at: NaiveDateTime) -> String {
    format!("{}{}.csv", FILE_PREFIX, at.format("%Y%m%d_%H%M%S"))
}

/// An open CSV latency log.
#[derive(Debug)]
pub struct CsvLogSink {
    writer: Option<BufWriter<File>>,
    path: PathBuf,
    rows: usize,
}

impl CsvLogSink {
    /// Creates a new timestamped log in `dir` and writes the header.
    ///
    /// The directory is created if missing.
    ///
    /// # Errors
    ///
    /// Returns [`DiagnosticsError::LogSinkOpen`] if the directory or file cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let path = dir.join(log_file_name(Local::now().naive_local()));

        fs::create_dir_all(dir).map_err(|source| DiagnosticsError::LogSinkOpen {
            path: path.clone(),
            source,
        })?;

        Self::create(path)
    }

    /// Creates a log at exactly `path`, truncating any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`DiagnosticsError::LogSinkOpen`] if the file cannot be created or the header
    /// cannot be written.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let open_err =
            |source: std::io::Error| DiagnosticsError::LogSinkOpen { path: path.clone(), source };

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(open_err)?;

        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", CSV_HEADER).map_err(open_err)?;

        tracing::info!(path = %path.display(), "opened input lag CSV log");

        Ok(Self { writer: Some(writer), path, rows: 0 })
    }

    /// Appends one sample row.
    ///
    /// # Errors
    ///
    /// Returns [`DiagnosticsError::LogSinkClosed`] after [`close`](Self::close), or
    /// [`DiagnosticsError::Io`] if the write fails.
    pub fn write_entry(
        &mut self,
        timestamp: NaiveDateTime,
        frame_index: u64,
        latency_ms: f64,
        input: TrackedInput,
    ) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(DiagnosticsError::LogSinkClosed)?;

        writeln!(
            writer,
            "{},{},{:.3},{}",
            timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            frame_index,
            latency_ms,
            input
        )?;
        self.rows += 1;

        Ok(())
    }

    /// Flushes and releases the file. Returns the number of rows written.
    ///
    /// Closing twice is harmless; the second call only returns the row count.
    ///
    /// # Errors
    ///
    /// Returns [`DiagnosticsError::Io`] if the final flush fails. The handle is released
    /// either way.
    pub fn close(&mut self) -> Result<usize> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            tracing::info!(path = %self.path.display(), rows = self.rows, "closed input lag CSV log");
        }
        Ok(self.rows)
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows written so far, header excluded.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Whether the log still accepts rows.
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }
}
