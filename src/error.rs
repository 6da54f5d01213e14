//! Error types for input_lag_diagnostics.
//!
//! The measurement core (sampler and statistics) never fails: clock anomalies are silently
//! discarded. Errors only arise at the edges, when the CSV log sink touches the filesystem or
//! when a host forwards a console command this crate does not understand.
//!
//! # Examples
//!
//! ```rust
//! use input_lag_diagnostics::{DiagnosticsError, Result};
//!
//! fn may_fail() -> Result<()> {
//!     Err(DiagnosticsError::UnknownCommand("showfps".to_string()))
//! }
//!
//! match may_fail() {
//!     Ok(_) => println!("Success"),
//!     Err(DiagnosticsError::UnknownCommand(cmd)) => {
//!         eprintln!("Not ours: {}", cmd);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::{io, path::PathBuf};

use thiserror::Error;

/// Result type alias for input_lag_diagnostics operations.
///
/// This is a convenience alias for `std::result::Result<T, DiagnosticsError>`.
pub type Result<T> = std::result::Result<T, DiagnosticsError>;

/// Errors that can occur while logging or controlling diagnostics.
///
/// # Variants
///
/// - [`DiagnosticsError::Io`]: I/O failure while writing to an open log
/// - [`DiagnosticsError::LogSinkOpen`]: The CSV log file could not be created
/// - [`DiagnosticsError::LogSinkClosed`]: A write was attempted after the log was closed
/// - [`DiagnosticsError::UnknownCommand`]: A console command this crate does not handle
#[derive(Debug, Error)]
pub enum DiagnosticsError {
    /// Standard I/O error.
    ///
    /// Raised when appending a row to, or flushing, an already open CSV log fails.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The CSV log file could not be created.
    ///
    /// Logging stays disabled when this happens; everything else keeps running.
    #[error("Failed to create CSV log at {}: {source}", .path.display())]
    LogSinkOpen {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },

    /// The CSV log has already been closed.
    #[error("CSV log is closed")]
    LogSinkClosed,

    /// Console command not recognized.
    ///
    /// Hosts should pass the command on to the next handler.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}
