//! Configuration for [`InputLagDiagnostics`](crate::InputLagDiagnostics).
//!
//! Measurement constants (history size, smoothing weights, sanity bounds) are fixed. Only the
//! start-up state and the CSV log location can be chosen.
//!
//! The log directory defaults to the `INPUT_LAG_LOG_DIR` environment variable, falling back
//! to `Saved/Logs`.

use std::path::PathBuf;

/// Environment variable overriding the CSV log directory.
pub const LOG_DIR_ENV: &str = "INPUT_LAG_LOG_DIR";

/// Default directory for CSV logs, relative to the working directory.
const DEFAULT_LOG_DIR: &str = "Saved/Logs";

/// Get the CSV log directory from the environment or use the default.
pub fn default_log_dir() -> PathBuf {
    std::env::var(LOG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_DIR))
}

/// Start-up settings for the diagnostics facade.
///
/// # Example
///
/// ```rust
/// use input_lag_diagnostics::DiagnosticsConfig;
///
/// let config = DiagnosticsConfig::new()
///     .with_auto_enable(false)
///     .with_log_dir("/tmp/lag");
///
/// assert!(!config.auto_enable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    /// Start with capture and overlay enabled.
    pub auto_enable: bool,
    /// Directory receiving CSV logs.
    pub log_dir: PathBuf,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            auto_enable: true,
            log_dir: default_log_dir(),
        }
    }
}

impl DiagnosticsConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether diagnostics start enabled.
    pub fn with_auto_enable(mut self, enabled: bool) -> Self {
        self.auto_enable = enabled;
        self
    }

    /// Sets the CSV log directory.
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }
}
