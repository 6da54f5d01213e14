//! The diagnostics facade wired into a host's input and render loops.
//!
//! [`InputLagDiagnostics`] owns the on/off flag, the [`LatencySampler`], the
//! [`LatencyAggregator`] and, while logging, a [`CsvLogSink`]. The host calls it from three
//! places:
//!
//! 1. Input dispatch: [`on_input`](InputLagDiagnostics::on_input) for every raw event, or
//!    [`poll_input`](InputLagDiagnostics::poll_input) once per tick.
//! 2. Post-render: [`on_frame_rendered`](InputLagDiagnostics::on_frame_rendered) once per
//!    frame, after all draw submission.
//! 3. Console: [`handle_command`](InputLagDiagnostics::handle_command) for `showinputlag`
//!    and `loginputlag`.
//!
//! # Example
//!
//! ```rust
//! use input_lag_diagnostics::{
//!     clock::ManualClock,
//!     events::{MouseAxis, RawInput},
//!     DiagnosticsConfig, InputLagDiagnostics,
//! };
//!
//! let mut diag = InputLagDiagnostics::new(DiagnosticsConfig::new());
//! let mut clock = ManualClock::at(100.0, 1);
//!
//! diag.on_input(&RawInput::axis(MouseAxis::X, 3.0), &clock);
//! clock.advance_frame(0.014);
//!
//! let sample = diag.finalize_frame(&clock).unwrap();
//! assert!((sample.latency_ms - 14.0).abs() < 1e-6);
//! assert_eq!(diag.stats().count(), 1);
//! ```

use std::{fmt, path::Path, str::FromStr};

use chrono::Local;

use crate::{
    clock::FrameClock,
    config::DiagnosticsConfig,
    csv_log::CsvLogSink,
    error::{DiagnosticsError, Result},
    events::{InputSource, RawInput, TrackedInput},
    overlay::{OverlayReport, OverlaySurface},
    sampler::{FinalizedSample, LatencySampler},
    stats::{LatencyAggregator, LatencySummary},
};

/// Receives user-visible status messages.
///
/// Hosts typically route these to the in-game chat or console.
pub trait Notifier {
    /// Shows `message` to the user.
    fn notify(&mut self, message: &str);
}

/// Forwards notifications to `tracing` at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, message: &str) {
        tracing::info!(target: "input_lag_diagnostics::notify", "{}", message);
    }
}

impl Notifier for Vec<String> {
    fn notify(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn notify(&mut self, message: &str) {
        (**self).notify(message);
    }
}

/// Console commands understood by the diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `showinputlag`: toggle capture and overlay.
    ShowInputLag,
    /// `loginputlag`: toggle CSV logging.
    LogInputLag,
}

impl Command {
    /// Console spelling of the command.
    pub fn as_str(self) -> &'static str {
        match self {
            Command::ShowInputLag => "showinputlag",
            Command::LogInputLag => "loginputlag",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = DiagnosticsError;

    /// Parses a command, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        [Command::ShowInputLag, Command::LogInputLag]
            .into_iter()
            .find(|cmd| cmd.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DiagnosticsError::UnknownCommand(s.to_string()))
    }
}

/// Input-to-display latency diagnostics for one local player.
#[derive(Debug)]
pub struct InputLagDiagnostics<N = TracingNotifier> {
    config: DiagnosticsConfig,
    enabled: bool,
    sampler: LatencySampler,
    stats: LatencyAggregator,
    csv: Option<CsvLogSink>,
    last_input: Option<TrackedInput>,
    notifier: N,
}

impl InputLagDiagnostics {
    /// Creates diagnostics that report status messages through `tracing`.
    pub fn new(config: DiagnosticsConfig) -> Self {
        Self::with_notifier(config, TracingNotifier)
    }
}

impl<N: Notifier> InputLagDiagnostics<N> {
    /// Creates diagnostics that report status messages to `notifier`.
    pub fn with_notifier(config: DiagnosticsConfig, notifier: N) -> Self {
        let mut sampler = LatencySampler::new();
        sampler.set_enabled(config.auto_enable);

        Self {
            enabled: config.auto_enable,
            config,
            sampler,
            stats: LatencyAggregator::new(),
            csv: None,
            last_input: None,
            notifier,
        }
    }

    /// Whether capture and overlay are on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether samples are being written to CSV.
    pub fn is_logging(&self) -> bool {
        self.csv.is_some()
    }

    /// Flips capture and overlay. Returns the new state.
    pub fn toggle_diagnostics(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.sampler.set_enabled(self.enabled);

        tracing::info!(enabled = self.enabled, "input lag diagnostics toggled");
        self.notifier.notify(if self.enabled {
            "Input Lag Diagnostics: ON"
        } else {
            "Input Lag Diagnostics: OFF"
        });

        self.enabled
    }

    /// Starts or stops CSV logging. Returns whether logging is now on.
    ///
    /// If the log file cannot be created, logging stays off and the user is told so.
    pub fn toggle_csv_logging(&mut self) -> bool {
        match self.csv.take() {
            Some(mut sink) => {
                let rows = match sink.close() {
                    Ok(rows) => rows,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to flush CSV log");
                        sink.rows()
                    }
                };
                self.notifier.notify(&format!(
                    "CSV logging stopped. {} samples written to: {}",
                    rows,
                    sink.path().display()
                ));
                false
            }
            None => match CsvLogSink::open(&self.config.log_dir) {
                Ok(sink) => {
                    self.notifier.notify(&format!(
                        "CSV logging started: {}",
                        sink.path().display()
                    ));
                    self.csv = Some(sink);
                    true
                }
                Err(e) => {
                    tracing::warn!(error = %e, "CSV logging disabled");
                    self.notifier.notify("Failed to create CSV file!");
                    false
                }
            },
        }
    }

    /// Runs a console command.
    ///
    /// # Errors
    ///
    /// Returns [`DiagnosticsError::UnknownCommand`] for anything else, so the host can pass
    /// the command on.
    pub fn handle_command(&mut self, text: &str) -> Result<Command> {
        let command: Command = text.parse()?;
        match command {
            Command::ShowInputLag => {
                self.toggle_diagnostics();
            }
            Command::LogInputLag => {
                self.toggle_csv_logging();
            }
        }
        Ok(command)
    }

    /// Offers a raw input event to the sampler. Returns `true` if it started a measurement.
    pub fn on_input(&mut self, event: &RawInput, clock: &dyn FrameClock) -> bool {
        self.sampler
            .record_candidate(event, clock.now_seconds(), clock.frame_index())
    }

    /// Polls the input owner and offers its highest-priority event.
    ///
    /// Skips silently when disabled, when a measurement is already pending, or when the host
    /// has no input owner this frame.
    pub fn poll_input(&mut self, source: &mut dyn InputSource, clock: &dyn FrameClock) -> bool {
        if !self.enabled || self.sampler.is_pending() {
            return false;
        }

        let Some(state) = source.poll() else {
            tracing::debug!("no input owner; skipping input poll");
            return false;
        };

        match state.first_candidate() {
            Some(event) => self.on_input(&event, clock),
            None => false,
        }
    }

    /// Closes a pending measurement if the frame has advanced, and records the sample.
    ///
    /// Accepted samples update the statistics and, while logging, append a CSV row.
    pub fn finalize_frame(&mut self, clock: &dyn FrameClock) -> Option<FinalizedSample> {
        let sample = self
            .sampler
            .finalize(clock.now_seconds(), clock.frame_index())?;
        self.record(&sample);
        Some(sample)
    }

    /// Post-render hook: finalizes the frame's measurement and draws the overlay.
    ///
    /// Without a surface the whole frame is skipped, measurement included. The overlay is
    /// drawn only while diagnostics are enabled; finalization happens either way.
    pub fn on_frame_rendered(
        &mut self,
        clock: &dyn FrameClock,
        surface: Option<&mut dyn OverlaySurface>,
    ) -> Option<FinalizedSample> {
        let Some(surface) = surface else {
            tracing::debug!("no overlay surface; skipping frame");
            return None;
        };

        let sample = self.finalize_frame(clock);

        if self.enabled {
            self.report().draw(surface);
        }

        sample
    }

    /// The statistics engine.
    pub fn stats(&self) -> &LatencyAggregator {
        &self.stats
    }

    /// The sampler.
    pub fn sampler(&self) -> &LatencySampler {
        &self.sampler
    }

    /// Input behind the most recent accepted sample.
    pub fn last_input(&self) -> Option<TrackedInput> {
        self.last_input
    }

    /// Path of the active CSV log.
    pub fn csv_path(&self) -> Option<&Path> {
        self.csv.as_ref().map(CsvLogSink::path)
    }

    /// Rows written to the active CSV log.
    pub fn csv_rows(&self) -> Option<usize> {
        self.csv.as_ref().map(CsvLogSink::rows)
    }

    /// Current statistics.
    pub fn summary(&self) -> LatencySummary {
        self.stats.snapshot()
    }

    /// Everything the overlay would show right now.
    pub fn report(&self) -> OverlayReport {
        OverlayReport {
            summary: self.summary(),
            last_input: self.last_input,
            csv_rows: self.csv_rows(),
        }
    }

    /// The notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    fn record(&mut self, sample: &FinalizedSample) {
        self.stats.record_sample(sample.latency_ms);
        self.last_input = Some(sample.input);

        let Some(sink) = self.csv.as_mut() else {
            return;
        };

        let written = sink.write_entry(
            Local::now().naive_local(),
            sample.frame_index,
            sample.latency_ms,
            sample.input,
        );

        if let Err(e) = written {
            tracing::warn!(error = %e, "CSV write failed; logging stopped");
            if let Some(mut sink) = self.csv.take() {
                let _ = sink.close();
            }
            self.notifier.notify("CSV logging stopped: write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::ManualClock,
        events::{InputKind, InputState, MouseAxis, MouseButton},
        overlay::Color,
    };

    fn diagnostics(dir: &Path) -> InputLagDiagnostics<Vec<String>> {
        InputLagDiagnostics::with_notifier(
            DiagnosticsConfig::new().with_log_dir(dir),
            Vec::new(),
        )
    }

    struct CountingSurface(usize);

    impl OverlaySurface for CountingSurface {
        fn height(&self) -> f32 {
            600.0
        }

        fn draw_text(&mut self, _x: f32, _y: f32, _text: &str, _color: Color) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!("showinputlag".parse::<Command>().unwrap(), Command::ShowInputLag);
        assert_eq!("  LogInputLag ".parse::<Command>().unwrap(), Command::LogInputLag);
        assert!(matches!(
            "showfps".parse::<Command>(),
            Err(DiagnosticsError::UnknownCommand(cmd)) if cmd == "showfps"
        ));
    }

    #[test]
    fn test_auto_enable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(diagnostics(dir.path()).is_enabled());

        let diag = InputLagDiagnostics::with_notifier(
            DiagnosticsConfig::new().with_auto_enable(false).with_log_dir(dir.path()),
            Vec::<String>::new(),
        );
        assert!(!diag.is_enabled());
        assert!(!diag.sampler().is_enabled());
    }

    #[test]
    fn test_toggle_diagnostics_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let mut diag = diagnostics(dir.path());

        assert!(!diag.toggle_diagnostics());
        assert!(!diag.sampler().is_enabled());
        assert!(diag.toggle_diagnostics());

        assert_eq!(
            diag.notifier(),
            &vec![
                "Input Lag Diagnostics: OFF".to_string(),
                "Input Lag Diagnostics: ON".to_string()
            ]
        );
    }

    #[test]
    fn test_disabled_ignores_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut diag = diagnostics(dir.path());
        diag.toggle_diagnostics();

        let clock = ManualClock::at(1.0, 1);
        assert!(!diag.on_input(&RawInput::axis(MouseAxis::X, 1.0), &clock));
    }

    #[test]
    fn test_finalize_records_sample_and_last_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut diag = diagnostics(dir.path());
        let mut clock = ManualClock::at(10.0, 3);

        diag.on_input(&RawInput::button(MouseButton::Right, InputKind::Pressed), &clock);
        assert!(diag.finalize_frame(&clock).is_none());

        clock.advance_frame(0.020);
        let sample = diag.finalize_frame(&clock).unwrap();

        assert_eq!(sample.frame_index, 4);
        assert_eq!(diag.last_input(), Some(TrackedInput::RightMouseButton));
        assert!((diag.stats().raw() - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejected_sample_leaves_stats_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut diag = diagnostics(dir.path());
        let mut clock = ManualClock::at(1.0, 1);

        diag.on_input(&RawInput::axis(MouseAxis::Y, 2.0), &clock);
        clock.advance_frame(1.5);

        assert!(diag.finalize_frame(&clock).is_none());
        assert!(!diag.sampler().is_pending());
        assert_eq!(diag.stats().raw(), 0.0);
        assert_eq!(diag.stats().smoothed(), 0.0);
        assert_eq!(diag.last_input(), None);
    }

    #[test]
    fn test_poll_input_uses_first_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let mut diag = diagnostics(dir.path());
        let clock = ManualClock::at(1.0, 1);

        let mut no_owner: Option<InputState> = None;
        assert!(!diag.poll_input(&mut no_owner, &clock));

        let mut source = Some(InputState { mouse_x: 0.0, mouse_y: 4.0, ..Default::default() });
        assert!(diag.poll_input(&mut source, &clock));
        assert_eq!(diag.sampler().pending().unwrap().input, TrackedInput::MouseY);

        // Already pending.
        let mut source = Some(InputState { left_just_pressed: true, ..Default::default() });
        assert!(!diag.poll_input(&mut source, &clock));
    }

    #[test]
    fn test_missing_surface_skips_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut diag = diagnostics(dir.path());
        let mut clock = ManualClock::at(1.0, 1);

        diag.on_input(&RawInput::axis(MouseAxis::X, 1.0), &clock);
        clock.advance_frame(0.010);

        assert!(diag.on_frame_rendered(&clock, None).is_none());
        assert!(diag.sampler().is_pending());

        let mut surface = CountingSurface(0);
        assert!(diag.on_frame_rendered(&clock, Some(&mut surface)).is_some());
        assert!(surface.0 > 0);
    }

    #[test]
    fn test_overlay_not_drawn_when_disabled_but_finalize_runs() {
        let dir = tempfile::tempdir().unwrap();
        let mut diag = diagnostics(dir.path());
        let mut clock = ManualClock::at(1.0, 1);

        diag.on_input(&RawInput::axis(MouseAxis::X, 1.0), &clock);
        diag.toggle_diagnostics();
        clock.advance_frame(0.010);

        let mut surface = CountingSurface(0);
        assert!(diag.on_frame_rendered(&clock, Some(&mut surface)).is_some());
        assert_eq!(surface.0, 0);
    }

    #[test]
    fn test_csv_toggle_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut diag = diagnostics(dir.path());

        assert!(diag.toggle_csv_logging());
        let path = diag.csv_path().unwrap().to_path_buf();
        assert_eq!(diag.csv_rows(), Some(0));

        assert!(!diag.toggle_csv_logging());
        assert!(diag.csv_path().is_none());
        assert!(path.exists());

        let messages = diag.notifier();
        assert!(messages[0].starts_with("CSV logging started: "));
        assert!(messages[1].starts_with("CSV logging stopped. 0 samples written to: "));
    }

    #[test]
    fn test_csv_open_failure_keeps_logging_off() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("Logs");
        std::fs::write(&blocker, b"file").unwrap();

        let mut diag = diagnostics(&blocker);
        assert!(!diag.toggle_csv_logging());
        assert!(!diag.is_logging());
        assert_eq!(diag.notifier(), &vec!["Failed to create CSV file!".to_string()]);
    }

    #[test]
    fn test_handle_command_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut diag = diagnostics(dir.path());

        assert_eq!(diag.handle_command("SHOWINPUTLAG").unwrap(), Command::ShowInputLag);
        assert!(!diag.is_enabled());

        assert_eq!(diag.handle_command("loginputlag").unwrap(), Command::LogInputLag);
        assert!(diag.is_logging());

        assert!(diag.handle_command("suicide").is_err());
    }
}
