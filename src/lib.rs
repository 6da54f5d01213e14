//! # input_lag_diagnostics
//!
//! Frame-accurate measurement of mouse input-to-display latency for game clients.
//!
//! ## Overview
//!
//! The host engine feeds two kinds of calls into this crate:
//!
//! - **Input dispatch** offers each raw mouse event. The first tracked event (left/right button
//!   press, mouse movement) starts a measurement; later events are ignored until it completes.
//! - **Post-render** closes the measurement once per frame, but only in a frame *after* the one
//!   the input arrived in. The elapsed time is therefore input-to-pixels, not
//!   input-to-game-logic.
//!
//! Completed samples feed a 200-sample rolling history (average, min, max, 95th percentile),
//! a smoothed running value, and optionally a CSV log.
//!
//! ## Quick Start
//!
//! ```rust
//! use input_lag_diagnostics::{
//!     clock::ManualClock,
//!     events::{InputKind, MouseButton, RawInput},
//!     DiagnosticsConfig, InputLagDiagnostics,
//! };
//!
//! let mut diag = InputLagDiagnostics::new(DiagnosticsConfig::new());
//! let mut clock = ManualClock::at(0.0, 1);
//!
//! // Input dispatch
//! diag.on_input(&RawInput::button(MouseButton::Left, InputKind::Pressed), &clock);
//!
//! // Same frame: not measured yet
//! assert!(diag.finalize_frame(&clock).is_none());
//!
//! // Next presented frame
//! clock.advance_frame(0.016);
//! let sample = diag.finalize_frame(&clock).unwrap();
//! assert!((sample.latency_ms - 16.0).abs() < 1e-6);
//!
//! println!("{}", diag.summary().summary());
//! ```
//!
//! ## Host integration
//!
//! The crate does not know about any engine. Hosts implement:
//!
//! - [`clock::FrameClock`]: monotonic seconds and a frame counter
//! - [`events::InputSource`]: optional per-tick input snapshot for polling hosts
//! - [`overlay::OverlaySurface`]: text drawing for the overlay
//! - [`Notifier`]: user-visible status messages
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`stats::LatencySummary`] and
//!   [`events::TrackedInput`]
//!
//! ## Architecture
//!
//! 1. **Events** (`events`): raw host input and the tracked-input allow-list
//! 2. **Sampler** (`sampler`): the Idle/Pending measurement state machine
//! 3. **Statistics** (`stats`): rolling history and smoothing
//! 4. **CSV log** (`csv_log`): timestamped sample log
//! 5. **Overlay** (`overlay`): readout layout and color grading
//! 6. **Facade** (`diagnostics`): toggles, commands, and the per-frame entry points

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod clock;
mod config;
pub mod csv_log;
mod diagnostics;
mod error;
pub mod events;
pub mod overlay;
pub mod sampler;
pub mod stats;

// Public API exports
pub use clock::{FrameClock, InstantClock, ManualClock};
pub use config::{default_log_dir, DiagnosticsConfig, LOG_DIR_ENV};
pub use csv_log::{CsvLogSink, CSV_HEADER};
pub use diagnostics::{Command, InputLagDiagnostics, Notifier, TracingNotifier};
pub use error::{DiagnosticsError, Result};
pub use events::{InputKind, InputSource, InputState, MouseAxis, MouseButton, RawInput, TrackedInput};
pub use overlay::{Color, LagTone, OverlayLine, OverlayReport, OverlaySurface};
pub use sampler::{FinalizedSample, LatencySampler, PendingMeasurement, MAX_LATENCY_MS};
pub use stats::{LatencyAggregator, LatencySummary, HISTORY_CAPACITY};
