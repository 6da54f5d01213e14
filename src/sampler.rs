//! Input-to-display latency sampling across a frame boundary.
//!
//! [`LatencySampler`] is a two-state machine. An accepted input moves it from
//! **Idle** to **Pending**, capturing the time and frame index. Once per rendered frame the
//! host calls [`LatencySampler::finalize`]; the first call made in a *later* frame closes the
//! measurement and returns to **Idle**.
//!
//! Only the first tracked input of a burst is measured. Anything arriving while a measurement
//! is pending is dropped, which yields at most one sample per frame-to-frame cycle.
//!
//! # Where to call `finalize`
//!
//! Call it from the latest hook before the frame is presented, after all draw submission.
//! Calling it from the game-logic tick instead measures input-to-processing latency, not
//! input-to-display latency.
//!
//! # Example
//!
//! ```rust
//! use input_lag_diagnostics::{
//!     events::{InputKind, MouseButton, RawInput, TrackedInput},
//!     sampler::LatencySampler,
//! };
//!
//! let mut sampler = LatencySampler::new();
//! sampler.set_enabled(true);
//!
//! let click = RawInput::button(MouseButton::Left, InputKind::Pressed);
//! assert!(sampler.record_candidate(&click, 1.000, 10));
//!
//! // Same frame: nothing yet.
//! assert!(sampler.finalize(1.004, 10).is_none());
//!
//! // Next frame: 12ms measured.
//! let sample = sampler.finalize(1.012, 11).unwrap();
//! assert!((sample.latency_ms - 12.0).abs() < 1e-6);
//! assert_eq!(sample.input, TrackedInput::LeftMouseButton);
//! ```

use crate::events::{RawInput, TrackedInput};

/// Upper bound of the sanity gate, exclusive, in milliseconds.
pub const MAX_LATENCY_MS: f64 = 1000.0;

/// Whether a measured value passes the `(0, 1000)` ms sanity gate.
pub fn is_plausible_latency(latency_ms: f64) -> bool {
    latency_ms > 0.0 && latency_ms < MAX_LATENCY_MS
}

/// An input that has been captured but not yet matched to a displayed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingMeasurement {
    /// Monotonic time at capture, in seconds.
    pub captured_at_seconds: f64,
    /// Frame index at capture.
    pub captured_at_frame: u64,
    /// Input that started the measurement.
    pub input: TrackedInput,
}

/// A completed input-to-display measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalizedSample {
    /// Measured latency in milliseconds, always inside the sanity gate.
    pub latency_ms: f64,
    /// Input that produced the sample.
    pub input: TrackedInput,
    /// Frame index at which the measurement was closed.
    pub frame_index: u64,
}

/// Pairs one input event with the first frame rendered after it.
#[derive(Debug, Clone, Default)]
pub struct LatencySampler {
    enabled: bool,
    pending: Option<PendingMeasurement>,
}

impl LatencySampler {
    /// Creates a disabled, idle sampler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables capture. Disabling does not drop a pending measurement.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether capture is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a measurement is waiting for its frame.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The measurement in flight, if any.
    pub fn pending(&self) -> Option<&PendingMeasurement> {
        self.pending.as_ref()
    }

    /// Offers a raw input event as the start of a measurement.
    ///
    /// Accepted only when capture is enabled, nothing is pending, and the event is on the
    /// tracked-input allow-list. Returns `true` if the sampler moved to Pending.
    pub fn record_candidate(&mut self, event: &RawInput, now_seconds: f64, frame_index: u64) -> bool {
        if !self.enabled || self.pending.is_some() {
            return false;
        }

        let Some(input) = event.tracked() else {
            return false;
        };

        self.pending = Some(PendingMeasurement {
            captured_at_seconds: now_seconds,
            captured_at_frame: frame_index,
            input,
        });
        true
    }

    /// Closes the pending measurement if the frame has advanced.
    ///
    /// Returns `None` when idle, or when `frame_index` is not strictly after the capture frame
    /// (the measurement stays pending). Otherwise the sampler returns to Idle and the sample is
    /// returned only if it passes the sanity gate; implausible values are discarded.
    pub fn finalize(&mut self, now_seconds: f64, frame_index: u64) -> Option<FinalizedSample> {
        let pending = self.pending?;
        if frame_index <= pending.captured_at_frame {
            return None;
        }

        self.pending = None;

        let latency_ms = (now_seconds - pending.captured_at_seconds) * 1000.0;
        if !is_plausible_latency(latency_ms) {
            tracing::trace!(latency_ms, input = %pending.input, "discarding implausible latency");
            return None;
        }

        Some(FinalizedSample { latency_ms, input: pending.input, frame_index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{InputKind, MouseAxis, MouseButton};

    fn enabled_sampler() -> LatencySampler {
        let mut sampler = LatencySampler::new();
        sampler.set_enabled(true);
        sampler
    }

    fn left_click() -> RawInput {
        RawInput::button(MouseButton::Left, InputKind::Pressed)
    }

    #[test]
    fn test_disabled_sampler_ignores_input() {
        let mut sampler = LatencySampler::new();
        assert!(!sampler.record_candidate(&left_click(), 1.0, 1));
        assert!(!sampler.is_pending());
    }

    #[test]
    fn test_untracked_input_is_ignored() {
        let mut sampler = enabled_sampler();
        let release = RawInput::button(MouseButton::Left, InputKind::Released);
        assert!(!sampler.record_candidate(&release, 1.0, 1));
        assert!(!sampler.record_candidate(&RawInput::axis(MouseAxis::Y, 0.0), 1.0, 1));
        assert!(!sampler.is_pending());
    }

    #[test]
    fn test_only_first_candidate_is_kept_while_pending() {
        let mut sampler = enabled_sampler();
        assert!(sampler.record_candidate(&left_click(), 1.0, 5));

        let right = RawInput::button(MouseButton::Right, InputKind::Pressed);
        assert!(!sampler.record_candidate(&right, 1.001, 5));
        assert!(!sampler.record_candidate(&RawInput::axis(MouseAxis::X, 4.0), 1.002, 6));

        let pending = sampler.pending().unwrap();
        assert_eq!(pending.input, TrackedInput::LeftMouseButton);
        assert_eq!(pending.captured_at_frame, 5);
        assert_eq!(pending.captured_at_seconds, 1.0);
    }

    #[test]
    fn test_finalize_when_idle_returns_nothing() {
        let mut sampler = enabled_sampler();
        assert!(sampler.finalize(2.0, 100).is_none());
    }

    #[test]
    fn test_finalize_in_same_frame_stays_pending() {
        let mut sampler = enabled_sampler();
        sampler.record_candidate(&left_click(), 1.0, 7);

        assert!(sampler.finalize(1.010, 7).is_none());
        assert!(sampler.is_pending());

        // An earlier frame index is treated the same way.
        assert!(sampler.finalize(1.010, 6).is_none());
        assert!(sampler.is_pending());
    }

    #[test]
    fn test_finalize_in_later_frame_produces_sample() {
        let mut sampler = enabled_sampler();
        sampler.record_candidate(&RawInput::axis(MouseAxis::X, 2.0), 3.0, 7);

        let sample = sampler.finalize(3.015, 8).unwrap();
        assert!((sample.latency_ms - 15.0).abs() < 1e-9);
        assert_eq!(sample.input, TrackedInput::MouseX);
        assert_eq!(sample.frame_index, 8);
        assert!(!sampler.is_pending());
    }

    #[test]
    fn test_implausible_latency_is_dropped_but_resets() {
        let mut sampler = enabled_sampler();
        sampler.record_candidate(&left_click(), 1.0, 1);
        assert!(sampler.finalize(2.5, 2).is_none());
        assert!(!sampler.is_pending());

        // Clock going backwards.
        sampler.record_candidate(&left_click(), 5.0, 3);
        assert!(sampler.finalize(4.9, 4).is_none());
        assert!(!sampler.is_pending());

        // Zero elapsed time.
        sampler.record_candidate(&left_click(), 6.0, 5);
        assert!(sampler.finalize(6.0, 6).is_none());
        assert!(!sampler.is_pending());
    }

    #[test]
    fn test_new_candidate_accepted_after_finalize() {
        let mut sampler = enabled_sampler();
        sampler.record_candidate(&left_click(), 1.0, 1);
        sampler.finalize(1.02, 2);

        let right = RawInput::button(MouseButton::Right, InputKind::Repeat);
        assert!(sampler.record_candidate(&right, 1.03, 2));
        assert_eq!(sampler.pending().unwrap().input, TrackedInput::RightMouseButton);
    }

    #[test]
    fn test_disabling_keeps_pending_measurement() {
        let mut sampler = enabled_sampler();
        sampler.record_candidate(&left_click(), 1.0, 1);
        sampler.set_enabled(false);

        assert!(sampler.finalize(1.02, 2).is_some());
    }

    #[test]
    fn test_sanity_gate_bounds() {
        assert!(!is_plausible_latency(0.0));
        assert!(!is_plausible_latency(-3.0));
        assert!(is_plausible_latency(0.001));
        assert!(is_plausible_latency(999.9));
        assert!(!is_plausible_latency(1000.0));
        assert!(!is_plausible_latency(1500.0));
    }
}
