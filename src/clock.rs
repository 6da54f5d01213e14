//! Monotonic time and frame counting supplied by the host render loop.
//!
//! Latency is measured in seconds from a monotonic clock, and a frame counter that advances
//! once per rendered frame decides when a pending measurement may be closed. Both come from
//! the host through [`FrameClock`].
//!
//! # Example
//!
//! ```rust
//! use input_lag_diagnostics::clock::{FrameClock, ManualClock};
//!
//! let mut clock = ManualClock::new();
//! clock.advance_frame(0.016);
//!
//! assert_eq!(clock.frame_index(), 1);
//! assert!((clock.now_seconds() - 0.016).abs() < 1e-12);
//! ```

use std::time::Instant;

/// Clock and frame counter provided by the host.
pub trait FrameClock {
    /// Current monotonic time in seconds.
    fn now_seconds(&self) -> f64;

    /// Index of the frame currently being built. Increments once per rendered frame.
    fn frame_index(&self) -> u64;
}

/// A clock driven entirely by the caller.
///
/// Used by tests and simulations where time has to be exact.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualClock {
    now: f64,
    frame: u64,
}

impl ManualClock {
    /// Creates a clock at time zero, frame zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock at the given time and frame.
    pub fn at(now_seconds: f64, frame_index: u64) -> Self {
        Self { now: now_seconds, frame: frame_index }
    }

    /// Moves time forward without starting a new frame.
    pub fn advance(&mut self, seconds: f64) {
        self.now += seconds;
    }

    /// Moves time forward and starts the next frame.
    pub fn advance_frame(&mut self, seconds: f64) {
        self.now += seconds;
        self.frame += 1;
    }

    /// Sets the time directly.
    pub fn set_now(&mut self, now_seconds: f64) {
        self.now = now_seconds;
    }
}

impl FrameClock for ManualClock {
    fn now_seconds(&self) -> f64 {
        self.now
    }

    fn frame_index(&self) -> u64 {
        self.frame
    }
}

/// Wall-clock implementation backed by [`Instant`].
///
/// Time is measured from construction; the host calls [`InstantClock::next_frame`] once per
/// presented frame.
#[derive(Debug, Clone)]
pub struct InstantClock {
    origin: Instant,
    frame: u64,
}

impl InstantClock {
    /// Creates a clock starting now at frame zero.
    pub fn new() -> Self {
        Self { origin: Instant::now(), frame: 0 }
    }

    /// Advances the frame counter.
    pub fn next_frame(&mut self) {
        self.frame += 1;
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for InstantClock {
    fn now_seconds(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    fn frame_index(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use std::{thread, time::Duration};

    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let mut clock = ManualClock::new();
        clock.advance(0.5);
        assert_eq!(clock.frame_index(), 0);
        assert_eq!(clock.now_seconds(), 0.5);

        clock.advance_frame(0.25);
        assert_eq!(clock.frame_index(), 1);
        assert_eq!(clock.now_seconds(), 0.75);
    }

    #[test]
    fn test_manual_clock_at() {
        let mut clock = ManualClock::at(10.0, 42);
        assert_eq!(clock.frame_index(), 42);

        clock.set_now(11.0);
        assert_eq!(clock.now_seconds(), 11.0);
    }

    #[test]
    fn test_instant_clock_is_monotonic() {
        let mut clock = InstantClock::new();
        let t0 = clock.now_seconds();
        thread::sleep(Duration::from_millis(2));
        clock.next_frame();

        assert!(clock.now_seconds() > t0);
        assert_eq!(clock.frame_index(), 1);
    }
}
