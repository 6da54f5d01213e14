//! Rolling latency statistics over the most recent samples.
//!
//! [`LatencyAggregator`] keeps a fixed 200-slot circular history plus two running values:
//! the raw latency of the last sample and an exponential moving average.
//!
//! Slots start at zero and are never cleared, so a zero slot means "unused". Zero can never be
//! a stored sample because the sampler's sanity gate rejects it. Every statistic skips zero
//! slots.
//!
//! # Example
//!
//! ```rust
//! use input_lag_diagnostics::stats::LatencyAggregator;
//!
//! let mut stats = LatencyAggregator::new();
//! stats.record_sample(10.0);
//! stats.record_sample(20.0);
//!
//! assert_eq!(stats.average(), 15.0);
//! assert_eq!(stats.min(), 10.0);
//! assert_eq!(stats.max(), 20.0);
//! assert!((stats.smoothed() - 11.0).abs() < 1e-9);
//! println!("{}", stats.snapshot().summary());
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of samples kept in the history.
pub const HISTORY_CAPACITY: usize = 200;

/// Weight kept from the previous smoothed value.
pub const SMOOTHING_RETAIN: f64 = 0.9;

/// Weight given to each new sample.
pub const SMOOTHING_NEW: f64 = 0.1;

/// Fixed-capacity latency history with smoothed and raw running values.
#[derive(Debug, Clone)]
pub struct LatencyAggregator {
    history: [f64; HISTORY_CAPACITY],
    cursor: usize,
    smoothed: f64,
    raw: f64,
}

impl LatencyAggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self {
            history: [0.0; HISTORY_CAPACITY],
            cursor: 0,
            smoothed: 0.0,
            raw: 0.0,
        }
    }

    /// Records one finalized sample, in milliseconds.
    ///
    /// The first sample seeds the moving average directly; after that it follows
    /// `0.9 * smoothed + 0.1 * sample`. The oldest slot is overwritten once the history is full.
    pub fn record_sample(&mut self, latency_ms: f64) {
        self.raw = latency_ms;

        if self.smoothed == 0.0 {
            self.smoothed = latency_ms;
        } else {
            self.smoothed = SMOOTHING_RETAIN * self.smoothed + SMOOTHING_NEW * latency_ms;
        }

        self.history[self.cursor] = latency_ms;
        self.cursor = (self.cursor + 1) % HISTORY_CAPACITY;
    }

    /// Exponential moving average of all samples, `0` before the first.
    pub fn smoothed(&self) -> f64 {
        self.smoothed
    }

    /// Latency of the most recent sample, `0` before the first.
    pub fn raw(&self) -> f64 {
        self.raw
    }

    /// Number of occupied history slots.
    pub fn count(&self) -> usize {
        self.valid().count()
    }

    /// Mean of the occupied slots, `0` when empty.
    pub fn average(&self) -> f64 {
        let (sum, count) = self.valid().fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
        if count > 0 {
            sum / count as f64
        } else {
            0.0
        }
    }

    /// Smallest occupied slot, `0` when empty.
    pub fn min(&self) -> f64 {
        self.valid().reduce(f64::min).unwrap_or(0.0)
    }

    /// Largest occupied slot, `0` when empty.
    pub fn max(&self) -> f64 {
        self.valid().fold(0.0, f64::max)
    }

    /// 95th percentile of the occupied slots, nearest-rank, `0` when empty.
    ///
    /// The rank is `ceil(n * 0.95)`, i.e. index `ceil(n * 0.95) - 1` into the sorted samples,
    /// clamped to the valid range.
    pub fn percentile_95(&self) -> f64 {
        let mut samples: Vec<f64> = self.valid().collect();
        if samples.is_empty() {
            return 0.0;
        }

        samples.sort_by(f64::total_cmp);

        let n = samples.len();
        let rank = (n * 95).div_ceil(100);
        let index = rank.saturating_sub(1).min(n - 1);
        samples[index]
    }

    /// Value in the slot written last. `0` before the first sample.
    pub fn last_sample(&self) -> f64 {
        self.history[(self.cursor + HISTORY_CAPACITY - 1) % HISTORY_CAPACITY]
    }

    /// Captures all statistics at once.
    pub fn snapshot(&self) -> LatencySummary {
        LatencySummary {
            count: self.count(),
            smoothed_ms: self.smoothed,
            raw_ms: self.raw,
            average_ms: self.average(),
            min_ms: self.min(),
            max_ms: self.max(),
            p95_ms: self.percentile_95(),
            last_ms: self.last_sample(),
        }
    }

    fn valid(&self) -> impl Iterator<Item = f64> + '_ {
        self.history.iter().copied().filter(|&v| v > 0.0)
    }
}

impl Default for LatencyAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the aggregator's statistics, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LatencySummary {
    /// Occupied history slots.
    pub count: usize,
    /// Exponential moving average.
    pub smoothed_ms: f64,
    /// Most recent sample.
    pub raw_ms: f64,
    /// Mean over the history.
    pub average_ms: f64,
    /// Minimum over the history.
    pub min_ms: f64,
    /// Maximum over the history.
    pub max_ms: f64,
    /// 95th percentile over the history.
    pub p95_ms: f64,
    /// Slot written last.
    pub last_ms: f64,
}

impl LatencySummary {
    /// Returns a formatted summary string.
    ///
    /// # Example Output
    ///
    /// ```text
    /// Input Lag (200 samples):
    /// Smoothed: 14.21ms
    /// Raw: 13.80ms
    /// Average: 14.02ms
    /// Min: 8.23ms
    /// Max: 25.67ms
    /// p95: 22.45ms
    /// ```
    pub fn summary(&self) -> String {
        format!(
            "Input Lag ({} samples):\n\
             Smoothed: {:.2}ms\n\
             Raw: {:.2}ms\n\
             Average: {:.2}ms\n\
             Min: {:.2}ms\n\
             Max: {:.2}ms\n\
             p95: {:.2}ms",
            self.count,
            self.smoothed_ms,
            self.raw_ms,
            self.average_ms,
            self.min_ms,
            self.max_ms,
            self.p95_ms
        )
    }
}
