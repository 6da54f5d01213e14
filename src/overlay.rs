//! Text overlay model for the live latency readout.
//!
//! This module decides *what* the overlay says and where each line goes. Drawing is delegated
//! to the host through [`OverlaySurface`], so any text renderer can display it.
//!
//! Layout (surface coordinates, origin top-left):
//!
//! ```text
//! x=20                x=200
//! Input Lag Diagnostics                 <- y = height / 2 - 80
//! Smoothed:           14.21 ms          <- colored by LagTone
//! Raw:                13.80 ms          <- colored by LagTone
//! Average:            14.02 ms
//! Min / Max:           8.23 / 25.67 ms
//! 95th Percentile:    22.45 ms
//! Tracking:           MouseX
//! CSV Logging:        ON (120 samples)  <- only while logging
//! ```

use crate::{events::TrackedInput, stats::LatencySummary};

/// Left margin of the overlay.
const ORIGIN_X: f32 = 20.0;
/// Distance of the first line above the vertical center.
const ORIGIN_Y_ABOVE_CENTER: f32 = 80.0;
/// Offset of the value column from the label column.
const VALUE_COLUMN_OFFSET: f32 = 180.0;
/// Vertical distance between lines.
const LINE_HEIGHT: f32 = 22.0;

/// Overlay title.
pub const TITLE: &str = "Input Lag Diagnostics";

/// RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Opaque color from components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// White.
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    /// Green.
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    /// Yellow.
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    /// Orange.
    pub const ORANGE: Color = Color::rgb(1.0, 0.5, 0.0);
    /// Red.
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
}

/// Quality grade of a latency value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LagTone {
    /// Below 10 ms.
    Excellent,
    /// 10 to 20 ms.
    Good,
    /// 20 to 33 ms.
    Fair,
    /// 33 ms and above.
    Poor,
}

impl LagTone {
    /// Grades a latency in milliseconds.
    pub fn for_latency(latency_ms: f64) -> Self {
        if latency_ms < 10.0 {
            LagTone::Excellent
        } else if latency_ms < 20.0 {
            LagTone::Good
        } else if latency_ms < 33.0 {
            LagTone::Fair
        } else {
            LagTone::Poor
        }
    }

    /// Display color for this grade.
    pub fn color(self) -> Color {
        match self {
            LagTone::Excellent => Color::GREEN,
            LagTone::Good => Color::YELLOW,
            LagTone::Fair => Color::ORANGE,
            LagTone::Poor => Color::RED,
        }
    }
}

/// Host drawing surface.
pub trait OverlaySurface {
    /// Height of the drawable area.
    fn height(&self) -> f32;

    /// Draws one run of text with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: Color);
}

/// One labeled overlay row.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLine {
    /// Label in the left column.
    pub label: &'static str,
    /// Value in the right column.
    pub value: String,
    /// Color of the value.
    pub color: Color,
}

/// Everything the overlay shows for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayReport {
    /// Statistics at the time of the frame.
    pub summary: LatencySummary,
    /// Input behind the most recent sample.
    pub last_input: Option<TrackedInput>,
    /// Rows written to the CSV log, if logging.
    pub csv_rows: Option<usize>,
}

impl OverlayReport {
    /// Builds the labeled rows, title excluded.
    pub fn lines(&self) -> Vec<OverlayLine> {
        let s = &self.summary;
        let mut lines = vec![
            OverlayLine {
                label: "Smoothed:",
                value: format!("{:5.2} ms", s.smoothed_ms),
                color: LagTone::for_latency(s.smoothed_ms).color(),
            },
            OverlayLine {
                label: "Raw:",
                value: format!("{:5.2} ms", s.raw_ms),
                color: LagTone::for_latency(s.raw_ms).color(),
            },
            OverlayLine {
                label: "Average:",
                value: format!("{:5.2} ms", s.average_ms),
                color: Color::WHITE,
            },
            OverlayLine {
                label: "Min / Max:",
                value: format!("{:5.2} / {:5.2} ms", s.min_ms, s.max_ms),
                color: Color::rgb(0.7, 0.7, 0.7),
            },
            OverlayLine {
                label: "95th Percentile:",
                value: format!("{:5.2} ms", s.p95_ms),
                color: Color::rgb(0.8, 0.8, 1.0),
            },
            OverlayLine {
                label: "Tracking:",
                value: self.last_input.map_or("None", TrackedInput::as_str).to_string(),
                color: Color::rgb(0.5, 0.5, 0.5),
            },
        ];

        if let Some(rows) = self.csv_rows {
            lines.push(OverlayLine {
                label: "CSV Logging:",
                value: format!("ON ({} samples)", rows),
                color: Color::GREEN,
            });
        }

        lines
    }

    /// Draws the title and rows onto `surface`.
    pub fn draw(&self, surface: &mut dyn OverlaySurface) {
        let x = ORIGIN_X;
        let mut y = surface.height() / 2.0 - ORIGIN_Y_ABOVE_CENTER;

        surface.draw_text(x, y, TITLE, Color::YELLOW);
        y += LINE_HEIGHT;

        for line in self.lines() {
            surface.draw_text(x, y, line.label, Color::WHITE);
            surface.draw_text(x + VALUE_COLUMN_OFFSET, y, &line.value, line.color);
            y += LINE_HEIGHT;
        }
    }
}
