//! Simulates a 144 Hz game loop feeding mouse input into the latency diagnostics.
//!
//! This demo shows how to:
//! - Offer raw input events from an input-dispatch hook
//! - Finalize measurements from a post-render hook
//! - Toggle CSV logging through console commands
//! - Draw the overlay onto a host surface
//!
//! Run with: cargo run --example frame_loop
//!
//! Set `RUST_LOG=debug` to see skipped frames and toggle events.

use input_lag_diagnostics::{
    clock::{FrameClock, ManualClock},
    events::{InputKind, MouseAxis, MouseButton, RawInput},
    Color, DiagnosticsConfig, InputLagDiagnostics, OverlaySurface,
};
use tracing_subscriber::EnvFilter;

/// Prints overlay text to stdout.
struct ConsoleSurface;

impl OverlaySurface for ConsoleSurface {
    fn height(&self) -> f32 {
        1080.0
    }

    fn draw_text(&mut self, x: f32, _y: f32, text: &str, _color: Color) {
        if x > 100.0 {
            println!("{}", text);
        } else {
            print!("  {:<18}", text);
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Input Lag Frame Loop Demo ===\n");

    let log_dir = std::env::temp_dir().join("input-lag-demo");
    let mut diag = InputLagDiagnostics::new(DiagnosticsConfig::new().with_log_dir(&log_dir));
    let mut clock = ManualClock::at(0.0, 1);
    let mut surface = ConsoleSurface;

    diag.handle_command("loginputlag")?;

    let frame_time = 1.0 / 144.0;
    for frame in 0..600u64 {
        // Input arrives somewhere inside the frame.
        clock.advance(frame_time * 0.3);
        if frame % 3 == 0 {
            diag.on_input(&RawInput::axis(MouseAxis::X, 2.0), &clock);
        }
        if frame % 40 == 0 {
            diag.on_input(&RawInput::button(MouseButton::Left, InputKind::Pressed), &clock);
        }

        // Occasional hitch in the render thread.
        let hitch = if frame % 97 == 0 { 0.025 } else { 0.0 };
        clock.advance_frame(frame_time * 0.7 + hitch);

        // Post-render; print the overlay every 150 frames.
        if frame % 150 == 149 {
            println!("\n--- frame {} ---", clock.frame_index());
            diag.on_frame_rendered(&clock, Some(&mut surface));
        } else {
            diag.finalize_frame(&clock);
        }
    }

    diag.handle_command("loginputlag")?;

    println!("\n{}", diag.summary().summary());
    Ok(())
}
