// Crate-level lints: Allow common graphics patterns that pedantic lints flag
#![allow(clippy::cast_possible_truncation)] // Intentional f64->f32 casts for frame deltas
#![allow(clippy::cast_precision_loss)] // u128->f64 for elapsed milliseconds

//! Tile shimmer simulator.
//!
//! Opens a desktop window and drives an [`AnimationScheduler`] against a
//! simulated display, the same way a browser would drive it from its
//! animation-frame callback.
//!
//! ```text
//! shimmer [BACKGROUND] [SEED]
//!
//!   BACKGROUND  CSS background color, e.g. "rgb(42, 42, 42)" or "#202020"
//!   SEED        u64 seed for a reproducible animation
//! ```
//!
//! Logging goes through `tracing`; set `RUST_LOG=tile_shimmer=debug` to see
//! individual tile completions and replacements.
//!
//! # Controls
//!
//! - **Escape** or closing the window: quit

use std::thread;
use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use tile_shimmer::background::default_color;
use tile_shimmer::config::{FRAME_TIME, SCREEN_HEIGHT, SCREEN_WIDTH, WINDOW_SCALE};
use tile_shimmer::{AnimationScheduler, ShimmerConfig, ShimmerError};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Background used when none is given on the command line.
const DEFAULT_BACKGROUND: &str = "rgb(42, 42, 42)";

fn main() -> Result<(), ShimmerError> {
    // A second subscriber (e.g. under a test harness) is not an error
    let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).try_init();

    let mut args = std::env::args().skip(1);
    let background = args.next().unwrap_or_else(|| DEFAULT_BACKGROUND.to_string());
    let seed = args.next().and_then(|raw| match raw.parse::<u64>() {
        Ok(seed) => Some(seed),
        Err(err) => {
            warn!(seed = %raw, %err, "Ignoring unparsable seed");
            None
        }
    });

    let base = default_color(&background);
    let mut config = ShimmerConfig::for_viewport(SCREEN_WIDTH, SCREEN_HEIGHT).with_base_brightness(base.brightness());
    config.rng_seed = seed;
    let mut scheduler = AnimationScheduler::new(config)?;

    // Initialize display and window (simulator mode)
    let mut display: SimulatorDisplay<Rgb888> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Shimmer", &output_settings);

    // The page background shows through every tile that has never animated
    display.clear(Rgb888::from(base)).ok();
    window.update(&display);

    info!(background = %background, base = %base, seed = ?seed, "Starting shimmer simulator");

    let start = Instant::now();
    scheduler.populate(0.0)?;

    // ==========================================================================
    // Main Render Loop
    // ==========================================================================

    loop {
        let frame_start = Instant::now();

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return shutdown(&mut scheduler),
                SimulatorEvent::KeyDown {
                    keycode: Keycode::Escape,
                    ..
                } => return shutdown(&mut scheduler),
                _ => {}
            }
        }

        let now = start.elapsed().as_micros() as f64 / 1000.0;
        if let Err(err) = scheduler.frame(now, &mut display) {
            error!(%err, "Animation stopped");
            return Err(err);
        }

        window.update(&display);

        // Frame timing: sleep off whatever is left of the frame budget
        let elapsed = frame_start.elapsed();
        if let Some(remaining) = FRAME_TIME.checked_sub(elapsed) {
            thread::sleep(remaining);
        }
    }
}

fn shutdown(scheduler: &mut AnimationScheduler) -> Result<(), ShimmerError> {
    scheduler.stop();
    info!(
        active = scheduler.active().len(),
        average_fps = ?scheduler.monitor().average_fps(),
        "Shimmer simulator closed",
    );
    Ok(())
}
