//! Shared primitives for the tile shimmer background.
//!
//! This crate holds the platform-agnostic pieces of the animation engine so
//! they can run on a desktop simulator as well as on a bare display driver:
//!
//! - [`colors`]: grayscale shades and the `#rrggbb` color codec
//! - [`animations`]: per-tile transition state machine
//! - [`profiling`]: rolling frame-delta window and average FPS signal
//! - [`config`]: layout and timing constants
//!
//! # no_std Compatibility
//!
//! This crate is `no_std` compatible and does not allocate. Randomness is
//! injected through the [`rand::Rng`] trait; timestamps are plain `f64`
//! milliseconds supplied by the caller.

#![no_std]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod animations;
pub mod colors;
pub mod config;
pub mod profiling;

// Re-export commonly used items
pub use animations::{Phase, Tile, pick_duration};
pub use colors::{ColorCode, ColorError, Gray};
pub use config::*;
pub use profiling::FrameRateMonitor;
