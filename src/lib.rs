// Crate-level lints: pixel and timing math casts between f32/f64 and integers
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

//! Animated tile shimmer background.
//!
//! The viewport is divided into a grid of rectangular tiles. About a quarter of
//! them are always fading from one shade of gray to another, a few percent
//! darker or brighter than the page background. When a tile finishes its
//! transition it stays at its final shade and a random idle tile picks up the
//! animation shortly after.
//!
//! # Modules
//!
//! - [`background`]: derive the base brightness from a CSS background color
//! - [`config`]: runtime configuration and validation
//! - [`grid`]: viewport grid and index math
//! - [`scheduler`]: per-frame driver (replacements, painting, FPS signal)
//! - [`shedding`]: optional load-shedding policies for slow frame rates
//! - [`surface`]: headless draw target for tests and offline runs
//!
//! The color codec, tile state machine and FPS monitor live in the `no_std`
//! [`shimmer_common`] crate and are re-exported here.
//!
//! # Drawing
//!
//! The scheduler paints through any `embedded-graphics` [`DrawTarget`]
//! whose color type converts from [`Rgb888`]. Each tile is a single
//! `fill_solid` call per frame.
//!
//! [`DrawTarget`]: embedded_graphics::draw_target::DrawTarget
//! [`Rgb888`]: embedded_graphics::pixelcolor::Rgb888

pub mod background;
pub mod config;
pub mod error;
pub mod grid;
pub mod scheduler;
pub mod shedding;
pub mod surface;

pub use config::{ConfigError, ShimmerConfig};
pub use error::ShimmerError;
pub use grid::TileGrid;
pub use scheduler::{AnimationScheduler, FrameStats, TileState};
pub use shedding::{HalveActive, KeepAll, LoadShedding};
pub use shimmer_common::{ColorError, FrameRateMonitor, Gray, Phase, Tile, colors};
pub use surface::{Fill, FrameRecorder};
