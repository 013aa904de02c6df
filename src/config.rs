//! Runtime configuration.
//!
//! The defaults come from the constants in [`shimmer_common::config`]; a host
//! overrides the fields it knows better (viewport size, base brightness) and
//! calls [`ShimmerConfig::validate`] before building a scheduler.
//!
//! Validation rejects values that would break the engine's assumptions:
//! - a zero viewport or tile pitch (empty grid)
//! - coverage outside `(0, 1)`: rejection sampling needs free cells
//! - a base brightness that can overflow a byte once scaled by the upper factor

use std::time::Duration;

use shimmer_common::colors::max_base_for;
use shimmer_common::config::{
    BRIGHTNESS_HIGH_FACTOR,
    BRIGHTNESS_LOW_FACTOR,
    FALLBACK_BRIGHTNESS,
    FPS_DROP_THRESHOLD,
    INITIAL_COVERAGE,
    REPLACEMENT_DELAY_MS,
    TILE_PITCH_X,
    TILE_PITCH_Y,
};
use thiserror::Error;

use crate::grid::dimensions;

// =============================================================================
// Simulator Window Configuration
// =============================================================================

/// Simulated viewport width in pixels (10 tile columns).
pub const SCREEN_WIDTH: u32 = 480;

/// Simulated viewport height in pixels (10 tile rows).
pub const SCREEN_HEIGHT: u32 = 320;

/// Window pixel scale for the simulator.
pub const WINDOW_SCALE: u32 = 2;

/// Target frame time (~60 FPS). The host loop sleeps if a frame completes early.
pub const FRAME_TIME: Duration = Duration::from_millis(16);

/// Largest grid the scheduler accepts; cell indices must fit a `u32`.
pub const MAX_GRID_CELLS: u64 = u32::MAX as u64;

// =============================================================================
// Errors
// =============================================================================

/// Invalid configuration values.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("viewport {width}x{height} has no area")]
    EmptyViewport { width: u32, height: u32 },
    #[error("tile pitch {x}x{y} must be non-zero")]
    ZeroPitch { x: u32, y: u32 },
    #[error("grid of {columns}x{rows} tiles exceeds {max} cells")]
    GridTooLarge { columns: u32, rows: u32, max: u64 },
    #[error("coverage {0} must be between 0 and 1 (exclusive)")]
    Coverage(f32),
    #[error("brightness factors {low}..={high} are not a valid range")]
    FactorRange { low: f32, high: f32 },
    #[error("base brightness {base} overflows when scaled by {high} (max {max})")]
    BaseTooBright { base: u8, high: f32, max: u8 },
    #[error("replacement delay {0}ms must be non-negative")]
    ReplacementDelay(f64),
}

// =============================================================================
// Shimmer Configuration
// =============================================================================

/// Parameters of one shimmer background.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShimmerConfig {
    /// Viewport width in pixels.
    pub viewport_width: u32,
    /// Viewport height in pixels.
    pub viewport_height: u32,
    /// Horizontal tile pitch in pixels.
    pub pitch_x: u32,
    /// Vertical tile pitch in pixels.
    pub pitch_y: u32,
    /// Brightness of the page background; also the center of the random shades.
    pub base_brightness: u8,
    /// Fraction of the grid animated right after startup.
    pub initial_coverage: f32,
    /// Delay between a tile completing and its replacement starting (ms).
    pub replacement_delay_ms: f64,
    /// Average FPS below which the frame rate counts as degraded.
    pub fps_threshold: f32,
    /// Lower bound of the random brightness factor.
    pub low_factor: f32,
    /// Upper bound of the random brightness factor.
    pub high_factor: f32,
    /// Seed for the tile picker; `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl ShimmerConfig {
    /// Default configuration for a viewport of the given size.
    pub fn for_viewport(
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            viewport_width: width,
            viewport_height: height,
            ..Self::default()
        }
    }

    /// Set the base brightness.
    #[must_use]
    pub const fn with_base_brightness(
        mut self,
        base: u8,
    ) -> Self {
        self.base_brightness = base;
        self
    }

    /// Set a fixed RNG seed.
    #[must_use]
    pub const fn with_seed(
        mut self,
        seed: u64,
    ) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Check all values against the engine's assumptions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(ConfigError::EmptyViewport {
                width: self.viewport_width,
                height: self.viewport_height,
            });
        }
        if self.pitch_x == 0 || self.pitch_y == 0 {
            return Err(ConfigError::ZeroPitch {
                x: self.pitch_x,
                y: self.pitch_y,
            });
        }
        let (columns, rows) = dimensions(self.viewport_width, self.viewport_height, self.pitch_x, self.pitch_y);
        if u64::from(columns) * u64::from(rows) > MAX_GRID_CELLS {
            return Err(ConfigError::GridTooLarge {
                columns,
                rows,
                max: MAX_GRID_CELLS,
            });
        }
        if !(self.initial_coverage > 0.0 && self.initial_coverage < 1.0) {
            return Err(ConfigError::Coverage(self.initial_coverage));
        }
        if !(self.low_factor >= 0.0 && self.low_factor <= self.high_factor) {
            return Err(ConfigError::FactorRange {
                low: self.low_factor,
                high: self.high_factor,
            });
        }
        let max = max_base_for(self.high_factor);
        if self.base_brightness > max {
            return Err(ConfigError::BaseTooBright {
                base: self.base_brightness,
                high: self.high_factor,
                max,
            });
        }
        if !(self.replacement_delay_ms >= 0.0) {
            return Err(ConfigError::ReplacementDelay(self.replacement_delay_ms));
        }
        Ok(())
    }
}

impl Default for ShimmerConfig {
    fn default() -> Self {
        Self {
            viewport_width: SCREEN_WIDTH,
            viewport_height: SCREEN_HEIGHT,
            pitch_x: TILE_PITCH_X,
            pitch_y: TILE_PITCH_Y,
            base_brightness: FALLBACK_BRIGHTNESS,
            initial_coverage: INITIAL_COVERAGE,
            replacement_delay_ms: REPLACEMENT_DELAY_MS,
            fps_threshold: FPS_DROP_THRESHOLD,
            low_factor: BRIGHTNESS_LOW_FACTOR,
            high_factor: BRIGHTNESS_HIGH_FACTOR,
            rng_seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(ShimmerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_empty_viewport_rejected() {
        let config = ShimmerConfig::for_viewport(0, 320);
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyViewport { width: 0, height: 320 })
        );
    }

    #[test]
    fn test_zero_pitch_rejected() {
        let config = ShimmerConfig {
            pitch_y: 0,
            ..ShimmerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroPitch { x: 48, y: 0 }));
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let config = ShimmerConfig {
            pitch_x: 1,
            pitch_y: 1,
            ..ShimmerConfig::for_viewport(u32::MAX, 2)
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::GridTooLarge {
                columns: u32::MAX,
                rows: 2,
                max: MAX_GRID_CELLS,
            })
        );
    }

    #[test]
    fn test_full_coverage_rejected() {
        for coverage in [0.0, 1.0, 1.5, f32::NAN] {
            let config = ShimmerConfig {
                initial_coverage: coverage,
                ..ShimmerConfig::default()
            };
            assert!(config.validate().is_err(), "coverage {coverage}");
        }
    }

    #[test]
    fn test_inverted_factors_rejected() {
        let config = ShimmerConfig {
            low_factor: 1.5,
            ..ShimmerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::FactorRange { .. })));
    }

    #[test]
    fn test_bright_base_rejected() {
        let config = ShimmerConfig::default().with_base_brightness(240);
        assert_eq!(
            config.validate(),
            Err(ConfigError::BaseTooBright {
                base: 240,
                high: 1.2,
                max: 213,
            })
        );
        assert_eq!(ShimmerConfig::default().with_base_brightness(213).validate(), Ok(()));
    }

    #[test]
    fn test_negative_delay_rejected() {
        let config = ShimmerConfig {
            replacement_delay_ms: -1.0,
            ..ShimmerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ReplacementDelay(-1.0)));
    }
}
