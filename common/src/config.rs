//! Layout and timing constants for the shimmer background.
//!
//! These form the default configuration surface. The application crate copies
//! them into its runtime `ShimmerConfig`, which can override the tunable ones.

// =============================================================================
// Tile Layout
// =============================================================================

/// Horizontal tile pitch in pixels.
pub const TILE_PITCH_X: u32 = 48;

/// Vertical tile pitch in pixels.
pub const TILE_PITCH_Y: u32 = 32;

/// Fraction of the grid that is animating right after startup.
pub const INITIAL_COVERAGE: f32 = 0.25;

// =============================================================================
// Color Configuration
// =============================================================================

/// Base brightness used when the page background cannot be parsed.
/// 42 = `#2a2a2a`, a dark neutral gray.
pub const FALLBACK_BRIGHTNESS: u8 = 42;

/// Lower bound of the random factor applied to the base brightness.
pub const BRIGHTNESS_LOW_FACTOR: f32 = 0.8;

/// Upper bound of the random factor applied to the base brightness.
pub const BRIGHTNESS_HIGH_FACTOR: f32 = 1.2;

// =============================================================================
// Timing Configuration
// =============================================================================

/// Shortest transition duration in milliseconds.
pub const MIN_TRANSITION_MS: f64 = 5000.0;

/// Spacing between the discrete transition durations.
pub const TRANSITION_STEP_MS: f64 = 500.0;

/// Number of distinct transition durations (5000, 5500, ... 7500 ms).
pub const TRANSITION_STEPS: u32 = 6;

/// Delay between a tile completing and its replacement starting.
pub const REPLACEMENT_DELAY_MS: f64 = 10.0;

// =============================================================================
// Frame Rate Monitoring
// =============================================================================

/// Number of frame deltas kept in the rolling window (~1 second at 60 FPS).
pub const DELTA_WINDOW_SIZE: usize = 60;

/// Average FPS below which the animation is considered degraded.
pub const FPS_DROP_THRESHOLD: f32 = 15.0;
