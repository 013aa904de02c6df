//! Per-tile color transitions.
//!
//! Each tile of the background fades from one gray shade to another over a
//! fixed time window. The color for any moment is a pure function of the
//! tile's two shades, its window, and the caller's clock, so the animation
//! speed is independent of the frame rate.
//!
//! # Tile Lifecycle
//!
//! ```text
//!            begin_transition                now > end_time
//!   Idle ───────────────────► Transitioning ───────────────► Complete
//!    ▲                                                          │
//!    └──────────────── removed from the active set ─────────────┘
//! ```
//!
//! - **Idle**: the tile exists but nobody is animating it. Its `end_color`
//!   is what the screen shows. Whether a tile is idle is decided by the
//!   scheduler's active set, not by the tile itself.
//! - **Transitioning**: `start_time <= now <= end_time`.
//! - **Complete**: `now > end_time`; the scheduler paints the final color
//!   and retires the tile.
//!
//! Recycling a tile with [`Tile::begin_transition`] starts the new fade from
//! the previous `end_color`, so there is never a visible jump.
//!
//! # Interpolation
//!
//! ```text
//! tau        = clamp((now - start_time) / (end_time - start_time), 0, 1)
//! brightness = round(start + (end - start) * tau)
//! ```
//!
//! At `tau = 1` the product is exact, so the color at `end_time` is exactly
//! `end_color`.

use rand::Rng;

use crate::colors::Gray;
use crate::config::{MIN_TRANSITION_MS, TRANSITION_STEP_MS, TRANSITION_STEPS};

// =============================================================================
// Transition Phase
// =============================================================================

/// Where a tile's current transition stands at a given moment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    /// Fading; `tau` is the clamped progress in `[0, 1]`.
    Transitioning { tau: f32 },
    /// The window has passed; only the final color remains.
    Complete,
}

// =============================================================================
// Tile
// =============================================================================

/// One cell of the background grid and its current transition.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    column: u32,
    row: u32,
    /// Shade at `start_time`.
    pub start_color: Gray,
    /// Shade at and after `end_time`.
    pub end_color: Gray,
    /// Transition start in milliseconds.
    pub start_time: f64,
    /// Transition end in milliseconds, always after `start_time`.
    pub end_time: f64,
}

impl Tile {
    /// Create a tile whose first transition fades `from` → `to`.
    ///
    /// `from` is normally the page background, which is what the cell shows
    /// before it is ever painted.
    pub fn new(
        column: u32,
        row: u32,
        from: Gray,
        to: Gray,
        now: f64,
        duration: f64,
    ) -> Self {
        Self {
            column,
            row,
            start_color: from,
            end_color: to,
            start_time: now,
            end_time: now + positive_duration(duration),
        }
    }

    /// Grid column (0-based).
    #[inline]
    pub const fn column(&self) -> u32 { self.column }

    /// Grid row (0-based).
    #[inline]
    pub const fn row(&self) -> u32 { self.row }

    /// Start a new transition from the current end color toward `new_end`.
    pub fn begin_transition(
        &mut self,
        now: f64,
        new_end: Gray,
        duration: f64,
    ) {
        self.start_color = self.end_color;
        self.end_color = new_end;
        self.start_time = now;
        self.end_time = now + positive_duration(duration);
    }

    /// Stop the transition at the shade it shows at `at`.
    ///
    /// Both ends collapse onto that shade, so a later
    /// [`begin_transition`](Self::begin_transition) fades out of what the
    /// cell last showed.
    pub fn freeze(
        &mut self,
        at: f64,
    ) {
        let shown = self.current_color(at);
        self.start_color = shown;
        self.end_color = shown;
        self.start_time = at;
        self.end_time = at;
    }

    /// Check whether the transition window has passed.
    #[inline]
    pub fn is_complete(
        &self,
        now: f64,
    ) -> bool {
        now > self.end_time
    }

    /// Transition progress at `now`, clamped to `[0, 1]`.
    ///
    /// The clamp guards against a clock that reports a time before
    /// `start_time`.
    pub fn progress(
        &self,
        now: f64,
    ) -> f32 {
        let span = self.end_time - self.start_time;
        if span <= 0.0 {
            return 1.0;
        }
        let tau = ((now - self.start_time) / span) as f32;
        tau.clamp(0.0, 1.0)
    }

    /// Phase of the transition at `now`.
    pub fn phase(
        &self,
        now: f64,
    ) -> Phase {
        if self.is_complete(now) {
            Phase::Complete
        } else {
            Phase::Transitioning { tau: self.progress(now) }
        }
    }

    /// Color to display at `now`.
    ///
    /// Interpolates while the window is open and returns `end_color`
    /// untouched once it has passed.
    pub fn current_color(
        &self,
        now: f64,
    ) -> Gray {
        match self.phase(now) {
            Phase::Transitioning { tau } => lerp_gray(self.start_color, self.end_color, tau),
            Phase::Complete => self.end_color,
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Linear interpolation between two shades, rounded to the nearest byte.
pub fn lerp_gray(
    from: Gray,
    to: Gray,
    tau: f32,
) -> Gray {
    let start = f32::from(from.brightness());
    let end = f32::from(to.brightness());
    let grey = micromath::F32(start + (end - start) * tau.clamp(0.0, 1.0)).round().0;
    Gray(grey.clamp(0.0, 255.0) as u8)
}

/// Pick a transition duration: one of six equally likely values
/// `5000, 5500, ... 7500` ms.
pub fn pick_duration<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let step = rng.random_range(0..TRANSITION_STEPS);
    MIN_TRANSITION_MS + TRANSITION_STEP_MS * f64::from(step)
}

/// Keep `end_time > start_time` even for a zero or negative request (1 ms floor).
fn positive_duration(duration: f64) -> f64 {
    if duration > 0.0 { duration } else { 1.0 }
}

// =============================================================================
// Unit Tests
// =============================================================================
