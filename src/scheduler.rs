//! Per-frame animation driver.
//!
//! The scheduler owns every piece of mutable state of a shimmer background:
//! the tile grid, the active set, the replacement queue, the frame-rate
//! monitor, the load-shedding policy and the random source. The host calls
//! [`AnimationScheduler::frame`] once per display refresh with its current
//! time in milliseconds.
//!
//! # Frame Sequence
//!
//! ```text
//! frame(now)
//!   ├─ fire replacements due at or before `now`   (they ran between frames)
//!   ├─ record `now - previous` in the FPS monitor  (skipped on the first frame)
//!   │    └─ fresh degraded average → ask the load-shedding policy
//!   └─ for each active tile, in insertion order:
//!        ├─ transitioning → paint the interpolated color
//!        └─ complete      → paint `end_color`, retire the tile,
//!                           queue a replacement for `now + 10 ms`
//! ```
//!
//! # Replacements
//!
//! The replacement delay is modeled as an explicit queue drained against the
//! caller's clock instead of a wall-clock timer, so the whole engine is
//! deterministic under a seeded RNG and a virtual clock. A replacement picks a
//! random cell outside the active set, reuses or creates its tile and starts a
//! new transition at the time the completion was detected. Reused tiles start
//! from their previous end color; new ones from the page background.
//!
//! # Failure Policy
//!
//! Fail-stop: if painting or color generation fails, the frame is abandoned,
//! the loop marks itself stopped and the error is returned. Every later call
//! returns [`ShimmerError::Stopped`].

use std::collections::VecDeque;
use std::fmt::Debug;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use shimmer_common::colors::random_brighter_within;
use shimmer_common::{FrameRateMonitor, Gray, Tile, pick_duration};
use tracing::{debug, error, info, warn};

use crate::config::ShimmerConfig;
use crate::error::ShimmerError;
use crate::grid::TileGrid;
use crate::shedding::{KeepAll, LoadShedding};

// =============================================================================
// Frame Results
// =============================================================================

/// What happened during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Tiles painted (transitioning and completed).
    pub painted: usize,
    /// Tiles that completed and were retired.
    pub completed: usize,
    /// Replacements that started at the beginning of the frame.
    pub replaced: usize,
    /// Tiles dropped by the load-shedding policy.
    pub shed: usize,
    /// Freshly computed average FPS, if the monitor produced one.
    pub average_fps: Option<f32>,
}

/// Observable state of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileState {
    /// No tile has been created for this cell.
    Vacant,
    /// The tile exists but is not animating; it shows its end color.
    Idle,
    /// The tile is animating.
    Transitioning,
    /// The window has passed but the scheduler has not retired it yet.
    Complete,
}

/// A replacement waiting for its delay to pass.
#[derive(Clone, Copy, Debug)]
struct PendingReplacement {
    /// Earliest frame time at which it fires.
    due: f64,
    /// Frame time of the completion that scheduled it.
    started_at: f64,
}

// =============================================================================
// Scheduler
// =============================================================================

/// Drives all tile animations of one background.
pub struct AnimationScheduler {
    config: ShimmerConfig,
    grid: TileGrid,
    /// Grid indices currently animating, in insertion order.
    active: Vec<usize>,
    pending: VecDeque<PendingReplacement>,
    monitor: FrameRateMonitor,
    policy: Box<dyn LoadShedding>,
    rng: SmallRng,
    default_color: Gray,
    previous_time: Option<f64>,
    running: bool,
    degraded: bool,
}

impl AnimationScheduler {
    /// Create a scheduler with an empty grid and the no-op shedding policy.
    pub fn new(config: ShimmerConfig) -> Result<Self, ShimmerError> {
        config.validate()?;

        let rng = match config.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let grid = TileGrid::new(config.viewport_width, config.viewport_height, config.pitch_x, config.pitch_y);

        Ok(Self {
            default_color: Gray(config.base_brightness),
            config,
            grid,
            active: Vec::new(),
            pending: VecDeque::new(),
            monitor: FrameRateMonitor::new(),
            policy: Box::new(KeepAll),
            rng,
            previous_time: None,
            running: true,
            degraded: false,
        })
    }

    /// Replace the load-shedding policy.
    #[must_use]
    pub fn with_policy<P: LoadShedding + 'static>(
        mut self,
        policy: P,
    ) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Start the initial transitions on a random quarter of the grid.
    ///
    /// All of them fade from the page background and start at `now`.
    /// Returns the number of tiles started.
    pub fn populate(
        &mut self,
        now: f64,
    ) -> Result<usize, ShimmerError> {
        let target = (self.grid.len() as f32 * self.config.initial_coverage).round() as usize;
        let count = target.min(self.grid.len()).saturating_sub(self.active.len());

        for _ in 0..count {
            let index = self.grid.pick_unused_index(&self.active, &mut self.rng);
            let end = self.random_shade()?;
            let duration = pick_duration(&mut self.rng);
            let (x, y) = self.grid.index_to_position(index);
            self.grid.set(index, Tile::new(x, y, self.default_color, end, now, duration));
            self.active.push(index);
        }

        info!(
            tiles = count,
            columns = self.grid.columns(),
            rows = self.grid.rows(),
            default_color = %self.default_color,
            "Populated shimmer grid",
        );
        Ok(count)
    }

    /// Run one display frame at time `now` (milliseconds).
    pub fn frame<D>(
        &mut self,
        now: f64,
        display: &mut D,
    ) -> Result<FrameStats, ShimmerError>
    where
        D: DrawTarget,
        D::Color: From<Rgb888>,
        D::Error: Debug,
    {
        if !self.running {
            return Err(ShimmerError::Stopped);
        }

        match self.run_frame(now, display) {
            Ok(stats) => Ok(stats),
            Err(err) => {
                self.running = false;
                error!(%err, now, "Frame failed, stopping animation loop");
                Err(err)
            }
        }
    }

    fn run_frame<D>(
        &mut self,
        now: f64,
        display: &mut D,
    ) -> Result<FrameStats, ShimmerError>
    where
        D: DrawTarget,
        D::Color: From<Rgb888>,
        D::Error: Debug,
    {
        let mut stats = FrameStats {
            replaced: self.fire_replacements(now)?,
            ..FrameStats::default()
        };

        // First frame only establishes the baseline
        if let Some(previous) = self.previous_time.replace(now)
            && let Some(fps) = self.monitor.record_delta((now - previous) as f32)
        {
            stats.average_fps = Some(fps);
            stats.shed = self.check_frame_rate(fps, previous);
        }

        let mut i = 0;
        while i < self.active.len() {
            let index = self.active[i];
            let area = self.grid.cell_rect(index);
            let Some(tile) = self.grid.get(index) else {
                warn!(index, "Active index has no tile, dropping it");
                self.active.remove(i);
                continue;
            };

            if tile.is_complete(now) {
                let color = tile.end_color;
                fill(display, &area, color)?;
                // The next entry slides into slot `i`
                self.active.remove(i);
                self.pending.push_back(PendingReplacement {
                    due: now + self.config.replacement_delay_ms,
                    started_at: now,
                });
                stats.completed += 1;
                debug!(index, color = %color, "Tile transition complete");
            } else {
                fill(display, &area, tile.current_color(now))?;
                i += 1;
            }
            stats.painted += 1;
        }

        Ok(stats)
    }

    /// Start every replacement whose delay has passed, oldest first.
    fn fire_replacements(
        &mut self,
        now: f64,
    ) -> Result<usize, ShimmerError> {
        let mut fired = 0;
        while let Some(pending) = self.pending.front().copied() {
            if pending.due > now {
                break;
            }
            self.pending.pop_front();
            self.start_replacement(pending.started_at)?;
            fired += 1;
        }
        Ok(fired)
    }

    fn start_replacement(
        &mut self,
        started_at: f64,
    ) -> Result<usize, ShimmerError> {
        let index = self.grid.pick_unused_index(&self.active, &mut self.rng);
        let end = self.random_shade()?;
        let duration = pick_duration(&mut self.rng);

        if let Some(tile) = self.grid.get_mut(index) {
            tile.begin_transition(started_at, end, duration);
        } else {
            let (x, y) = self.grid.index_to_position(index);
            self.grid.set(index, Tile::new(x, y, self.default_color, end, started_at, duration));
        }
        self.active.push(index);

        debug!(index, end = %end, duration, "Started replacement tile");
        Ok(index)
    }

    /// React to a fresh FPS average. Returns the number of tiles shed.
    ///
    /// Dropped tiles are frozen at the shade painted by the frame at
    /// `last_painted`, so recycling them later starts from what the screen
    /// shows.
    fn check_frame_rate(
        &mut self,
        fps: f32,
        last_painted: f64,
    ) -> usize {
        debug!(fps, "Frame rate average");
        if !self.monitor.is_degraded(self.config.fps_threshold) {
            if self.degraded {
                info!(fps, "Frame rate recovered");
                self.degraded = false;
            }
            return 0;
        }

        if !self.degraded {
            warn!(fps, threshold = self.config.fps_threshold, "Frame rate degraded");
            self.degraded = true;
        }

        let before = self.active.len();
        let keep = self.policy.shed(fps, before).min(before);
        if keep == before {
            return 0;
        }

        for &index in &self.active[keep..] {
            if let Some(tile) = self.grid.get_mut(index) {
                tile.freeze(last_painted);
            }
        }
        self.active.truncate(keep);
        // Judge the reduced load on a fresh window
        self.monitor.reset();
        warn!(fps, kept = keep, dropped = before - keep, "Shed animation load");
        before - keep
    }

    fn random_shade(&mut self) -> Result<Gray, ShimmerError> {
        Ok(random_brighter_within(
            self.config.base_brightness,
            self.config.low_factor,
            self.config.high_factor,
            &mut self.rng,
        )?)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Observable state of the cell at `index` at time `now`.
    pub fn tile_state(
        &self,
        index: usize,
        now: f64,
    ) -> TileState {
        match self.grid.get(index) {
            None => TileState::Vacant,
            Some(_) if !self.active.contains(&index) => TileState::Idle,
            Some(tile) if tile.is_complete(now) => TileState::Complete,
            Some(_) => TileState::Transitioning,
        }
    }

    /// Tile grid.
    #[inline]
    pub const fn grid(&self) -> &TileGrid { &self.grid }

    /// Active grid indices in insertion order.
    #[inline]
    pub fn active(&self) -> &[usize] { &self.active }

    /// Number of replacements waiting for their delay.
    #[inline]
    pub fn pending_replacements(&self) -> usize { self.pending.len() }

    /// Frame-rate monitor.
    #[inline]
    pub const fn monitor(&self) -> &FrameRateMonitor { &self.monitor }

    /// Page background shade; fresh tiles fade out of it.
    #[inline]
    pub const fn default_color(&self) -> Gray { self.default_color }

    /// Configuration in use.
    #[inline]
    pub const fn config(&self) -> &ShimmerConfig { &self.config }

    /// Check whether the frame loop still accepts frames.
    #[inline]
    pub const fn is_running(&self) -> bool { self.running }

    /// Stop the frame loop; later frames return [`ShimmerError::Stopped`].
    pub fn stop(&mut self) { self.running = false; }
}

/// Fill one tile rectangle, mapping surface errors into [`ShimmerError`].
fn fill<D>(
    display: &mut D,
    area: &Rectangle,
    color: Gray,
) -> Result<(), ShimmerError>
where
    D: DrawTarget,
    D::Color: From<Rgb888>,
    D::Error: Debug,
{
    display
        .fill_solid(area, Rgb888::from(color).into())
        .map_err(|err| ShimmerError::Surface(format!("{err:?}")))
}

// =============================================================================
// Unit Tests
// =============================================================================
