//! Frame rate monitoring.
//!
//! Keeps the most recent frame deltas in a fixed-size ring buffer and derives
//! an average FPS from them. The average is the signal the scheduler uses to
//! decide whether animation load should be shed.
//!
//! # Usage
//!
//! ```ignore
//! let mut monitor = FrameRateMonitor::new();
//!
//! // Once per frame, after the first:
//! if let Some(fps) = monitor.record_delta(now - previous) {
//!     // a fresh average over a full window is available
//! }
//! if monitor.is_degraded(FPS_DROP_THRESHOLD) {
//!     // consult the load-shedding policy
//! }
//! ```
//!
//! # Averaging
//!
//! No average exists until the window holds `DELTA_WINDOW_SIZE` samples.
//! From then on every new delta evicts the oldest one and the average is
//! recomputed over the full window.

use heapless::Deque;

use crate::config::{DELTA_WINDOW_SIZE, FPS_DROP_THRESHOLD};

/// Rolling window of frame deltas, newest first.
pub struct FrameRateMonitor {
    deltas: Deque<f32, DELTA_WINDOW_SIZE>,
    /// Average FPS over the last full window.
    average_fps: Option<f32>,
}

impl FrameRateMonitor {
    /// Create an empty monitor.
    pub const fn new() -> Self {
        Self {
            deltas: Deque::new(),
            average_fps: None,
        }
    }

    /// Record the time between two frames in milliseconds.
    ///
    /// Returns the freshly computed average FPS when the window is full.
    pub fn record_delta(
        &mut self,
        delta_ms: f32,
    ) -> Option<f32> {
        // If full, drop oldest
        if self.deltas.is_full() {
            self.deltas.pop_back();
        }
        self.deltas.push_front(delta_ms).ok();

        if !self.deltas.is_full() {
            return None;
        }

        let mean = self.deltas.iter().sum::<f32>() / DELTA_WINDOW_SIZE as f32;
        let fps = if mean > 0.0 { 1000.0 / mean } else { f32::INFINITY };
        self.average_fps = Some(fps);
        Some(fps)
    }

    /// Average FPS from the last full window, if any.
    #[inline]
    pub const fn average_fps(&self) -> Option<f32> { self.average_fps }

    /// Check whether the last average fell below `threshold`.
    ///
    /// Always `false` before the first full window.
    #[inline]
    pub fn is_degraded(
        &self,
        threshold: f32,
    ) -> bool {
        self.average_fps.is_some_and(|fps| fps < threshold)
    }

    /// [`is_degraded`](Self::is_degraded) with the default 15 FPS threshold.
    #[inline]
    pub fn is_degraded_default(&self) -> bool { self.is_degraded(FPS_DROP_THRESHOLD) }

    /// Forget all samples; the next average needs a fresh full window.
    ///
    /// The last computed average is kept until then.
    pub fn reset(&mut self) { self.deltas.clear(); }

    /// Iterate over recorded deltas (newest first).
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ { self.deltas.iter().copied() }

    /// Number of recorded deltas.
    #[inline]
    pub const fn len(&self) -> usize { self.deltas.len() }

    /// Check if no deltas are recorded.
    #[inline]
    pub fn is_empty(&self) -> bool { self.deltas.is_empty() }
}

impl Default for FrameRateMonitor {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Tests
// =============================================================================
