//! Load-shedding policies.
//!
//! When the frame rate stays low, the scheduler can animate fewer tiles. The
//! decision is a policy: the scheduler asks it once per fresh degraded
//! average how many active tiles to keep. The default keeps all of them, so
//! out of the box the degraded signal is reported but not acted upon.

/// Decides how many active tiles survive a degraded frame rate.
pub trait LoadShedding {
    /// Called with the degraded average FPS and the current active count.
    /// Returns the number of active tiles to keep.
    fn shed(
        &mut self,
        average_fps: f32,
        active: usize,
    ) -> usize;
}

/// Never drops tiles.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeepAll;

impl LoadShedding for KeepAll {
    fn shed(
        &mut self,
        _average_fps: f32,
        active: usize,
    ) -> usize {
        active
    }
}

/// Halves the active set (rounding up), never going below `min_active`.
#[derive(Clone, Copy, Debug)]
pub struct HalveActive {
    pub min_active: usize,
}

impl Default for HalveActive {
    fn default() -> Self { Self { min_active: 1 } }
}

impl LoadShedding for HalveActive {
    fn shed(
        &mut self,
        _average_fps: f32,
        active: usize,
    ) -> usize {
        active.div_ceil(2).max(self.min_active).min(active)
    }
}
