//! Headless drawing surface.
//!
//! The scheduler draws through any `embedded-graphics` [`DrawTarget`]. On a
//! desktop that is the simulator display; without a window, [`FrameRecorder`]
//! keeps the list of filled rectangles instead of pixels, which is all the
//! shimmer ever draws.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// One solid fill issued by the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fill {
    pub area: Rectangle,
    pub color: Rgb888,
}

/// Draw target that records solid fills.
pub struct FrameRecorder {
    size: Size,
    fills: Vec<Fill>,
}

impl FrameRecorder {
    /// Create a recorder for a viewport of the given size.
    pub const fn new(size: Size) -> Self {
        Self {
            size,
            fills: Vec::new(),
        }
    }

    /// All fills recorded so far, oldest first.
    #[inline]
    pub fn fills(&self) -> &[Fill] { &self.fills }

    /// Drain the recorded fills.
    pub fn take_fills(&mut self) -> Vec<Fill> { core::mem::take(&mut self.fills) }

    /// Color of the most recent fill whose area starts at `top_left`.
    pub fn last_fill_at(
        &self,
        top_left: Point,
    ) -> Option<Rgb888> {
        self.fills
            .iter()
            .rev()
            .find(|fill| fill.area.top_left == top_left)
            .map(|fill| fill.color)
    }
}

impl OriginDimensions for FrameRecorder {
    fn size(&self) -> Size { self.size }
}

impl DrawTarget for FrameRecorder {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.fills.push(Fill {
                area: Rectangle::new(point, Size::new(1, 1)),
                color,
            });
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.fills.push(Fill { area: *area, color });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_solid_fills() {
        let mut recorder = FrameRecorder::new(Size::new(96, 64));
        let area = Rectangle::new(Point::new(48, 0), Size::new(48, 32));
        recorder.fill_solid(&area, Rgb888::new(9, 9, 9)).unwrap();
        recorder.fill_solid(&area, Rgb888::new(7, 7, 7)).unwrap();

        assert_eq!(recorder.fills().len(), 2);
        assert_eq!(recorder.last_fill_at(Point::new(48, 0)), Some(Rgb888::new(7, 7, 7)));
        assert_eq!(recorder.last_fill_at(Point::zero()), None);

        assert_eq!(recorder.take_fills().len(), 2);
        assert!(recorder.fills().is_empty());
    }

    #[test]
    fn test_clear_records_full_viewport() {
        let mut recorder = FrameRecorder::new(Size::new(96, 64));
        recorder.clear(Rgb888::new(42, 42, 42)).unwrap();
        assert_eq!(recorder.fills()[0].area, recorder.bounding_box());
    }
}
