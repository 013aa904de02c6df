//! Tile grid covering the viewport.
//!
//! The viewport is cut into `columns × rows` cells of `pitch_x × pitch_y`
//! pixels. Partial cells at the right and bottom edges count as full cells,
//! so the grid always covers the whole viewport.
//!
//! # Layout
//!
//! ```text
//!  index = x + y * columns
//!
//!  ┌────┬────┬────┬─ ─ ─┐
//!  │ 0  │ 1  │ 2  │     │   row 0
//!  ├────┼────┼────┼─ ─ ─┤
//!  │ c  │c+1 │c+2 │     │   row 1
//!  └────┴────┴────┴─ ─ ─┘
//! ```
//!
//! Slots start empty and are filled lazily the first time a tile is picked.
//! The grid is sized once and never resized.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use rand::Rng;
use shimmer_common::Tile;

/// Grid size for a viewport: `(ceil(width / pitch_x), ceil(height / pitch_y))`.
pub const fn dimensions(
    viewport_width: u32,
    viewport_height: u32,
    pitch_x: u32,
    pitch_y: u32,
) -> (u32, u32) {
    (viewport_width.div_ceil(pitch_x), viewport_height.div_ceil(pitch_y))
}

/// Fixed array of lazily created tiles.
pub struct TileGrid {
    columns: u32,
    rows: u32,
    pitch: Size,
    tiles: Vec<Option<Tile>>,
}

impl TileGrid {
    /// Create an empty grid covering a `viewport_width × viewport_height` viewport.
    pub fn new(
        viewport_width: u32,
        viewport_height: u32,
        pitch_x: u32,
        pitch_y: u32,
    ) -> Self {
        let (columns, rows) = dimensions(viewport_width, viewport_height, pitch_x, pitch_y);
        let mut tiles = Vec::new();
        tiles.resize_with(columns as usize * rows as usize, || None);
        Self {
            columns,
            rows,
            pitch: Size::new(pitch_x, pitch_y),
            tiles,
        }
    }

    /// Number of columns.
    #[inline]
    pub const fn columns(&self) -> u32 { self.columns }

    /// Number of rows.
    #[inline]
    pub const fn rows(&self) -> u32 { self.rows }

    /// Tile size in pixels.
    #[inline]
    pub const fn pitch(&self) -> Size { self.pitch }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize { self.tiles.len() }

    /// Check if the grid has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool { self.tiles.is_empty() }

    /// Grid position `(x, y)` of a linear index.
    #[inline]
    pub const fn index_to_position(
        &self,
        index: usize,
    ) -> (u32, u32) {
        let columns = self.columns as usize;
        ((index % columns) as u32, (index / columns) as u32)
    }

    /// Linear index of a grid position.
    #[inline]
    pub const fn position_to_index(
        &self,
        x: u32,
        y: u32,
    ) -> usize {
        x as usize + y as usize * self.columns as usize
    }

    /// Pixel rectangle covered by the cell at `index`.
    pub fn cell_rect(
        &self,
        index: usize,
    ) -> Rectangle {
        let (x, y) = self.index_to_position(index);
        let origin = Point::new((x * self.pitch.width) as i32, (y * self.pitch.height) as i32);
        Rectangle::new(origin, self.pitch)
    }

    /// Pick a uniformly random index that is not in `exclude`.
    ///
    /// Uses rejection sampling, which only terminates quickly while `exclude`
    /// covers a small part of the grid. The engine keeps it around a quarter.
    pub fn pick_unused_index<R: Rng + ?Sized>(
        &self,
        exclude: &[usize],
        rng: &mut R,
    ) -> usize {
        debug_assert!(exclude.len() < self.tiles.len(), "no free cell left to pick");
        loop {
            let index = rng.random_range(0..self.tiles.len());
            if !exclude.contains(&index) {
                return index;
            }
        }
    }

    /// Tile at `index`, if one has been created.
    #[inline]
    pub fn get(
        &self,
        index: usize,
    ) -> Option<&Tile> {
        self.tiles.get(index).and_then(Option::as_ref)
    }

    /// Mutable tile at `index`, if one has been created.
    #[inline]
    pub fn get_mut(
        &mut self,
        index: usize,
    ) -> Option<&mut Tile> {
        self.tiles.get_mut(index).and_then(Option::as_mut)
    }

    /// Store a tile at `index`, replacing any previous one.
    ///
    /// Out-of-range indices are ignored.
    pub fn set(
        &mut self,
        index: usize,
        tile: Tile,
    ) {
        if let Some(slot) = self.tiles.get_mut(index) {
            *slot = Some(tile);
        }
    }

    /// Number of cells that hold a tile.
    pub fn created(&self) -> usize { self.tiles.iter().filter(|t| t.is_some()).count() }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use shimmer_common::Gray;

    use super::*;

    #[test]
    fn test_dimensions_round_up() {
        assert_eq!(dimensions(480, 320, 48, 32), (10, 10));
        assert_eq!(dimensions(481, 321, 48, 32), (11, 11));
        assert_eq!(dimensions(1, 1, 48, 32), (1, 1));
        assert_eq!(dimensions(1920, 1080, 48, 32), (40, 34));
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = TileGrid::new(480, 320, 48, 32);
        assert_eq!(grid.len(), 100);
        assert_eq!(grid.created(), 0);
        assert!(grid.get(0).is_none());
    }

    #[test]
    fn test_index_round_trip() {
        let grid = TileGrid::new(500, 300, 48, 32);
        for i in 0..grid.len() {
            let (x, y) = grid.index_to_position(i);
            assert!(x < grid.columns() && y < grid.rows());
            assert_eq!(grid.position_to_index(x, y), i);
        }
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_index_math_beyond_u32_products() {
        // 70_000 columns: y * columns overflows u32 for the last rows
        let grid = TileGrid {
            columns: 70_000,
            rows: 70_000,
            pitch: Size::new(1, 1),
            tiles: Vec::new(),
        };
        let index = grid.position_to_index(69_999, 69_999);
        assert_eq!(index, 4_899_999_999);
        assert_eq!(grid.index_to_position(index), (69_999, 69_999));
    }

    #[test]
    fn test_cell_rect() {
        let grid = TileGrid::new(480, 320, 48, 32);
        let rect = grid.cell_rect(23);
        assert_eq!(rect.top_left, Point::new(3 * 48, 2 * 32));
        assert_eq!(rect.size, Size::new(48, 32));
    }

    #[test]
    fn test_pick_unused_index_avoids_excluded() {
        let grid = TileGrid::new(96, 64, 48, 32);
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..200 {
            assert_eq!(grid.pick_unused_index(&[0, 1, 3], &mut rng), 2);
        }
    }

    #[test]
    fn test_pick_unused_index_in_range() {
        let grid = TileGrid::new(480, 320, 48, 32);
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..1000 {
            assert!(grid.pick_unused_index(&[], &mut rng) < grid.len());
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = TileGrid::new(480, 320, 48, 32);
        let tile = Tile::new(4, 1, Gray(42), Gray(40), 0.0, 5000.0);
        grid.set(14, tile.clone());
        assert_eq!(grid.get(14), Some(&tile));
        assert_eq!(grid.created(), 1);

        grid.get_mut(14).unwrap().begin_transition(6000.0, Gray(44), 5000.0);
        assert_eq!(grid.get(14).unwrap().start_color, Gray(40));

        // Out of range is ignored
        grid.set(1000, tile);
        assert_eq!(grid.created(), 1);
    }
}
