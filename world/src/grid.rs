//! Map bounds and the linear position encoding used on the wire.

use blast_arena_core::{ArenaError, Coord};

/// Dimensions of the arena measured in tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
}

impl Grid {
    /// Validates and creates a grid. Both sides must be addressable by [`Coord`].
    pub fn new(width: u32, height: u32) -> Result<Self, ArenaError> {
        let limit = i32::MAX.unsigned_abs();
        if width == 0 || height == 0 || width > limit || height > limit {
            return Err(ArenaError::InvalidMapDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether `cell` lies within `[0, width) x [0, height)`.
    #[must_use]
    pub fn contains(&self, cell: Coord) -> bool {
        u32::try_from(cell.x()).is_ok_and(|x| x < self.width)
            && u32::try_from(cell.y()).is_ok_and(|y| y < self.height)
    }

    /// Encodes a coordinate as `y * width + x`.
    #[must_use]
    pub fn position_of(&self, cell: Coord) -> i64 {
        i64::from(cell.y()) * i64::from(self.width) + i64::from(cell.x())
    }

    /// Decodes a linear position, rounding toward negative infinity.
    #[must_use]
    pub fn cell_at(&self, position: i64) -> Coord {
        let width = i64::from(self.width);
        let x = position.rem_euclid(width);
        let y = position.div_euclid(width);
        Coord::new(clamp_to_i32(x), clamp_to_i32(y))
    }

    /// Every coordinate of the grid in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Coord> {
        let width = clamp_to_i32(i64::from(self.width));
        let height = clamp_to_i32(i64::from(self.height));
        (0..height).flat_map(move |y| (0..width).map(move |x| Coord::new(x, y)))
    }
}

fn clamp_to_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}
