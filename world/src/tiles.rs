//! Tile classification shared by movement checks and blast propagation.

use std::collections::BTreeSet;

use blast_arena_core::{Coord, Roster, Tile};

use crate::grid::Grid;

/// Borrowed view of everything that decides what a tile is.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TileResolver<'a> {
    pub(crate) grid: &'a Grid,
    pub(crate) walls: &'a BTreeSet<Coord>,
    pub(crate) boxes: &'a [Coord],
    pub(crate) roster: &'a Roster,
}

impl TileResolver<'_> {
    /// Players win over walls, walls over boxes; anything off the map is a wall.
    pub(crate) fn classify(&self, cell: Coord) -> Tile {
        if self.roster.occupies(cell) {
            Tile::Player
        } else if self.walls.contains(&cell) {
            Tile::Wall
        } else if self.boxes.contains(&cell) {
            Tile::Box
        } else if self.grid.contains(cell) {
            Tile::Empty
        } else {
            Tile::Wall
        }
    }
}
