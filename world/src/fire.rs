//! Directional blast propagation.

use std::collections::BTreeSet;

use blast_arena_core::{Coord, Direction, Tile};

use crate::tiles::TileResolver;

/// Tiles reached by a blast plus the boxes that stopped it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FireCoverage {
    tiles: BTreeSet<Coord>,
    blocking_boxes: Vec<Coord>,
}

impl FireCoverage {
    /// Covered tiles, origin included.
    #[must_use]
    pub fn tiles(&self) -> &BTreeSet<Coord> {
        &self.tiles
    }

    /// First box met in each direction, in [`Direction::ALL`] order. Never part of `tiles`.
    #[must_use]
    pub fn blocking_boxes(&self) -> &[Coord] {
        &self.blocking_boxes
    }
}

/// Walks up to `power - 1` tiles outward in each direction.
///
/// Empty and player tiles are covered and the walk continues; the first wall
/// or box ends that direction and is not covered.
pub(crate) fn propagate(resolver: &TileResolver<'_>, origin: Coord, power: u32) -> FireCoverage {
    let mut coverage = FireCoverage::default();
    let _ = coverage.tiles.insert(origin);

    for direction in Direction::ALL {
        for step in 1..power {
            let Ok(distance) = i32::try_from(step) else {
                break;
            };
            let cell = origin.offset(direction, distance);
            match resolver.classify(cell) {
                Tile::Empty | Tile::Player => {
                    let _ = coverage.tiles.insert(cell);
                }
                Tile::Box => {
                    coverage.blocking_boxes.push(cell);
                    break;
                }
                Tile::Wall => break,
            }
        }
    }

    coverage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use blast_arena_core::Roster;

    fn open_field() -> (Grid, BTreeSet<Coord>, Roster) {
        (
            Grid::new(9, 9).expect("valid grid"),
            BTreeSet::new(),
            Roster::default(),
        )
    }

    #[test]
    fn power_one_covers_only_the_origin() {
        let (grid, walls, roster) = open_field();
        let resolver = TileResolver {
            grid: &grid,
            walls: &walls,
            boxes: &[],
            roster: &roster,
        };
        let origin = Coord::new(4, 4);

        let coverage = propagate(&resolver, origin, 1);
        assert_eq!(coverage.tiles(), &BTreeSet::from([origin]));

        let coverage = propagate(&resolver, origin, 0);
        assert_eq!(coverage.tiles(), &BTreeSet::from([origin]));
    }

    #[test]
    fn open_blast_forms_a_plus_shape() {
        let (grid, walls, roster) = open_field();
        let resolver = TileResolver {
            grid: &grid,
            walls: &walls,
            boxes: &[],
            roster: &roster,
        };

        let coverage = propagate(&resolver, Coord::new(4, 4), 3);
        assert_eq!(coverage.tiles().len(), 9);
        assert!(coverage.tiles().contains(&Coord::new(4, 2)));
        assert!(coverage.tiles().contains(&Coord::new(6, 4)));
        assert!(!coverage.tiles().contains(&Coord::new(5, 5)));
        assert!(coverage.blocking_boxes().is_empty());
    }

    #[test]
    fn walls_and_boxes_stop_propagation_and_stay_uncovered() {
        let grid = Grid::new(9, 9).expect("valid grid");
        let walls = BTreeSet::from([Coord::new(4, 2)]);
        let boxes = [Coord::new(6, 4)];
        let roster = Roster::default();
        let resolver = TileResolver {
            grid: &grid,
            walls: &walls,
            boxes: &boxes,
            roster: &roster,
        };

        let coverage = propagate(&resolver, Coord::new(4, 4), 5);
        assert!(coverage.tiles().contains(&Coord::new(4, 3)));
        assert!(!coverage.tiles().contains(&Coord::new(4, 2)));
        assert!(!coverage.tiles().contains(&Coord::new(4, 1)));
        assert!(coverage.tiles().contains(&Coord::new(5, 4)));
        assert!(!coverage.tiles().contains(&Coord::new(6, 4)));
        assert!(!coverage.tiles().contains(&Coord::new(7, 4)));
        assert_eq!(coverage.blocking_boxes(), &[Coord::new(6, 4)]);
    }

    #[test]
    fn map_edge_behaves_like_a_wall() {
        let (grid, walls, roster) = open_field();
        let resolver = TileResolver {
            grid: &grid,
            walls: &walls,
            boxes: &[],
            roster: &roster,
        };

        let coverage = propagate(&resolver, Coord::new(0, 0), 4);
        let expected = BTreeSet::from([
            Coord::new(0, 0),
            Coord::new(1, 0),
            Coord::new(2, 0),
            Coord::new(3, 0),
            Coord::new(0, 1),
            Coord::new(0, 2),
            Coord::new(0, 3),
        ]);
        assert_eq!(coverage.tiles(), &expected);
    }
}
