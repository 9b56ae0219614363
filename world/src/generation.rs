//! Procedural arena layout: pillar lattice, corner spawns and box scattering.

use std::collections::BTreeSet;

use blast_arena_core::{ArenaError, Coord, Direction};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::grid::Grid;

const DEFAULT_BOX_DENSITY: f64 = 0.5;
const DEFAULT_SEED: u64 = 0x0b1a_57a2_e9a5_3c21;
/// Tiles kept clear along each direction from a spawn point.
const SAFETY_CORRIDOR_LENGTH: i32 = 2;

/// Configuration parameters required to generate an arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArenaConfig {
    width: u32,
    height: u32,
    box_density: f64,
    seed: u64,
    randomize_spawns: bool,
}

impl ArenaConfig {
    /// Creates a configuration with default density, seed and spawn order.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            box_density: DEFAULT_BOX_DENSITY,
            seed: DEFAULT_SEED,
            randomize_spawns: false,
        }
    }

    /// Fraction of eligible tiles that receive a box.
    #[must_use]
    pub fn with_box_density(mut self, box_density: f64) -> Self {
        self.box_density = box_density;
        self
    }

    /// Seed for every random draw made during generation.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Shuffles the corner spawns before seating players.
    #[must_use]
    pub fn with_randomized_spawns(mut self, randomize_spawns: bool) -> Self {
        self.randomize_spawns = randomize_spawns;
        self
    }

    /// Requested number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Requested number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Configured box density.
    #[must_use]
    pub const fn box_density(&self) -> f64 {
        self.box_density
    }

    /// Configured seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether spawn assignment is shuffled.
    #[must_use]
    pub const fn randomize_spawns(&self) -> bool {
        self.randomize_spawns
    }

    pub(crate) fn grid(&self) -> Result<Grid, ArenaError> {
        Grid::new(self.width, self.height)
    }

    pub(crate) fn validated_density(&self) -> Result<f64, ArenaError> {
        if self.box_density.is_finite() && (0.0..=1.0).contains(&self.box_density) {
            Ok(self.box_density)
        } else {
            Err(ArenaError::InvalidBoxDensity)
        }
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(13, 11)
    }
}

/// Every tile whose column and row are both odd.
pub(crate) fn wall_lattice(grid: &Grid) -> BTreeSet<Coord> {
    grid.cells()
        .filter(|cell| cell.x() % 2 == 1 && cell.y() % 2 == 1)
        .collect()
}

/// The four corners in seating order, optionally shuffled.
pub(crate) fn corner_spawns(grid: &Grid, shuffle: bool, rng: &mut ChaCha8Rng) -> Vec<Coord> {
    let right = i32::try_from(grid.width() - 1).unwrap_or(i32::MAX);
    let bottom = i32::try_from(grid.height() - 1).unwrap_or(i32::MAX);
    let mut spawns = vec![
        Coord::new(0, 0),
        Coord::new(right, 0),
        Coord::new(0, bottom),
        Coord::new(right, bottom),
    ];
    if shuffle {
        spawns.shuffle(rng);
    }
    spawns
}

/// Tiles one and two steps from `spawn` along each direction.
pub(crate) fn safety_corridor(spawn: Coord) -> impl Iterator<Item = Coord> {
    Direction::ALL.into_iter().flat_map(move |direction| {
        (1..=SAFETY_CORRIDOR_LENGTH).map(move |steps| spawn.offset(direction, steps))
    })
}

/// Non-wall tiles outside every seated player's safety corridor, ascending.
pub(crate) fn box_candidates(
    grid: &Grid,
    walls: &BTreeSet<Coord>,
    seated_spawns: &[Coord],
) -> Vec<Coord> {
    let mut candidates: BTreeSet<Coord> =
        grid.cells().filter(|cell| !walls.contains(cell)).collect();
    for spawn in seated_spawns {
        for cell in safety_corridor(*spawn) {
            let _ = candidates.remove(&cell);
        }
    }
    candidates.into_iter().collect()
}

/// `candidates * density`, rounding half to even.
pub(crate) fn box_count(candidates: usize, density: f64) -> usize {
    (candidates as f64 * density).round_ties_even() as usize
}

/// Samples boxes uniformly without replacement.
pub(crate) fn scatter_boxes(
    candidates: &[Coord],
    density: f64,
    rng: &mut ChaCha8Rng,
) -> Vec<Coord> {
    let count = box_count(candidates.len(), density);
    candidates.choose_multiple(rng, count).copied().collect()
}
