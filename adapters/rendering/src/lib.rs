#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Blast Arena adapters.
//!
//! Two projections of the arena are provided: [`ArenaSnapshot`], the wire
//! snapshot handed to clients, and [`TextGrid`], a framed character grid for
//! debugging. Both are captured from a [`World`] and the [`Roster`] lent to it.

use std::fmt;

use anyhow::{Context, Result as AnyResult};
use blast_arena_core::{Coord, Roster};
use blast_arena_world::{query, Grid, World};
use serde::{Deserialize, Serialize};

/// Structured snapshot of the arena with every coordinate as a linear position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    /// Static map description.
    pub map: MapSnapshot,
    /// Players in roster order.
    pub players: Vec<PlayerSnapshot>,
    /// Every covered position of every live fire, fire by fire.
    pub fires: Vec<i64>,
    /// Positions of live bombs.
    pub bombs: Vec<i64>,
    /// Positions of remaining boxes.
    pub boxes: Vec<i64>,
}

/// Dimensions and pillar positions of the arena.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSnapshot {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Linear positions of every pillar.
    pub walls: Vec<i64>,
}

/// Wire representation of a single player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Externally assigned player id.
    pub id: u32,
    /// Linear position of the player's tile.
    pub pos: i64,
    /// Whether the player is still in the match.
    pub alive: bool,
}

impl ArenaSnapshot {
    /// Projects the current arena state.
    #[must_use]
    pub fn capture(world: &World, roster: &Roster) -> Self {
        let grid = query::grid(world);
        let pos = |cell: Coord| grid.position_of(cell);

        Self {
            map: MapSnapshot {
                width: grid.width(),
                height: grid.height(),
                walls: query::walls(world).map(pos).collect(),
            },
            players: roster
                .iter()
                .map(|player| PlayerSnapshot {
                    id: player.id().get(),
                    pos: pos(player.cell()),
                    alive: player.alive(),
                })
                .collect(),
            fires: query::fires(world)
                .into_iter()
                .flat_map(|fire| fire.tiles)
                .map(pos)
                .collect(),
            bombs: query::bombs(world)
                .into_iter()
                .map(|bomb| pos(bomb.cell))
                .collect(),
            boxes: query::boxes(world).iter().copied().map(pos).collect(),
        }
    }

    /// Serializes the snapshot as a single JSON object.
    pub fn to_json(&self) -> AnyResult<String> {
        serde_json::to_string(self).context("failed to serialize arena snapshot")
    }

    /// Parses a snapshot previously produced by [`ArenaSnapshot::to_json`].
    pub fn from_json(json: &str) -> AnyResult<Self> {
        serde_json::from_str(json).context("failed to parse arena snapshot")
    }
}

const EMPTY_GLYPH: char = ' ';
const WALL_GLYPH: char = '|';
const BOMB_GLYPH: char = 'b';
const FIRE_GLYPH: char = 'f';
const BOX_GLYPH: char = 'X';
const FRAME_TOP_GLYPH: char = '-';
const FRAME_SIDE_GLYPH: char = '|';

/// Character grid of the arena, framed by a one-tile border.
///
/// Layers are drawn walls, players, bombs, fires and boxes, later layers
/// overwriting earlier ones. Players are drawn as their roster index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextGrid {
    rows: Vec<Vec<char>>,
}

impl TextGrid {
    /// Draws the current arena state.
    #[must_use]
    pub fn capture(world: &World, roster: &Roster) -> Self {
        let grid = query::grid(world);
        let mut canvas = Canvas::new(grid);

        for wall in query::walls(world) {
            canvas.draw(wall, WALL_GLYPH);
        }
        for (index, player) in roster.iter().enumerate() {
            let glyph = u32::try_from(index)
                .ok()
                .and_then(|index| char::from_digit(index, 10))
                .unwrap_or('?');
            canvas.draw(player.cell(), glyph);
        }
        for bomb in query::bombs(world) {
            canvas.draw(bomb.cell, BOMB_GLYPH);
        }
        for fire in query::fires(world) {
            for cell in fire.tiles {
                canvas.draw(cell, FIRE_GLYPH);
            }
        }
        for cell in query::boxes(world) {
            canvas.draw(*cell, BOX_GLYPH);
        }

        Self {
            rows: canvas.framed(),
        }
    }

    /// Rows of the framed grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.rows.iter().map(|row| row.iter().collect())
    }
}

impl fmt::Display for TextGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.rows().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            f.write_str(&row)?;
        }
        Ok(())
    }
}

struct Canvas<'a> {
    grid: &'a Grid,
    cells: Vec<Vec<char>>,
}

impl<'a> Canvas<'a> {
    fn new(grid: &'a Grid) -> Self {
        let width = grid.width() as usize;
        let height = grid.height() as usize;
        Self {
            grid,
            cells: vec![vec![EMPTY_GLYPH; width]; height],
        }
    }

    /// Cells outside the arena are ignored.
    fn draw(&mut self, cell: Coord, glyph: char) {
        if !self.grid.contains(cell) {
            return;
        }
        let (Ok(x), Ok(y)) = (usize::try_from(cell.x()), usize::try_from(cell.y())) else {
            return;
        };
        if let Some(slot) = self.cells.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = glyph;
        }
    }

    fn framed(self) -> Vec<Vec<char>> {
        let border = vec![FRAME_TOP_GLYPH; self.grid.width() as usize + 2];
        let mut rows = Vec::with_capacity(self.cells.len() + 2);
        rows.push(border.clone());
        for row in self.cells {
            let mut framed = Vec::with_capacity(row.len() + 2);
            framed.push(FRAME_SIDE_GLYPH);
            framed.extend(row);
            framed.push(FRAME_SIDE_GLYPH);
            rows.push(framed);
        }
        rows.push(border);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blast_arena_core::{BombId, Player, PlayerId};
    use blast_arena_world::ArenaConfig;
    use serde_json::json;

    fn arena(players: u32, width: u32, height: u32) -> (World, Roster) {
        let mut roster = Roster::new(
            (0..players)
                .map(|id| Player::new(PlayerId::new(id), 2, 1))
                .collect(),
        )
        .expect("distinct ids");
        let config = ArenaConfig::new(width, height).with_box_density(0.0);
        let world = World::generate(&config, &mut roster).expect("valid arena");
        (world, roster)
    }

    #[test]
    fn empty_arena_draws_the_lattice_inside_a_frame() {
        let (world, roster) = arena(2, 5, 5);
        let expected = [
            "-------", "|0   1|", "| | | |", "|     |", "| | | |", "|     |", "-------",
        ]
        .join("\n");
        assert_eq!(TextGrid::capture(&world, &roster).to_string(), expected);
    }

    #[test]
    fn later_layers_overwrite_earlier_ones() {
        let (mut world, mut roster) = arena(1, 5, 3);
        let player = PlayerId::new(0);
        let _ = world.place_bomb(&mut roster, player).expect("budget left");
        let grid = TextGrid::capture(&world, &roster);
        assert_eq!(grid.rows().nth(1).as_deref(), Some("|b    |"));

        let _ = world
            .explode_bomb(&roster, BombId::new(0))
            .expect("live bomb");
        let rows: Vec<String> = TextGrid::capture(&world, &roster).rows().collect();
        assert_eq!(rows[1], "|ff   |");
        assert_eq!(rows[2], "|f| | |");
    }

    #[test]
    fn fires_outside_the_arena_are_not_drawn() {
        let (mut world, roster) = arena(1, 3, 1);
        let _ = world
            .spawn_fire(&roster, PlayerId::new(0), Coord::new(-1, 0))
            .expect("known player");
        assert_eq!(TextGrid::capture(&world, &roster).to_string(), "-----\n|f  |\n-----");
    }

    #[test]
    fn snapshot_uses_linear_positions() {
        let (mut world, mut roster) = arena(2, 5, 3);
        let _ = world
            .place_bomb(&mut roster, PlayerId::new(1))
            .expect("budget left");
        let _ = world
            .spawn_fire(&roster, PlayerId::new(0), Coord::new(2, 2))
            .expect("known player");

        let snapshot = ArenaSnapshot::capture(&world, &roster);
        let value: serde_json::Value =
            serde_json::from_str(&snapshot.to_json().expect("serializable")).expect("valid json");
        assert_eq!(
            value,
            json!({
                "map": { "width": 5, "height": 3, "walls": [6, 8] },
                "players": [
                    { "id": 0, "pos": 0, "alive": true },
                    { "id": 1, "pos": 4, "alive": true },
                ],
                "fires": [11, 7, 12, 13],
                "bombs": [4],
                "boxes": [],
            })
        );
    }

    #[test]
    fn snapshot_parses_back() {
        let (world, roster) = arena(4, 7, 7);
        let snapshot = ArenaSnapshot::capture(&world, &roster);
        let json = snapshot.to_json().expect("serializable");
        assert_eq!(ArenaSnapshot::from_json(&json).expect("parses"), snapshot);
        assert!(ArenaSnapshot::from_json("{\"map\": 3}").is_err());
    }
}
