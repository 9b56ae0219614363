#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure blast system that turns fire coverage into follow-up commands.
//!
//! The world only reports which tiles a fire covers and which boxes stopped
//! it. Deciding what burns is left to this system: boxes that blocked a blast
//! are destroyed, live players on covered tiles are eliminated, and bombs on
//! covered tiles detonate in turn.

use std::collections::BTreeSet;

use blast_arena_core::{BombId, Command, Coord, Event, PlayerId, Roster};

/// Blast system that translates fire events into destruction commands.
#[derive(Debug, Default, Clone)]
pub struct Blast;

impl Blast {
    /// Creates a new blast system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Consumes world events and emits commands for everything a fire touched.
    ///
    /// The `bomb_at` closure should mirror the semantics of the world's
    /// `query::bomb_at` helper. Each box, player and bomb is targeted at most
    /// once per call, even when several fires reach it.
    pub fn handle<F>(&self, events: &[Event], roster: &Roster, mut bomb_at: F, out: &mut Vec<Command>)
    where
        F: FnMut(Coord) -> Option<BombId>,
    {
        let mut boxes: BTreeSet<Coord> = BTreeSet::new();
        let mut players: BTreeSet<PlayerId> = BTreeSet::new();
        let mut bombs: BTreeSet<BombId> = BTreeSet::new();

        for event in events {
            let Event::FireSpawned {
                tiles,
                blocking_boxes,
                ..
            } = event
            else {
                continue;
            };

            for cell in blocking_boxes {
                if boxes.insert(*cell) {
                    out.push(Command::DestroyBox { cell: *cell });
                }
            }

            for player in roster.iter() {
                if player.alive() && tiles.contains(&player.cell()) && players.insert(player.id()) {
                    out.push(Command::EliminatePlayer { player: player.id() });
                }
            }

            for cell in tiles {
                if let Some(bomb) = bomb_at(*cell) {
                    if bombs.insert(bomb) {
                        out.push(Command::ExplodeBomb { bomb });
                    }
                }
            }
        }
    }
}
