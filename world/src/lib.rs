#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative arena state for Blast Arena.
//!
//! The [`World`] owns the static pillar lattice, the spawn assignment, the
//! destructible boxes and the id-keyed bomb and fire registries. Player
//! records stay with the driver in a [`Roster`] that is lent to every call;
//! the world only writes the fields documented on [`blast_arena_core::Player`].

mod fire;
mod generation;
mod grid;
mod registry;
mod tiles;

use std::collections::BTreeSet;

use blast_arena_core::{
    ArenaError, BombId, Command, Coord, Direction, EntityRef, Event, FireId, PlayerId, Roster,
    Tile, MAX_PLAYERS,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

pub use fire::FireCoverage;
pub use generation::ArenaConfig;
pub use grid::Grid;

use registry::{BombState, FireState, Registry};
use tiles::TileResolver;

/// Fire created by [`World::spawn_fire`] or [`World::explode_bomb`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnedFire {
    /// Identifier allocated to the fire.
    pub id: FireId,
    /// Player credited with the fire.
    pub owner: PlayerId,
    /// Tile the blast started from.
    pub origin: Coord,
    /// Tiles covered and boxes that stopped the blast.
    pub coverage: FireCoverage,
}

/// Represents the authoritative arena state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    walls: BTreeSet<Coord>,
    spawns: Vec<Coord>,
    boxes: Vec<Coord>,
    bombs: Registry<BombId, BombState>,
    fires: Registry<FireId, FireState>,
}

impl World {
    /// Generates a fresh arena and seats every roster player on a spawn point.
    ///
    /// Seating sets each player's cell and marks them alive. Randomness is
    /// drawn from the configured seed: the spawn shuffle first (when enabled),
    /// then box sampling.
    pub fn generate(config: &ArenaConfig, roster: &mut Roster) -> Result<Self, ArenaError> {
        let grid = config.grid()?;
        let density = config.validated_density()?;
        if roster.len() > MAX_PLAYERS {
            return Err(ArenaError::TooManyPlayers {
                count: roster.len(),
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed());
        let walls = generation::wall_lattice(&grid);
        let spawns = generation::corner_spawns(&grid, config.randomize_spawns(), &mut rng);

        for (player, spawn) in roster.iter_mut().zip(spawns.iter()) {
            player.place_at(*spawn);
            player.set_alive(true);
        }

        let seated: Vec<Coord> = roster.iter().map(|player| player.cell()).collect();
        let candidates = generation::box_candidates(&grid, &walls, &seated);
        let boxes = generation::scatter_boxes(&candidates, density, &mut rng);

        info!(
            width = grid.width(),
            height = grid.height(),
            walls = walls.len(),
            boxes = boxes.len(),
            players = roster.len(),
            seed = config.seed(),
            "arena generated"
        );

        Ok(Self {
            grid,
            walls,
            spawns,
            boxes,
            bombs: Registry::new(),
            fires: Registry::new(),
        })
    }

    fn resolver<'a>(&'a self, roster: &'a Roster) -> TileResolver<'a> {
        TileResolver {
            grid: &self.grid,
            walls: &self.walls,
            boxes: &self.boxes,
            roster,
        }
    }

    /// Classifies `cell` as player, wall, box or empty, in that priority.
    ///
    /// Tiles outside the map are walls. Bombs and fires do not affect the result.
    #[must_use]
    pub fn classify(&self, roster: &Roster, cell: Coord) -> Tile {
        self.resolver(roster).classify(cell)
    }

    /// Reports whether `cell` is empty and may be entered.
    #[must_use]
    pub fn can_move_to(&self, roster: &Roster, cell: Coord) -> bool {
        self.classify(roster, cell) == Tile::Empty
    }

    /// Tiles a blast of `power` starting at `origin` would cover right now.
    #[must_use]
    pub fn fire_coverage(&self, roster: &Roster, origin: Coord, power: u32) -> FireCoverage {
        fire::propagate(&self.resolver(roster), origin, power)
    }

    /// Drops a bomb on the player's current tile and spends one unit of their budget.
    pub fn place_bomb(&mut self, roster: &mut Roster, player: PlayerId) -> Result<BombId, ArenaError> {
        let record = roster.require_mut(player)?;
        if !record.alive() {
            return Err(ArenaError::PlayerEliminated { player });
        }
        record.spend_bomb()?;

        let cell = record.cell();
        let bomb = self.bombs.insert(BombState {
            owner: player,
            cell,
        });
        debug!(%bomb, %player, %cell, remaining = record.bombs_remaining(), "bomb placed");
        Ok(bomb)
    }

    /// Starts a fire at `cell` sized by the player's current power.
    pub fn spawn_fire(
        &mut self,
        roster: &Roster,
        player: PlayerId,
        cell: Coord,
    ) -> Result<SpawnedFire, ArenaError> {
        let power = roster.require(player)?.power();
        let coverage = self.fire_coverage(roster, cell, power);
        let id = self.fires.insert(FireState {
            owner: player,
            origin: cell,
            tiles: coverage.tiles().clone(),
        });
        debug!(fire = %id, %player, origin = %cell, tiles = coverage.tiles().len(), "fire spawned");
        Ok(SpawnedFire {
            id,
            owner: player,
            origin: cell,
            coverage,
        })
    }

    /// Replaces a bomb with a fire at the bomb's tile.
    ///
    /// The owner's budget stays spent until the resulting fire is cleared.
    pub fn explode_bomb(&mut self, roster: &Roster, bomb: BombId) -> Result<SpawnedFire, ArenaError> {
        let state = self
            .bombs
            .get(bomb)
            .cloned()
            .ok_or(ArenaError::UnknownEntity(EntityRef::Bomb(bomb)))?;
        let fire = self.spawn_fire(roster, state.owner, state.cell)?;
        let _ = self.bombs.remove(bomb);
        debug!(%bomb, fire = %fire.id, "bomb exploded");
        Ok(fire)
    }

    /// Removes a fire and refunds one bomb to its owner. Returns the owner.
    pub fn clear_fire(&mut self, roster: &mut Roster, fire: FireId) -> Result<PlayerId, ArenaError> {
        let owner = self
            .fires
            .get(fire)
            .map(|state| state.owner)
            .ok_or(ArenaError::UnknownEntity(EntityRef::Fire(fire)))?;
        let record = roster.require_mut(owner)?;
        record.refund_bomb();
        let _ = self.fires.remove(fire);
        debug!(%fire, player = %owner, remaining = record.bombs_remaining(), "fire cleared");
        Ok(owner)
    }

    /// Removes the box on `cell`.
    pub fn destroy_box(&mut self, cell: Coord) -> Result<(), ArenaError> {
        let index = self
            .boxes
            .iter()
            .position(|candidate| *candidate == cell)
            .ok_or(ArenaError::UnknownEntity(EntityRef::Box(cell)))?;
        let _ = self.boxes.remove(index);
        debug!(%cell, "box destroyed");
        Ok(())
    }

    /// Moves a live player one tile if the destination is empty. Returns the new tile.
    pub fn move_player(
        &self,
        roster: &mut Roster,
        player: PlayerId,
        direction: Direction,
    ) -> Result<Coord, ArenaError> {
        let record = roster.require(player)?;
        if !record.alive() {
            return Err(ArenaError::PlayerEliminated { player });
        }
        let target = record.cell().step(direction);
        if !self.can_move_to(roster, target) {
            return Err(ArenaError::TileBlocked { cell: target });
        }
        roster.require_mut(player)?.place_at(target);
        Ok(target)
    }
}

/// Takes a player out of the match. Eliminating a dead player is a no-op.
pub fn eliminate_player(roster: &mut Roster, player: PlayerId) -> Result<bool, ArenaError> {
    let record = roster.require_mut(player)?;
    let was_alive = record.alive();
    record.set_alive(false);
    Ok(was_alive)
}

/// Applies the provided command, reporting outcomes as events.
///
/// Failed commands leave world and roster untouched and produce a single
/// [`Event::CommandRejected`].
pub fn apply(world: &mut World, roster: &mut Roster, command: Command, out_events: &mut Vec<Event>) {
    if let Err(reason) = execute(world, roster, command, out_events) {
        warn!(?command, %reason, "command rejected");
        out_events.push(Event::CommandRejected { command, reason });
    }
}

fn execute(
    world: &mut World,
    roster: &mut Roster,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), ArenaError> {
    match command {
        Command::PlaceBomb { player } => {
            let bomb = world.place_bomb(roster, player)?;
            let cell = roster.require(player)?.cell();
            out_events.push(Event::BombPlaced {
                bomb,
                owner: player,
                cell,
            });
        }
        Command::ExplodeBomb { bomb } => {
            let fire = world.explode_bomb(roster, bomb)?;
            out_events.push(Event::BombExploded { bomb, fire: fire.id });
            out_events.push(fire_spawned(fire));
        }
        Command::SpawnFire { player, cell } => {
            let fire = world.spawn_fire(roster, player, cell)?;
            out_events.push(fire_spawned(fire));
        }
        Command::ClearFire { fire } => {
            let owner = world.clear_fire(roster, fire)?;
            out_events.push(Event::FireCleared { fire, owner });
        }
        Command::DestroyBox { cell } => {
            world.destroy_box(cell)?;
            out_events.push(Event::BoxDestroyed { cell });
        }
        Command::EliminatePlayer { player } => {
            if eliminate_player(roster, player)? {
                debug!(%player, "player eliminated");
                out_events.push(Event::PlayerEliminated { player });
            }
        }
        Command::MovePlayer { player, direction } => {
            let from = roster.require(player)?.cell();
            let to = world.move_player(roster, player, direction)?;
            out_events.push(Event::PlayerMoved { player, from, to });
        }
    }
    Ok(())
}

fn fire_spawned(fire: SpawnedFire) -> Event {
    Event::FireSpawned {
        fire: fire.id,
        owner: fire.owner,
        origin: fire.origin,
        tiles: fire.coverage.tiles().iter().copied().collect(),
        blocking_boxes: fire.coverage.blocking_boxes().to_vec(),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Grid, World};
    use blast_arena_core::{BombId, Coord, FireId, PlayerId};

    /// Provides read-only access to the arena dimensions.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Pillar coordinates in ascending order.
    pub fn walls(world: &World) -> impl Iterator<Item = Coord> + '_ {
        world.walls.iter().copied()
    }

    /// All four corner spawns in seating order, seated or not.
    #[must_use]
    pub fn spawn_points(world: &World) -> &[Coord] {
        &world.spawns
    }

    /// Remaining boxes in generation order.
    #[must_use]
    pub fn boxes(world: &World) -> &[Coord] {
        &world.boxes
    }

    /// Captures the live bombs in ascending id order.
    #[must_use]
    pub fn bombs(world: &World) -> Vec<BombSnapshot> {
        world
            .bombs
            .iter()
            .map(|(id, state)| BombSnapshot {
                id,
                owner: state.owner,
                cell: state.cell,
            })
            .collect()
    }

    /// Captures the live fires in ascending id order.
    #[must_use]
    pub fn fires(world: &World) -> Vec<FireSnapshot> {
        world
            .fires
            .iter()
            .map(|(id, state)| FireSnapshot {
                id,
                owner: state.owner,
                origin: state.origin,
                tiles: state.tiles.iter().copied().collect(),
            })
            .collect()
    }

    /// Returns the lowest-id bomb lying on `cell`, if any.
    #[must_use]
    pub fn bomb_at(world: &World, cell: Coord) -> Option<BombId> {
        world
            .bombs
            .iter()
            .find(|(_, state)| state.cell == cell)
            .map(|(id, _)| id)
    }

    /// Immutable representation of a live bomb.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct BombSnapshot {
        /// Identifier allocated by the world.
        pub id: BombId,
        /// Player whose budget paid for the bomb.
        pub owner: PlayerId,
        /// Tile the bomb sits on.
        pub cell: Coord,
    }

    /// Immutable representation of a live fire.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct FireSnapshot {
        /// Identifier allocated by the world.
        pub id: FireId,
        /// Player refunded when the fire clears.
        pub owner: PlayerId,
        /// Tile the blast started from.
        pub origin: Coord,
        /// Covered tiles in ascending order.
        pub tiles: Vec<Coord>,
    }
}
