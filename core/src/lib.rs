#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Blast Arena engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Drivers submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Player records live in a [`Roster`] owned by
//! the driver and lent to the world for the duration of each call.

use std::{
    fmt,
    ops::{Add, Sub},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of players the corner spawn scheme can seat.
pub const MAX_PLAYERS: usize = 4;

/// Cardinal directions used for movement and blast propagation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing `y`.
    North,
    /// Toward increasing `x`.
    East,
    /// Toward increasing `y`.
    South,
    /// Toward decreasing `x`.
    West,
}

impl Direction {
    /// Every direction in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit vector of the direction expressed as `(dx, dy)`.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Integer grid coordinate. Values outside the map are legal and classify as walls.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coord {
    x: i32,
    y: i32,
}

impl Coord {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Moves `steps` tiles along `direction`.
    #[must_use]
    pub fn offset(self, direction: Direction, steps: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x.saturating_add(dx.saturating_mul(steps)),
            y: self.y.saturating_add(dy.saturating_mul(steps)),
        }
    }

    /// Neighbouring coordinate one tile along `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        self.offset(direction, 1)
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, other: Coord) -> Coord {
        Coord::new(
            self.x.saturating_add(other.x),
            self.y.saturating_add(other.y),
        )
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, other: Coord) -> Coord {
        Coord::new(
            self.x.saturating_sub(other.x),
            self.y.saturating_sub(other.y),
        )
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Identifier assigned to a player by the driver, not by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier allocated to a live bomb by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BombId(u64);

impl BombId {
    /// Creates a new bomb identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Identifier allocated to a live fire by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FireId(u64);

impl FireId {
    /// Creates a new fire identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

macro_rules! display_id {
    ($($id:ty => $prefix:literal),* $(,)?) => {
        $(
            impl fmt::Display for $id {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, concat!($prefix, "#{}"), self.0)
                }
            }
        )*
    };
}

display_id!(PlayerId => "player", BombId => "bomb", FireId => "fire");

/// Classification of a single tile, evaluated by the world in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Walkable floor that blasts pass through.
    Empty,
    /// Indestructible pillar or anything outside the map.
    Wall,
    /// Destructible obstacle that stops a blast.
    Box,
    /// Tile occupied by a player; blasts pass through it.
    Player,
}

/// Player record lent to the world by the driver.
///
/// The world writes `cell`, `alive` and `bombs_remaining` and only reads
/// `power`. Every other change belongs to the driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    cell: Coord,
    alive: bool,
    power: u32,
    bombs_remaining: u32,
}

impl Player {
    /// Creates an unseated player; the world places it on a spawn point.
    #[must_use]
    pub const fn new(id: PlayerId, power: u32, bombs_remaining: u32) -> Self {
        Self {
            id,
            cell: Coord::new(0, 0),
            alive: false,
            power,
            bombs_remaining,
        }
    }

    /// Identifier assigned by the driver.
    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    /// Tile the player currently occupies.
    #[must_use]
    pub const fn cell(&self) -> Coord {
        self.cell
    }

    /// Whether the player is still in the match.
    #[must_use]
    pub const fn alive(&self) -> bool {
        self.alive
    }

    /// Blast length of bombs this player places, origin included.
    #[must_use]
    pub const fn power(&self) -> u32 {
        self.power
    }

    /// Bombs the player may still place before a fire of theirs is cleared.
    #[must_use]
    pub const fn bombs_remaining(&self) -> u32 {
        self.bombs_remaining
    }

    /// Changes the blast power, e.g. after a pickup.
    pub fn set_power(&mut self, power: u32) {
        self.power = power;
    }

    /// Moves the player to `cell`. World-owned field.
    pub fn place_at(&mut self, cell: Coord) {
        self.cell = cell;
    }

    /// Marks the player alive or eliminated. World-owned field.
    pub fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }

    /// Consumes one unit of bomb budget. World-owned field.
    pub fn spend_bomb(&mut self) -> Result<(), ArenaError> {
        self.bombs_remaining = self
            .bombs_remaining
            .checked_sub(1)
            .ok_or(ArenaError::InsufficientBombBudget { player: self.id })?;
        Ok(())
    }

    /// Returns one unit of bomb budget. World-owned field.
    pub fn refund_bomb(&mut self) {
        self.bombs_remaining = self.bombs_remaining.saturating_add(1);
    }
}

/// Id-indexed table of players in driver-supplied order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    /// Builds a roster, rejecting duplicate player identifiers.
    pub fn new(players: Vec<Player>) -> Result<Self, ArenaError> {
        for (index, player) in players.iter().enumerate() {
            if players[..index].iter().any(|other| other.id == player.id) {
                return Err(ArenaError::DuplicatePlayer { player: player.id });
            }
        }
        Ok(Self { players })
    }

    /// Number of seated players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Reports whether the roster has no players.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Players in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Mutable players in roster order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Looks up a player by identifier.
    #[must_use]
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    /// Looks up a player by identifier for mutation.
    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.id == id)
    }

    /// Like [`Roster::get`], failing with [`ArenaError::UnknownEntity`].
    pub fn require(&self, id: PlayerId) -> Result<&Player, ArenaError> {
        self.get(id)
            .ok_or(ArenaError::UnknownEntity(EntityRef::Player(id)))
    }

    /// Like [`Roster::get_mut`], failing with [`ArenaError::UnknownEntity`].
    pub fn require_mut(&mut self, id: PlayerId) -> Result<&mut Player, ArenaError> {
        self.get_mut(id)
            .ok_or(ArenaError::UnknownEntity(EntityRef::Player(id)))
    }

    /// Reports whether any player, alive or not, stands on `cell`.
    #[must_use]
    pub fn occupies(&self, cell: Coord) -> bool {
        self.players.iter().any(|player| player.cell == cell)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Spends one unit of the player's budget to drop a bomb on their tile.
    PlaceBomb {
        /// Player placing the bomb.
        player: PlayerId,
    },
    /// Converts a live bomb into a fire at the bomb's tile.
    ExplodeBomb {
        /// Bomb to detonate.
        bomb: BombId,
    },
    /// Starts a fire at an arbitrary tile using the player's power.
    SpawnFire {
        /// Player credited with the fire.
        player: PlayerId,
        /// Origin of the blast.
        cell: Coord,
    },
    /// Removes an expired fire and refunds one bomb to its owner.
    ClearFire {
        /// Fire to remove.
        fire: FireId,
    },
    /// Removes a destructible box.
    DestroyBox {
        /// Tile holding the box.
        cell: Coord,
    },
    /// Takes a player out of the match.
    EliminatePlayer {
        /// Player to eliminate.
        player: PlayerId,
    },
    /// Moves a player one tile if the destination is empty.
    MovePlayer {
        /// Player attempting to move.
        player: PlayerId,
        /// Direction of travel.
        direction: Direction,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A bomb was placed and the owner's budget decremented.
    BombPlaced {
        /// Identifier allocated to the bomb.
        bomb: BombId,
        /// Player who placed it.
        owner: PlayerId,
        /// Tile the bomb sits on.
        cell: Coord,
    },
    /// A bomb detonated and was replaced by a fire.
    BombExploded {
        /// Bomb that was removed.
        bomb: BombId,
        /// Fire created in its place.
        fire: FireId,
    },
    /// A fire was created.
    FireSpawned {
        /// Identifier allocated to the fire.
        fire: FireId,
        /// Player credited with the fire.
        owner: PlayerId,
        /// Tile the blast started from.
        origin: Coord,
        /// Tiles covered by the blast, origin included, ascending.
        tiles: Vec<Coord>,
        /// Boxes that stopped the blast, at most one per direction.
        blocking_boxes: Vec<Coord>,
    },
    /// A fire expired and its owner regained one bomb.
    FireCleared {
        /// Fire that was removed.
        fire: FireId,
        /// Player whose budget was refunded.
        owner: PlayerId,
    },
    /// A box was destroyed.
    BoxDestroyed {
        /// Tile the box occupied.
        cell: Coord,
    },
    /// A player was eliminated.
    PlayerEliminated {
        /// Player that left the match.
        player: PlayerId,
    },
    /// A player moved one tile.
    PlayerMoved {
        /// Player that moved.
        player: PlayerId,
        /// Tile before the move.
        from: Coord,
        /// Tile after the move.
        to: Coord,
    },
    /// A command failed and left the world unchanged.
    CommandRejected {
        /// Command that was submitted.
        command: Command,
        /// Reason the world refused it.
        reason: ArenaError,
    },
}

/// Reference to an entity that a command addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityRef {
    /// A player in the roster.
    Player(PlayerId),
    /// A live bomb.
    Bomb(BombId),
    /// A live fire.
    Fire(FireId),
    /// A box, identified by its tile.
    Box(Coord),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player(id) => write!(f, "{id}"),
            Self::Bomb(id) => write!(f, "{id}"),
            Self::Fire(id) => write!(f, "{id}"),
            Self::Box(cell) => write!(f, "box at {cell}"),
        }
    }
}

/// Failures reported by world operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// The player tried to place a bomb with an empty budget.
    #[error("{player} has no bombs left to place")]
    InsufficientBombBudget {
        /// Player whose budget is exhausted.
        player: PlayerId,
    },
    /// Width or height is zero or too large to address with [`Coord`].
    #[error("map dimensions {width}x{height} are invalid")]
    InvalidMapDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Box density was not a finite fraction within `0.0..=1.0`.
    #[error("box density must lie within 0.0..=1.0")]
    InvalidBoxDensity,
    /// More players than corner spawns.
    #[error("{count} players requested but only four corner spawns exist")]
    TooManyPlayers {
        /// Number of players in the roster.
        count: usize,
    },
    /// Two roster entries share an identifier.
    #[error("{player} appears more than once in the roster")]
    DuplicatePlayer {
        /// Repeated identifier.
        player: PlayerId,
    },
    /// The command referred to an entity the world does not hold.
    #[error("unknown {0}")]
    UnknownEntity(EntityRef),
    /// The player is no longer alive.
    #[error("{player} has been eliminated")]
    PlayerEliminated {
        /// Player that was addressed.
        player: PlayerId,
    },
    /// A move targeted a tile that is not empty.
    #[error("tile {cell} is blocked")]
    TileBlocked {
        /// Destination of the rejected move.
        cell: Coord,
    },
}
