//! Id-keyed storage for bombs and fires.

use std::collections::{BTreeMap, BTreeSet};

use blast_arena_core::{BombId, Coord, FireId, PlayerId};

/// Identifier types the registry can allocate.
pub(crate) trait RegistryId: Copy + Ord {
    fn from_raw(value: u64) -> Self;
    fn raw(self) -> u64;
}

impl RegistryId for BombId {
    fn from_raw(value: u64) -> Self {
        BombId::new(value)
    }

    fn raw(self) -> u64 {
        self.get()
    }
}

impl RegistryId for FireId {
    fn from_raw(value: u64) -> Self {
        FireId::new(value)
    }

    fn raw(self) -> u64 {
        self.get()
    }
}

/// Live bomb stored inside the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BombState {
    /// Player whose budget paid for the bomb.
    pub(crate) owner: PlayerId,
    /// Owner's tile at placement time.
    pub(crate) cell: Coord,
}

/// Live fire stored inside the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FireState {
    /// Player refunded when the fire clears.
    pub(crate) owner: PlayerId,
    /// Tile the blast started from.
    pub(crate) origin: Coord,
    /// Covered tiles, origin included.
    pub(crate) tiles: BTreeSet<Coord>,
}

/// Registry that stores entities and manages identifier allocation.
///
/// Iteration is in ascending id order, which matches insertion order because
/// every new id exceeds all live ones.
#[derive(Debug)]
pub(crate) struct Registry<I, T> {
    entries: BTreeMap<I, T>,
}

impl<I: RegistryId, T> Registry<I, T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Zero when empty, otherwise one past the largest live id.
    ///
    /// Freeing the current maximum makes its value available again.
    pub(crate) fn next_id(&self) -> I {
        self.entries
            .last_key_value()
            .map_or(I::from_raw(0), |(id, _)| {
                I::from_raw(id.raw().saturating_add(1))
            })
    }

    /// Stores `value` under a freshly allocated id.
    pub(crate) fn insert(&mut self, value: T) -> I {
        let id = self.next_id();
        let _ = self.entries.insert(id, value);
        id
    }

    pub(crate) fn get(&self, id: I) -> Option<&T> {
        self.entries.get(&id)
    }

    pub(crate) fn remove(&mut self, id: I) -> Option<T> {
        self.entries.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.entries.iter().map(|(id, value)| (*id, value))
    }
}
