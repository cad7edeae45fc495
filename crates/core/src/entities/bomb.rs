//! Planted bombs and their store

use crate::core_types::{Coord, Millis};
use crate::entities::player::PlayerId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique (per simulation) bomb identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BombId(u64);

impl BombId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        BombId(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BombId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bomb#{}", self.0)
    }
}

/// A live bomb
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bomb {
    id: BombId,
    owner: PlayerId,
    position: Coord,
    /// Captured from the owner at placement; later pickups don't change it
    range: u32,
    planted_at: Millis,
    fuse: Millis,
    /// Already queued for a chain detonation
    chain_pending: bool,
}

impl Bomb {
    #[must_use]
    pub fn id(&self) -> BombId {
        self.id
    }

    #[must_use]
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    #[must_use]
    pub fn position(&self) -> Coord {
        self.position
    }

    #[must_use]
    pub fn range(&self) -> u32 {
        self.range
    }

    #[must_use]
    pub fn planted_at(&self) -> Millis {
        self.planted_at
    }

    /// Fuse expiry timestamp
    #[must_use]
    pub fn detonates_at(&self) -> Millis {
        self.planted_at + self.fuse
    }

    #[must_use]
    pub fn is_chain_pending(&self) -> bool {
        self.chain_pending
    }
}

/// Live bombs, indexed by id and by position
#[derive(Debug, Default)]
pub struct BombStore {
    bombs: FxHashMap<BombId, Bomb>,
    by_position: FxHashMap<Coord, BombId>,
    next_id: u64,
}

impl BombStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plant a bomb. Returns `None` if `position` already holds one.
    pub fn plant(
        &mut self,
        owner: PlayerId,
        position: Coord,
        range: u32,
        planted_at: Millis,
        fuse: Millis,
    ) -> Option<BombId> {
        if self.by_position.contains_key(&position) {
            return None;
        }
        let id = BombId(self.next_id);
        self.next_id += 1;
        self.bombs.insert(
            id,
            Bomb {
                id,
                owner,
                position,
                range,
                planted_at,
                fuse,
                chain_pending: false,
            },
        );
        self.by_position.insert(position, id);
        Some(id)
    }

    #[must_use]
    pub fn get(&self, id: BombId) -> Option<&Bomb> {
        self.bombs.get(&id)
    }

    /// Bomb at `position`, if any
    #[must_use]
    pub fn at(&self, position: Coord) -> Option<&Bomb> {
        self.by_position.get(&position).and_then(|id| self.bombs.get(id))
    }

    #[must_use]
    pub fn contains(&self, id: BombId) -> bool {
        self.bombs.contains_key(&id)
    }

    /// Remove a bomb; removing an absent id returns `None`
    pub fn remove(&mut self, id: BombId) -> Option<Bomb> {
        let bomb = self.bombs.remove(&id)?;
        self.by_position.remove(&bomb.position);
        Some(bomb)
    }

    /// Flag a bomb for chain detonation. Returns `true` only the first time,
    /// so each bomb is queued at most once.
    pub fn mark_chain_pending(&mut self, id: BombId) -> bool {
        match self.bombs.get_mut(&id) {
            Some(bomb) if !bomb.chain_pending => {
                bomb.chain_pending = true;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bombs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bombs.is_empty()
    }

    /// Bombs in id (placement) order
    #[must_use]
    pub fn sorted(&self) -> Vec<&Bomb> {
        let mut bombs: Vec<&Bomb> = self.bombs.values().collect();
        bombs.sort_by_key(|b| b.id);
        bombs
    }

    /// Drop all bombs; ids keep increasing across rounds
    pub fn clear(&mut self) {
        self.bombs.clear();
        self.by_position.clear();
    }
}
