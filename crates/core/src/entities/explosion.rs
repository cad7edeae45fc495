//! Live explosion footprints

use crate::core_types::{Coord, Millis};
use crate::entities::bomb::BombId;
use crate::entities::player::PlayerId;
use serde::{Deserialize, Serialize};

/// Unique (per simulation) explosion identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExplosionId(u64);

/// Cells affected by one propagation, until `clear_at`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explosion {
    id: ExplosionId,
    owner: PlayerId,
    source: BombId,
    coords: Vec<Coord>,
    clear_at: Millis,
}

impl Explosion {
    #[must_use]
    pub fn id(&self) -> ExplosionId {
        self.id
    }

    /// Owner of the bomb that produced this explosion
    #[must_use]
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    #[must_use]
    pub fn source(&self) -> BombId {
        self.source
    }

    #[must_use]
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    #[must_use]
    pub fn clear_at(&self) -> Millis {
        self.clear_at
    }

    #[must_use]
    pub fn covers(&self, coord: Coord) -> bool {
        self.coords.contains(&coord)
    }
}

/// Simultaneously live explosions, oldest first
///
/// Footprints may overlap; a coordinate stays covered until every explosion
/// containing it has cleared.
#[derive(Debug, Default)]
pub struct ExplosionSet {
    live: Vec<Explosion>,
    next_id: u64,
}

impl ExplosionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        owner: PlayerId,
        source: BombId,
        coords: Vec<Coord>,
        clear_at: Millis,
    ) -> ExplosionId {
        let id = ExplosionId(self.next_id);
        self.next_id += 1;
        self.live.push(Explosion {
            id,
            owner,
            source,
            coords,
            clear_at,
        });
        id
    }

    pub fn remove(&mut self, id: ExplosionId) -> Option<Explosion> {
        let idx = self.live.iter().position(|e| e.id == id)?;
        Some(self.live.remove(idx))
    }

    /// Whether any live explosion covers `coord`
    #[must_use]
    pub fn covers(&self, coord: Coord) -> bool {
        self.live.iter().any(|e| e.covers(coord))
    }

    /// Owner of the earliest explosion covering `coord` that is still lethal
    /// at `now`
    #[must_use]
    pub fn owner_at(&self, coord: Coord, now: Millis) -> Option<PlayerId> {
        self.live
            .iter()
            .find(|e| now < e.clear_at && e.covers(coord))
            .map(Explosion::owner)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Explosion> {
        self.live.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }
}
