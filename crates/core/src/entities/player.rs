//! Player records

use crate::config::ArenaConfig;
use crate::core_types::{Coord, Millis};
use crate::entities::bomb::BombId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two arena players
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    P1,
    P2,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::P1, PlayerId::P2];

    /// Storage slot (0 or 1)
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PlayerId::P1 => 0,
            PlayerId::P2 => 1,
        }
    }

    #[inline]
    #[must_use]
    pub const fn opponent(self) -> PlayerId {
        match self {
            PlayerId::P1 => PlayerId::P2,
            PlayerId::P2 => PlayerId::P1,
        }
    }

    /// Fixed spawn corner: P1 top-left, P2 bottom-right
    #[must_use]
    pub const fn spawn_point(self, grid_size: usize) -> Coord {
        match self {
            PlayerId::P1 => Coord::new(1, 1),
            PlayerId::P2 => Coord::new(grid_size - 2, grid_size - 2),
        }
    }

    /// Facing at round start (toward the arena centre)
    #[must_use]
    pub const fn spawn_orientation(self) -> Orientation {
        match self {
            PlayerId::P1 => Orientation::Right,
            PlayerId::P2 => Orientation::Left,
        }
    }

    /// Parse `p1`/`p2` (also `1`/`2`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "p1" | "1" => Some(PlayerId::P1),
            "p2" | "2" => Some(PlayerId::P2),
            _ => None,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::P1 => write!(f, "P1"),
            PlayerId::P2 => write!(f, "P2"),
        }
    }
}

/// Last horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Left,
    Right,
}

/// Equipped pet that absorbs one hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Companion {
    Owl,
    Turtle,
}

impl Companion {
    /// Speed multiplier imposed while this companion is held
    #[must_use]
    pub fn speed(self, config: &ArenaConfig) -> f32 {
        match self {
            Companion::Owl => config.owl_speed,
            Companion::Turtle => config.turtle_speed,
        }
    }
}

/// Player state
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub(crate) id: PlayerId,
    pub(crate) position: Coord,
    pub(crate) alive: bool,
    pub(crate) orientation: Orientation,
    /// Current speed multiplier (companion speed while one is held)
    pub(crate) speed: f32,
    /// Speed restored when a companion is lost
    pub(crate) base_speed: f32,
    pub(crate) bomb_range: u32,
    pub(crate) max_bombs: u32,
    /// `None` until the first move of the round
    pub(crate) last_move: Option<Millis>,
    /// Lethal effects are ignored while `now < invulnerable_until`
    pub(crate) invulnerable_until: Millis,
    pub(crate) companion: Option<Companion>,
    /// Cumulative across rounds
    pub(crate) kills: u32,
    /// Live bombs owned by this player, in placement order
    pub(crate) bombs: Vec<BombId>,
}

impl Player {
    /// Create a player at its spawn corner with the configured loadout
    #[must_use]
    pub fn spawn(id: PlayerId, config: &ArenaConfig) -> Self {
        let mut player = Player {
            id,
            position: id.spawn_point(config.grid_size),
            alive: true,
            orientation: id.spawn_orientation(),
            speed: config.initial_speed,
            base_speed: config.initial_speed,
            bomb_range: config.initial_bomb_range,
            max_bombs: config.initial_max_bombs,
            last_move: None,
            invulnerable_until: Millis::ZERO,
            companion: None,
            kills: 0,
            bombs: Vec::new(),
        };
        player.respawn(config);
        player
    }

    /// Reset position and stats for a new round; kills carry over
    pub fn respawn(&mut self, config: &ArenaConfig) {
        let loadout = config.loadout(self.id);
        self.position = self.id.spawn_point(config.grid_size);
        self.alive = true;
        self.orientation = self.id.spawn_orientation();
        self.base_speed = loadout.speed;
        self.speed = loadout
            .companion
            .map_or(loadout.speed, |companion| companion.speed(config));
        self.bomb_range = loadout.bomb_range;
        self.max_bombs = loadout.max_bombs;
        self.companion = loadout.companion;
        self.last_move = None;
        self.invulnerable_until = Millis::ZERO;
        self.bombs.clear();
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn position(&self) -> Coord {
        self.position
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[must_use]
    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    #[must_use]
    pub fn bomb_range(&self) -> u32 {
        self.bomb_range
    }

    #[must_use]
    pub fn max_bombs(&self) -> u32 {
        self.max_bombs
    }

    #[must_use]
    pub fn companion(&self) -> Option<Companion> {
        self.companion
    }

    #[must_use]
    pub fn kills(&self) -> u32 {
        self.kills
    }

    #[must_use]
    pub fn last_move(&self) -> Option<Millis> {
        self.last_move
    }

    #[must_use]
    pub fn invulnerable_until(&self) -> Millis {
        self.invulnerable_until
    }

    /// Live bomb ids, oldest first
    #[must_use]
    pub fn live_bombs(&self) -> &[BombId] {
        &self.bombs
    }

    #[must_use]
    pub fn is_invulnerable(&self, now: Millis) -> bool {
        now < self.invulnerable_until
    }

    #[must_use]
    pub fn invulnerability_remaining(&self, now: Millis) -> Millis {
        self.invulnerable_until - now
    }

    /// Whether another bomb may be planted right now
    #[must_use]
    pub fn has_bomb_capacity(&self) -> bool {
        self.bombs.len() < self.max_bombs as usize
    }

    /// Minimum time between moves at the current speed
    #[must_use]
    pub fn move_cooldown(&self, base_delay: Millis) -> Millis {
        base_delay.div_ceil_f32(self.speed)
    }

    /// Whether the move cooldown has elapsed at `now`
    #[must_use]
    pub fn can_move_at(&self, now: Millis, base_delay: Millis) -> bool {
        self.last_move
            .is_none_or(|last| now - last >= self.move_cooldown(base_delay))
    }

    /// Drop `bomb` from the live set; removing an absent id is a no-op
    pub(crate) fn release_bomb(&mut self, bomb: BombId) -> bool {
        let before = self.bombs.len();
        self.bombs.retain(|b| *b != bomb);
        before != self.bombs.len()
    }

    /// Absorb a hit with the companion: lose it, fall back to base speed and
    /// become invulnerable until `until`. Returns the lost companion.
    pub(crate) fn shed_companion(&mut self, until: Millis) -> Option<Companion> {
        let lost = self.companion.take()?;
        self.speed = self.base_speed;
        self.invulnerable_until = until;
        Some(lost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_defaults() {
        let config = ArenaConfig::default();
        let p1 = Player::spawn(PlayerId::P1, &config);
        let p2 = Player::spawn(PlayerId::P2, &config);

        assert_eq!(p1.position(), Coord::new(1, 1));
        assert_eq!(p2.position(), Coord::new(13, 13));
        assert_eq!(p1.orientation(), Orientation::Right);
        assert_eq!(p2.orientation(), Orientation::Left);
        assert_eq!(p1.max_bombs(), 1);
        assert_eq!(p1.bomb_range(), 1);
        assert_eq!(p1.speed(), 1.0);
        assert!(p1.companion().is_none());
        assert!(p1.has_bomb_capacity());
    }

    #[test]
    fn test_respawn_keeps_kills() {
        let config = ArenaConfig::default();
        let mut p1 = Player::spawn(PlayerId::P1, &config);
        p1.kills = 3;
        p1.alive = false;
        p1.position = Coord::new(5, 5);
        p1.bomb_range = 4;

        p1.respawn(&config);
        assert_eq!(p1.kills(), 3);
        assert!(p1.is_alive());
        assert_eq!(p1.position(), Coord::new(1, 1));
        assert_eq!(p1.bomb_range(), 1);
    }

    #[test]
    fn test_move_cooldown_tracks_speed() {
        let config = ArenaConfig::default();
        let mut p = Player::spawn(PlayerId::P1, &config);
        let base = Millis::new(200);

        assert!(p.can_move_at(Millis::ZERO, base));
        p.last_move = Some(Millis::new(1000));
        assert!(!p.can_move_at(Millis::new(1199), base));
        assert!(p.can_move_at(Millis::new(1200), base));

        p.speed = 2.0;
        assert!(p.can_move_at(Millis::new(1100), base));
    }

    #[test]
    fn test_shed_companion() {
        let config = ArenaConfig::default();
        let mut p = Player::spawn(PlayerId::P2, &config);
        assert_eq!(p.shed_companion(Millis::new(500)), None);
        assert_eq!(p.invulnerable_until(), Millis::ZERO);

        p.base_speed = 1.5;
        p.companion = Some(Companion::Turtle);
        p.speed = 0.8;
        assert_eq!(p.shed_companion(Millis::new(500)), Some(Companion::Turtle));
        assert_eq!(p.speed(), 1.5);
        assert!(p.is_invulnerable(Millis::new(499)));
        assert!(!p.is_invulnerable(Millis::new(500)));
    }

    #[test]
    fn test_release_bomb_is_idempotent() {
        let config = ArenaConfig::default();
        let mut p = Player::spawn(PlayerId::P1, &config);
        p.bombs.push(BombId::new(7));
        assert!(p.release_bomb(BombId::new(7)));
        assert!(!p.release_bomb(BombId::new(7)));
        assert!(p.live_bombs().is_empty());
    }
}
