//! Discrete notifications emitted by the tick

use crate::core_types::{Coord, Millis};
use crate::entities::{BombId, Companion, PlayerId};
use crate::grid::PowerupKind;
use crate::simulation::round::RoundOutcome;
use serde::{Deserialize, Serialize};

/// Where a spawned powerup came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnSource {
    /// Left behind by destroyed grass
    Grass,
    /// Periodic random spawn
    Ambient,
}

/// Something observable that happened during a tick, in the order it happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArenaEvent {
    /// A new round began (terrain regenerated, players respawned)
    RoundReset { round: u32 },
    BombPlaced {
        player: PlayerId,
        bomb: BombId,
        position: Coord,
    },
    BombDetonated {
        bomb: BombId,
        owner: PlayerId,
        position: Coord,
        /// Set off by another explosion rather than its own fuse
        chained: bool,
        /// Coordinates turned into Explosion cells
        cells: Vec<Coord>,
    },
    GrassDestroyed {
        position: Coord,
        /// Whether a powerup will appear once the blast clears
        drops_powerup: bool,
    },
    PowerupCollected {
        player: PlayerId,
        kind: PowerupKind,
        position: Coord,
    },
    PowerupSpawned {
        position: Coord,
        kind: PowerupKind,
        source: SpawnSource,
    },
    /// A hit absorbed by a companion
    CompanionLost {
        player: PlayerId,
        companion: Companion,
        invulnerable_until: Millis,
    },
    InvulnerabilityEnded { player: PlayerId },
    PlayerKilled {
        victim: PlayerId,
        /// `None` for self-inflicted deaths
        killer: Option<PlayerId>,
    },
    /// Fires once per round
    GameOver {
        outcome: RoundOutcome,
        /// Delay before a "play again" prompt should appear
        prompt_delay: Millis,
    },
}

impl ArenaEvent {
    /// Whether this event ends the round
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        matches!(self, ArenaEvent::GameOver { .. })
    }
}
