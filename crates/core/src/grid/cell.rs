//! Cell kinds stored on the arena grid

use crate::entities::player::Companion;
use serde::{Deserialize, Serialize};

/// Collectible powerup kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Raises current and base speed
    SpeedBoost,
    /// +1 bomb range
    RangeUp,
    /// +1 simultaneous bomb
    ExtraBomb,
    /// Owl companion (fast)
    PetOwl,
    /// Turtle companion (slow)
    PetTurtle,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 5] = [
        PowerupKind::SpeedBoost,
        PowerupKind::RangeUp,
        PowerupKind::ExtraBomb,
        PowerupKind::PetOwl,
        PowerupKind::PetTurtle,
    ];

    /// Non-companion kinds, drawn uniformly by the random spawner
    pub const BUFFS: [PowerupKind; 3] = [
        PowerupKind::SpeedBoost,
        PowerupKind::RangeUp,
        PowerupKind::ExtraBomb,
    ];

    /// Companion granted by this powerup, if any
    #[must_use]
    pub const fn companion(self) -> Option<Companion> {
        match self {
            PowerupKind::PetOwl => Some(Companion::Owl),
            PowerupKind::PetTurtle => Some(Companion::Turtle),
            PowerupKind::SpeedBoost | PowerupKind::RangeUp | PowerupKind::ExtraBomb => None,
        }
    }

    #[must_use]
    pub const fn is_companion(self) -> bool {
        self.companion().is_some()
    }
}

/// State of one grid coordinate
///
/// Terrain (`Empty`, `Wall`, `Grass`), transient (`GrassBreaking`, `Bomb`,
/// `Explosion`) and pickup (`Powerup`) states share one slot, so a coordinate
/// never holds two markers at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    /// Indestructible, only on both-even coordinates
    Wall,
    /// Destructible, blocks movement and blasts
    Grass,
    /// Grass hit by a blast; blocks movement until it clears
    GrassBreaking,
    /// Occupied by a planted bomb
    Bomb,
    /// Live blast footprint
    Explosion,
    Powerup(PowerupKind),
}

impl Cell {
    /// Whether a player may not step onto this cell
    #[must_use]
    pub const fn blocks_movement(self) -> bool {
        matches!(
            self,
            Cell::Wall | Cell::Bomb | Cell::Grass | Cell::GrassBreaking
        )
    }

    #[must_use]
    pub const fn powerup(self) -> Option<PowerupKind> {
        match self {
            Cell::Powerup(kind) => Some(kind),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}
