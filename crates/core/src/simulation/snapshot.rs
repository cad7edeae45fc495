//! Immutable outbound view of the arena
//!
//! A snapshot owns copies of everything a renderer needs, so it can be held
//! across ticks without borrowing the simulation.

use crate::core_types::{Coord, Millis};
use crate::entities::{Companion, Orientation, Player, PlayerId};
use crate::grid::{ArenaGrid, Cell, PowerupKind};
use crate::simulation::round::RoundStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub position: Coord,
    pub alive: bool,
    pub orientation: Orientation,
    pub speed: f32,
    pub base_speed: f32,
    pub bomb_range: u32,
    pub max_bombs: u32,
    pub live_bombs: usize,
    pub companion: Option<Companion>,
    /// Zero when not invulnerable
    pub invulnerable_for: Millis,
    pub kills: u32,
}

impl PlayerSnapshot {
    pub(crate) fn capture(player: &Player, now: Millis) -> Self {
        PlayerSnapshot {
            id: player.id(),
            position: player.position(),
            alive: player.is_alive(),
            orientation: player.orientation(),
            speed: player.speed(),
            base_speed: player.base_speed(),
            bomb_range: player.bomb_range(),
            max_bombs: player.max_bombs(),
            live_bombs: player.live_bombs().len(),
            companion: player.companion(),
            invulnerable_for: player.invulnerability_remaining(now),
            kills: player.kills(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub now: Millis,
    pub frame: u64,
    pub round: u32,
    pub status: RoundStatus,
    pub grid: ArenaGrid,
    pub players: [PlayerSnapshot; 2],
}

impl ArenaSnapshot {
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &PlayerSnapshot {
        &self.players[id.index()]
    }

    #[must_use]
    pub fn cell(&self, coord: Coord) -> Option<Cell> {
        self.grid.get(coord)
    }

    /// Plain-text rendering, one row per line
    ///
    /// `#` wall, `%` grass, `,` breaking grass, `o` bomb, `*` explosion,
    /// `s`/`r`/`b`/`w`/`t` powerups, `1`/`2` live players, `x` dead player.
    #[must_use]
    pub fn render_text(&self) -> String {
        let size = self.grid.size();
        let mut out = String::with_capacity(size * (size + 1));
        for y in 0..size {
            for (x, cell) in self.grid.row(y).iter().enumerate() {
                let coord = Coord::new(x, y);
                let occupant = self.players.iter().find(|p| p.position == coord);
                let glyph = match occupant {
                    Some(p) if !p.alive => 'x',
                    Some(p) => match p.id {
                        PlayerId::P1 => '1',
                        PlayerId::P2 => '2',
                    },
                    None => cell_glyph(*cell),
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

fn cell_glyph(cell: Cell) -> char {
    match cell {
        Cell::Empty => '.',
        Cell::Wall => '#',
        Cell::Grass => '%',
        Cell::GrassBreaking => ',',
        Cell::Bomb => 'o',
        Cell::Explosion => '*',
        Cell::Powerup(PowerupKind::SpeedBoost) => 's',
        Cell::Powerup(PowerupKind::RangeUp) => 'r',
        Cell::Powerup(PowerupKind::ExtraBomb) => 'b',
        Cell::Powerup(PowerupKind::PetOwl) => 'w',
        Cell::Powerup(PowerupKind::PetTurtle) => 't',
    }
}
