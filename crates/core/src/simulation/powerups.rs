//! Powerup pickups and spawning
//!
//! Each [`PowerupKind`] maps to one [`PickupEffect`]. Spawned kinds are drawn
//! with companions pooled into a single outcome: first roll
//! `companion_draw_chance` for "some companion" (then owl or turtle 50/50),
//! otherwise pick one of [`PowerupKind::BUFFS`] uniformly.

use super::events::{ArenaEvent, SpawnSource};
use super::scheduler::ScheduledEffect;
use super::ArenaSimulation;
use crate::config::ArenaConfig;
use crate::core_types::{Coord, Millis};
use crate::entities::{Companion, Player};
use crate::grid::{Cell, PowerupKind};
use rand::Rng;
use tracing::debug;

/// Stat change applied to the collecting player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickupEffect {
    /// Added to both current and base speed
    Speed(f32),
    Range(u32),
    Bombs(u32),
    /// Equip a companion, overriding current speed while held
    Equip(Companion),
}

impl PickupEffect {
    #[must_use]
    pub fn for_kind(kind: PowerupKind, config: &ArenaConfig) -> Self {
        match kind {
            PowerupKind::SpeedBoost => PickupEffect::Speed(config.speed_boost_increment),
            PowerupKind::RangeUp => PickupEffect::Range(1),
            PowerupKind::ExtraBomb => PickupEffect::Bombs(1),
            PowerupKind::PetOwl => PickupEffect::Equip(Companion::Owl),
            PowerupKind::PetTurtle => PickupEffect::Equip(Companion::Turtle),
        }
    }

    pub fn apply(self, player: &mut Player, config: &ArenaConfig) {
        match self {
            PickupEffect::Speed(delta) => {
                player.speed += delta;
                player.base_speed += delta;
            }
            PickupEffect::Range(delta) => player.bomb_range += delta,
            PickupEffect::Bombs(delta) => player.max_bombs += delta,
            PickupEffect::Equip(companion) => {
                player.companion = Some(companion);
                player.speed = companion.speed(config);
            }
        }
    }
}

/// Draw a random powerup kind
pub fn draw_powerup<R: Rng + ?Sized>(rng: &mut R, companion_chance: f64) -> PowerupKind {
    if rng.random_bool(companion_chance) {
        if rng.random_bool(0.5) {
            PowerupKind::PetOwl
        } else {
            PowerupKind::PetTurtle
        }
    } else {
        PowerupKind::BUFFS[rng.random_range(0..PowerupKind::BUFFS.len())]
    }
}

impl ArenaSimulation {
    /// Place a random powerup at `coord` if the cell is Empty.
    ///
    /// Returns the spawned kind; any other cell leaves the grid unchanged.
    pub fn try_spawn_powerup(
        &mut self,
        coord: Coord,
        source: SpawnSource,
    ) -> Option<PowerupKind> {
        if self.grid.get(coord) != Some(Cell::Empty) {
            debug!(%coord, ?source, "powerup spawn discarded, cell not empty");
            return None;
        }
        let kind = draw_powerup(&mut self.rng, self.config.companion_draw_chance);
        self.grid.set(coord, Cell::Powerup(kind));
        debug!(%coord, ?kind, ?source, "powerup spawned");
        self.events.push(ArenaEvent::PowerupSpawned {
            position: coord,
            kind,
            source,
        });
        Some(kind)
    }

    /// Periodic ambient roll; reschedules itself one interval later
    pub(crate) fn ambient_powerup_roll(&mut self, at: Millis) {
        if self.rng.random_bool(self.config.ambient_powerup_chance) {
            let size = self.grid.size();
            let x = self.rng.random_range(0..size);
            let y = self.rng.random_range(0..size);
            self.try_spawn_powerup(Coord::new(x, y), SpawnSource::Ambient);
        }
        self.scheduler.schedule(
            at + self.config.ambient_powerup_interval,
            ScheduledEffect::AmbientPowerupRoll,
        );
    }
}
