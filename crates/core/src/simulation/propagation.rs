//! Explosion propagation engine
//!
//! One propagation casts four cardinal rays from a detonating bomb:
//!
//! - out of bounds or Wall: the ray stops
//! - another live bomb: queued for a chain detonation, the cell explodes and
//!   the ray passes through
//! - Grass: becomes GrassBreaking (not Explosion), may queue a powerup, and
//!   stops the ray
//! - anything else: becomes Explosion
//!
//! Hits are resolved against the players as they stood before the blast,
//! once per player. A death ends the round and cancels this propagation's
//! chains and powerup spawns.

use super::events::ArenaEvent;
use super::scheduler::ScheduledEffect;
use super::ArenaSimulation;
use crate::core_types::{Coord, Direction, Millis};
use crate::entities::{Bomb, BombId, ExplosionId, PlayerId};
use crate::grid::Cell;
use rand::Rng;
use rustc_hash::FxHashSet;
use tracing::debug;

impl ArenaSimulation {
    /// Detonate `bomb_id` at time `at`. A bomb that is already gone is a no-op.
    pub(crate) fn detonate(&mut self, bomb_id: BombId, at: Millis, chained: bool) {
        let Some(bomb) = self.bombs.remove(bomb_id) else {
            debug!(bomb = %bomb_id, "detonation skipped, bomb already gone");
            return;
        };
        let owner = bomb.owner();
        let origin = bomb.position();
        let released = self.players[owner.index()].release_bomb(bomb_id);
        debug_assert!(released, "bomb {bomb_id} missing from its owner's list");

        let size = self.grid.size();
        let mut covered: FxHashSet<Coord> = FxHashSet::default();
        let mut cells = Vec::new();
        let mut chains = Vec::new();
        let mut spawns = Vec::new();

        self.mark_exploding(origin, &mut covered, &mut cells);

        for direction in Direction::ALL {
            for distance in 1..=bomb.range() as usize {
                let Some(coord) = origin.offset(direction, distance, size) else {
                    break;
                };
                let Some(cell) = self.grid.get(coord) else {
                    break;
                };
                if cell == Cell::Wall {
                    break;
                }

                if let Some(other) = self.bombs.at(coord).map(Bomb::id) {
                    if self.bombs.mark_chain_pending(other) {
                        chains.push(other);
                    }
                    self.mark_exploding(coord, &mut covered, &mut cells);
                    continue;
                }

                if cell == Cell::Grass {
                    self.grid.set(coord, Cell::GrassBreaking);
                    let drops_powerup = self.rng.random_bool(self.config.grass_powerup_chance);
                    if drops_powerup {
                        spawns.push(coord);
                    }
                    self.scheduler.schedule(
                        at + self.config.grass_break_duration,
                        ScheduledEffect::GrassBreakClear(coord),
                    );
                    self.events.push(ArenaEvent::GrassDestroyed {
                        position: coord,
                        drops_powerup,
                    });
                    break;
                }

                self.mark_exploding(coord, &mut covered, &mut cells);
            }
        }

        debug!(
            bomb = %bomb_id,
            %owner,
            %origin,
            chained,
            cells = cells.len(),
            chains = chains.len(),
            "bomb detonated"
        );
        self.events.push(ArenaEvent::BombDetonated {
            bomb: bomb_id,
            owner,
            position: origin,
            chained,
            cells: cells.clone(),
        });

        let targets: Vec<(PlayerId, PlayerId)> = self
            .players
            .iter()
            .filter(|p| p.is_alive() && !p.is_invulnerable(at) && covered.contains(&p.position()))
            .map(|p| (p.id(), owner))
            .collect();

        let clear_at = at + self.config.explosion_duration;
        let explosion = self.explosions.insert(owner, bomb_id, cells, clear_at);
        self.scheduler
            .schedule(clear_at, ScheduledEffect::ExplosionClear(explosion));

        if self.apply_hits(&targets, at) {
            self.check_round_end(at);
            return;
        }

        for chained_bomb in chains {
            self.scheduler.schedule(
                at + self.config.chain_delay,
                ScheduledEffect::ChainDetonation(chained_bomb),
            );
        }
        for coord in spawns {
            self.scheduler
                .schedule(clear_at, ScheduledEffect::PowerupSpawn(coord));
        }
    }

    fn mark_exploding(
        &mut self,
        coord: Coord,
        covered: &mut FxHashSet<Coord>,
        cells: &mut Vec<Coord>,
    ) {
        if covered.insert(coord) {
            self.grid.set(coord, Cell::Explosion);
            cells.push(coord);
        }
    }

    /// Resolve hits as `(victim, explosion owner)` pairs.
    ///
    /// A companion absorbs the hit; otherwise the victim dies and the owner
    /// is credited unless it is the victim. Returns whether anyone died.
    pub(crate) fn apply_hits(&mut self, targets: &[(PlayerId, PlayerId)], at: Millis) -> bool {
        let mut anyone_died = false;
        for &(victim, owner) in targets {
            let until = at + self.config.invulnerability_duration;
            let player = &mut self.players[victim.index()];
            if !player.is_alive() {
                continue;
            }

            if let Some(companion) = player.shed_companion(until) {
                debug!(player = %victim, ?companion, until = until.as_u64(), "companion lost");
                self.scheduler
                    .schedule(until, ScheduledEffect::InvulnerabilityExpiry(victim));
                self.events.push(ArenaEvent::CompanionLost {
                    player: victim,
                    companion,
                    invulnerable_until: until,
                });
                continue;
            }

            player.alive = false;
            anyone_died = true;
            let killer = (owner != victim).then_some(owner);
            if let Some(killer) = killer {
                self.players[killer.index()].kills += 1;
            }
            debug!(victim = %victim, ?killer, at = at.as_u64(), "player killed");
            self.events.push(ArenaEvent::PlayerKilled { victim, killer });
        }
        anyone_died
    }

    /// Players standing in a still-lethal footprint are hit, credited to the
    /// earliest covering explosion's owner.
    pub(crate) fn check_standing_hazards(&mut self) {
        let now = self.now;
        let targets: Vec<(PlayerId, PlayerId)> = self
            .players
            .iter()
            .filter(|p| p.is_alive() && !p.is_invulnerable(now))
            .filter_map(|p| {
                self.explosions
                    .owner_at(p.position(), now)
                    .map(|owner| (p.id(), owner))
            })
            .collect();

        if !targets.is_empty() && self.apply_hits(&targets, now) {
            self.check_round_end(now);
        }
    }

    /// Remove an explosion and revert cells no other live explosion covers
    pub(crate) fn clear_explosion(&mut self, id: ExplosionId) {
        let Some(explosion) = self.explosions.remove(id) else {
            return;
        };
        for &coord in explosion.coords() {
            if self.grid.get(coord) != Some(Cell::Explosion) || self.explosions.covers(coord) {
                continue;
            }
            let restored = if self.bombs.at(coord).is_some() {
                Cell::Bomb
            } else {
                Cell::Empty
            };
            self.grid.set(coord, restored);
        }
    }
}
