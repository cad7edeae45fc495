//! Movement & collision resolver, bomb placement
//!
//! Intents that fail a precondition are dropped without touching any state.

use super::action_queue::{ExecutedIntent, IntentKind, PlayerIntent};
use super::events::ArenaEvent;
use super::powerups::PickupEffect;
use super::scheduler::ScheduledEffect;
use super::ArenaSimulation;
use crate::core_types::Direction;
use crate::entities::{Orientation, PlayerId};
use crate::grid::Cell;
use tracing::debug;

impl ArenaSimulation {
    /// Apply every pending intent in submission order. Only the first
    /// successful move per player counts within one tick.
    pub(crate) fn process_intents(&mut self) {
        let mut moved = [false; 2];
        for intent in self.intents.take_pending() {
            let applied = match intent.kind {
                IntentKind::Move(_) if moved[intent.player.index()] => false,
                IntentKind::Move(direction) => {
                    let ok = self.apply_move(intent.player, direction);
                    moved[intent.player.index()] = ok;
                    ok
                }
                IntentKind::PlaceBomb => self.apply_place_bomb(intent.player),
            };
            if applied {
                self.record_executed(intent);
            }
        }
    }

    fn record_executed(&mut self, intent: PlayerIntent) {
        self.intents.mark_executed(ExecutedIntent {
            intent,
            at: self.now,
            frame: self.frame,
        });
    }

    /// Step `id` one cell in `direction`. Returns whether the move happened.
    pub(crate) fn apply_move(&mut self, id: PlayerId, direction: Direction) -> bool {
        let now = self.now;
        let size = self.grid.size();
        let opponent = self.players[id.opponent().index()].position();
        let player = &self.players[id.index()];

        if !player.is_alive() {
            debug!(player = %id, "move rejected, dead");
            return false;
        }
        if !player.can_move_at(now, self.config.move_base_delay) {
            return false;
        }

        let target = player.position().step_clamped(direction, size);
        if target == opponent {
            debug!(player = %id, %target, "move rejected, opponent in the way");
            return false;
        }
        let Some(cell) = self.grid.get(target) else {
            return false;
        };
        if cell.blocks_movement() {
            debug!(player = %id, %target, ?cell, "move rejected, blocked");
            return false;
        }

        let player = &mut self.players[id.index()];
        if let Some(kind) = cell.powerup() {
            PickupEffect::for_kind(kind, &self.config).apply(player, &self.config);
            self.grid.set(target, Cell::Empty);
            debug!(player = %id, ?kind, %target, "powerup collected");
            self.events.push(ArenaEvent::PowerupCollected {
                player: id,
                kind,
                position: target,
            });
        }

        player.position = target;
        player.last_move = Some(now);
        match direction {
            Direction::Left => player.orientation = Orientation::Left,
            Direction::Right => player.orientation = Orientation::Right,
            Direction::Up | Direction::Down => {}
        }
        true
    }

    /// Plant a bomb under `id`. Returns whether a bomb was placed.
    pub(crate) fn apply_place_bomb(&mut self, id: PlayerId) -> bool {
        let now = self.now;
        let fuse = self.config.fuse_duration;
        let player = &self.players[id.index()];

        if !player.is_alive() || !player.has_bomb_capacity() {
            debug!(player = %id, live = player.live_bombs().len(), "bomb rejected");
            return false;
        }
        let position = player.position();
        let Some(bomb) = self
            .bombs
            .plant(id, position, player.bomb_range(), now, fuse)
        else {
            debug!(player = %id, %position, "bomb rejected, cell occupied");
            return false;
        };

        self.grid.set(position, Cell::Bomb);
        self.players[id.index()].bombs.push(bomb);
        self.scheduler
            .schedule(now + fuse, ScheduledEffect::FuseExpiry(bomb));
        debug!(player = %id, %bomb, %position, "bomb placed");
        self.events.push(ArenaEvent::BombPlaced {
            player: id,
            bomb,
            position,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaConfig;
    use crate::core_types::{Coord, Millis};
    use crate::grid::{ArenaGrid, PowerupKind};
    use approx::assert_relative_eq;

    fn open_sim() -> ArenaSimulation {
        let config = ArenaConfig::default().with_seed(42);
        let grid = ArenaGrid::open(config.grid_size);
        ArenaSimulation::with_grid(config, grid).unwrap()
    }

    #[test]
    fn test_move_and_orientation() {
        let mut sim = open_sim();
        assert!(sim.apply_move(PlayerId::P1, Direction::Down));
        let p1 = &sim.players[0];
        assert_eq!(p1.position(), Coord::new(1, 2));
        assert_eq!(p1.orientation(), Orientation::Right);

        sim.now = Millis::new(200);
        assert!(sim.apply_move(PlayerId::P1, Direction::Up));
        sim.now = Millis::new(400);
        assert!(sim.apply_move(PlayerId::P1, Direction::Left));
        assert_eq!(sim.players[0].position(), Coord::new(0, 1));
        assert_eq!(sim.players[0].orientation(), Orientation::Left);
    }

    #[test]
    fn test_cooldown_blocks_second_move() {
        let mut sim = open_sim();
        assert!(sim.apply_move(PlayerId::P1, Direction::Right));
        sim.now = Millis::new(199);
        assert!(!sim.apply_move(PlayerId::P1, Direction::Right));
        sim.now = Millis::new(200);
        assert!(sim.apply_move(PlayerId::P1, Direction::Right));
        assert_eq!(sim.players[0].position(), Coord::new(3, 1));
    }

    #[test]
    fn test_blocked_move_keeps_state() {
        let mut sim = open_sim();
        sim.players[0].position = Coord::new(3, 1);
        sim.players[0].orientation = Orientation::Right;
        let before = sim.players[0].clone();

        // grass below, breaking grass to the left
        sim.grid.set(Coord::new(3, 2), Cell::Grass);
        assert!(!sim.apply_move(PlayerId::P1, Direction::Down));
        sim.grid.set(Coord::new(2, 1), Cell::GrassBreaking);
        assert!(!sim.apply_move(PlayerId::P1, Direction::Left));

        assert_eq!(sim.players[0], before);
    }

    #[test]
    fn test_wall_blocks() {
        let mut sim = open_sim();
        sim.players[0].position = Coord::new(1, 2);
        assert!(!sim.apply_move(PlayerId::P1, Direction::Right));
        assert_eq!(sim.players[0].position(), Coord::new(1, 2));
        assert!(sim.players[0].last_move().is_none());
    }

    #[test]
    fn test_edge_clamps() {
        let mut sim = open_sim();
        sim.players[0].position = Coord::new(0, 1);
        assert!(sim.apply_move(PlayerId::P1, Direction::Left));
        assert_eq!(sim.players[0].position(), Coord::new(0, 1));
        assert_eq!(sim.players[0].orientation(), Orientation::Left);
    }

    #[test]
    fn test_opponent_blocks() {
        let mut sim = open_sim();
        sim.players[1].position = Coord::new(2, 1);
        assert!(!sim.apply_move(PlayerId::P1, Direction::Right));
        assert_eq!(sim.players[0].position(), Coord::new(1, 1));
    }

    #[test]
    fn test_pickup_clears_cell() {
        let mut sim = open_sim();
        sim.grid.set(Coord::new(1, 2), Cell::Powerup(PowerupKind::SpeedBoost));
        assert!(sim.apply_move(PlayerId::P1, Direction::Down));
        assert_eq!(sim.grid.get(Coord::new(1, 2)), Some(Cell::Empty));
        assert_relative_eq!(sim.players[0].speed(), 1.5);
        assert!(matches!(
            sim.events.last(),
            Some(ArenaEvent::PowerupCollected {
                kind: PowerupKind::SpeedBoost,
                ..
            })
        ));
    }

    #[test]
    fn test_bomb_capacity() {
        let mut sim = open_sim();
        assert!(sim.apply_place_bomb(PlayerId::P1));
        assert_eq!(sim.grid.get(Coord::new(1, 1)), Some(Cell::Bomb));

        sim.now = Millis::new(10);
        assert!(sim.apply_move(PlayerId::P1, Direction::Right));
        let grid = sim.grid.clone();
        let bombs = sim.bombs.len();
        assert!(!sim.apply_place_bomb(PlayerId::P1));
        assert_eq!(sim.grid, grid);
        assert_eq!(sim.bombs.len(), bombs);
    }

    #[test]
    fn test_only_first_move_per_tick() {
        let mut sim = open_sim();
        sim.intents.submit(PlayerIntent::movement(PlayerId::P1, Direction::Right));
        sim.intents.submit(PlayerIntent::movement(PlayerId::P1, Direction::Right));
        sim.process_intents();
        assert_eq!(sim.players[0].position(), Coord::new(2, 1));
        assert_eq!(sim.intents.executed_this_frame().len(), 1);
    }
}
