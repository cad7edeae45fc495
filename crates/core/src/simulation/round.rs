//! Round controller: win/draw detection and round lifecycle

use super::events::ArenaEvent;
use super::scheduler::ScheduledEffect;
use super::ArenaSimulation;
use crate::core_types::Millis;
use crate::entities::PlayerId;
use crate::grid::{ArenaGrid, Cell};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// How a finished round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundOutcome {
    Winner(PlayerId),
    /// Both players died in the same resolution
    Draw,
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundOutcome::Winner(id) => write!(f, "{id} wins"),
            RoundOutcome::Draw => write!(f, "draw"),
        }
    }
}

/// Active → GameOver → (reset) → Active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoundStatus {
    #[default]
    Active,
    GameOver(RoundOutcome),
}

impl RoundStatus {
    #[must_use]
    pub fn is_active(self) -> bool {
        self == RoundStatus::Active
    }

    #[must_use]
    pub fn outcome(self) -> Option<RoundOutcome> {
        match self {
            RoundStatus::Active => None,
            RoundStatus::GameOver(outcome) => Some(outcome),
        }
    }

    #[must_use]
    pub fn winner(self) -> Option<PlayerId> {
        match self.outcome()? {
            RoundOutcome::Winner(id) => Some(id),
            RoundOutcome::Draw => None,
        }
    }
}

/// Decide the outcome from the alive flags; `None` while both live
#[must_use]
pub fn decide_outcome(p1_alive: bool, p2_alive: bool) -> Option<RoundOutcome> {
    match (p1_alive, p2_alive) {
        (true, true) => None,
        (true, false) => Some(RoundOutcome::Winner(PlayerId::P1)),
        (false, true) => Some(RoundOutcome::Winner(PlayerId::P2)),
        (false, false) => Some(RoundOutcome::Draw),
    }
}

impl ArenaSimulation {
    /// Single win-check for every lethal path. Transitions to GameOver at
    /// most once per round.
    pub(crate) fn check_round_end(&mut self, at: Millis) {
        if !self.status.is_active() {
            return;
        }
        let [p1, p2] = &self.players;
        let Some(outcome) = decide_outcome(p1.is_alive(), p2.is_alive()) else {
            return;
        };

        self.status = RoundStatus::GameOver(outcome);
        info!(
            round = self.round,
            at = at.as_u64(),
            %outcome,
            p1_kills = p1.kills(),
            p2_kills = p2.kills(),
            "round over"
        );
        self.events.push(ArenaEvent::GameOver {
            outcome,
            prompt_delay: self.config.game_over_prompt_delay,
        });
    }

    /// Start a new round on freshly generated terrain; kills carry over
    pub fn reset(&mut self) {
        self.grid = ArenaGrid::generate(
            self.config.grid_size,
            self.config.grass_spawn_chance,
            &mut self.rng,
        );
        self.start_round();
    }

    /// Flush transient state and respawn both players on the current terrain
    pub(crate) fn start_round(&mut self) {
        self.bombs.clear();
        self.explosions.clear();
        self.scheduler.clear();
        self.intents.clear_pending();

        for player in &mut self.players {
            player.respawn(&self.config);
            self.grid.set(player.position(), Cell::Empty);
        }

        self.status = RoundStatus::Active;
        self.round += 1;
        self.scheduler.schedule(
            self.now + self.config.ambient_powerup_interval,
            ScheduledEffect::AmbientPowerupRoll,
        );

        info!(round = self.round, at = self.now.as_u64(), "round started");
        self.events.push(ArenaEvent::RoundReset { round: self.round });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaConfig;
    use crate::core_types::Coord;

    fn open_sim() -> ArenaSimulation {
        let config = ArenaConfig::default().with_seed(7);
        let grid = ArenaGrid::open(config.grid_size);
        ArenaSimulation::with_grid(config, grid).unwrap()
    }

    #[test]
    fn test_decide_outcome() {
        assert_eq!(decide_outcome(true, true), None);
        assert_eq!(
            decide_outcome(false, true),
            Some(RoundOutcome::Winner(PlayerId::P2))
        );
        assert_eq!(decide_outcome(false, false), Some(RoundOutcome::Draw));
    }

    #[test]
    fn test_round_end_fires_once() {
        let mut sim = open_sim();
        sim.events.clear();
        sim.players[PlayerId::P2.index()].alive = false;

        sim.check_round_end(Millis::new(10));
        sim.check_round_end(Millis::new(20));

        assert_eq!(sim.status.winner(), Some(PlayerId::P1));
        let game_overs = sim.events.iter().filter(|e| e.is_game_over()).count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_start_round_flushes_transients() {
        let mut sim = open_sim();
        sim.players[0].kills = 2;
        sim.players[0].alive = false;
        sim.status = RoundStatus::GameOver(RoundOutcome::Winner(PlayerId::P2));
        sim.bombs
            .plant(PlayerId::P2, Coord::new(5, 5), 1, Millis::ZERO, Millis::new(2000));

        sim.start_round();

        assert!(sim.status.is_active());
        assert!(sim.bombs.is_empty());
        assert!(sim.explosions.is_empty());
        assert_eq!(sim.scheduler.len(), 1);
        assert_eq!(sim.round, 2);
        assert_eq!(sim.players[0].kills(), 2);
        assert!(sim.players[0].is_alive());
    }
}
