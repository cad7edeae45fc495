//! Arena simulation aggregate and the tick
//!
//! `ArenaSimulation` owns the whole round state: grid, players, bombs, live
//! explosions, the delay queue, the intent queue and the RNG. One call to
//! [`ArenaSimulation::update`] is one tick:
//!
//! 1. advance the clock
//! 2. apply queued intents (movement, bomb placement)
//! 3. hit players standing in live blast footprints
//! 4. fire every scheduled effect that is due, each at its own due time
//! 5. emit the events and an immutable snapshot
//!
//! After game over the clock keeps running but nothing else changes until
//! [`ArenaSimulation::reset`].

pub mod action_queue;
pub mod events;
mod movement;
pub mod powerups;
mod propagation;
pub mod round;
pub mod scheduler;
pub mod snapshot;

pub use action_queue::{ExecutedIntent, IntentKind, PlayerIntent};
pub use events::{ArenaEvent, SpawnSource};
pub use powerups::{draw_powerup, PickupEffect};
pub use round::{RoundOutcome, RoundStatus};
pub use scheduler::{ScheduledEffect, ScheduledEvent};
pub use snapshot::{ArenaSnapshot, PlayerSnapshot};

pub(crate) use action_queue::IntentQueue;
pub(crate) use scheduler::EventScheduler;

use crate::config::{ArenaConfig, ConfigError};
use crate::core_types::{Coord, Direction, Millis};
use crate::entities::{BombStore, ExplosionSet, Player, PlayerId};
use crate::grid::{ArenaGrid, Cell};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

/// Result of one tick
#[derive(Debug, Clone)]
pub struct TickReport {
    pub frame: u64,
    pub now: Millis,
    /// Everything that happened since the previous tick, in order
    pub events: Vec<ArenaEvent>,
    pub snapshot: ArenaSnapshot,
}

impl TickReport {
    /// Outcome and prompt delay if the round ended during this tick
    #[must_use]
    pub fn game_over(&self) -> Option<(RoundOutcome, Millis)> {
        self.events.iter().find_map(|e| match e {
            ArenaEvent::GameOver {
                outcome,
                prompt_delay,
            } => Some((*outcome, *prompt_delay)),
            _ => None,
        })
    }
}

/// Two-player bomb arena
pub struct ArenaSimulation {
    pub(crate) config: ArenaConfig,
    pub(crate) grid: ArenaGrid,
    pub(crate) players: [Player; 2],
    pub(crate) bombs: BombStore,
    pub(crate) explosions: ExplosionSet,
    pub(crate) scheduler: EventScheduler,
    pub(crate) intents: IntentQueue,
    pub(crate) rng: StdRng,
    pub(crate) status: RoundStatus,
    pub(crate) now: Millis,
    pub(crate) frame: u64,
    pub(crate) round: u32,
    /// Emitted since the last tick report
    pub(crate) events: Vec<ArenaEvent>,
}

impl ArenaSimulation {
    /// Create a simulation on freshly generated terrain and start round 1
    pub fn new(config: ArenaConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = Self::make_rng(&config);
        let grid = ArenaGrid::generate(config.grid_size, config.grass_spawn_chance, &mut rng);
        Ok(Self::build(config, grid, rng))
    }

    /// Create a simulation on caller-supplied terrain. Later resets generate
    /// terrain as usual.
    pub fn with_grid(config: ArenaConfig, grid: ArenaGrid) -> Result<Self, ConfigError> {
        config.validate()?;
        if grid.size() != config.grid_size {
            return Err(ConfigError::Invalid {
                field: "grid_size",
                reason: format!(
                    "grid is {}x{} but config expects {}",
                    grid.size(),
                    grid.size(),
                    config.grid_size
                ),
            });
        }
        grid.validate().map_err(|err| ConfigError::Invalid {
            field: "grid",
            reason: err.to_string(),
        })?;
        let rng = Self::make_rng(&config);
        Ok(Self::build(config, grid, rng))
    }

    fn make_rng(config: &ArenaConfig) -> StdRng {
        match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    fn build(config: ArenaConfig, grid: ArenaGrid, rng: StdRng) -> Self {
        let players = PlayerId::ALL.map(|id| Player::spawn(id, &config));
        let mut sim = ArenaSimulation {
            config,
            grid,
            players,
            bombs: BombStore::new(),
            explosions: ExplosionSet::new(),
            scheduler: EventScheduler::new(),
            intents: IntentQueue::default(),
            rng,
            status: RoundStatus::Active,
            now: Millis::ZERO,
            frame: 0,
            round: 0,
            events: Vec::new(),
        };
        sim.start_round();
        sim
    }

    // ========================================================================
    // Intents
    // ========================================================================

    /// Queue an intent for the next tick
    pub fn submit_intent(&mut self, intent: PlayerIntent) {
        self.intents.submit(intent);
    }

    pub fn submit_move(&mut self, player: PlayerId, direction: Direction) {
        self.submit_intent(PlayerIntent::movement(player, direction));
    }

    pub fn submit_bomb(&mut self, player: PlayerId) {
        self.submit_intent(PlayerIntent::place_bomb(player));
    }

    /// Intents applied during the last tick
    #[must_use]
    pub fn executed_intents(&self) -> &[ExecutedIntent] {
        self.intents.executed_this_frame()
    }

    /// Bounded log of applied intents, oldest first
    pub fn intent_history(&self) -> impl Iterator<Item = &ExecutedIntent> {
        self.intents.history()
    }

    #[must_use]
    pub fn pending_intent_count(&self) -> usize {
        self.intents.pending().len()
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance the simulation by `dt`
    pub fn update(&mut self, dt: Millis) -> TickReport {
        self.now += dt;
        self.frame += 1;
        self.intents.begin_frame();

        if self.status.is_active() {
            self.process_intents();
            self.check_standing_hazards();
            self.drain_due();
        } else {
            let dropped = self.intents.take_pending();
            if !dropped.is_empty() {
                debug!(count = dropped.len(), "intents dropped after game over");
            }
        }

        TickReport {
            frame: self.frame,
            now: self.now,
            events: std::mem::take(&mut self.events),
            snapshot: self.snapshot(),
        }
    }

    /// Fire due effects in `(due, seq)` order until none are due or the round
    /// ends
    fn drain_due(&mut self) {
        while self.status.is_active() {
            let Some(event) = self.scheduler.pop_due(self.now) else {
                break;
            };
            trace!(due = event.due.as_u64(), effect = ?event.effect, "firing");
            self.fire(event.effect, event.due);
        }
    }

    fn fire(&mut self, effect: ScheduledEffect, at: Millis) {
        match effect {
            ScheduledEffect::FuseExpiry(bomb) => self.detonate(bomb, at, false),
            ScheduledEffect::ChainDetonation(bomb) => self.detonate(bomb, at, true),
            ScheduledEffect::ExplosionClear(id) => self.clear_explosion(id),
            ScheduledEffect::GrassBreakClear(coord) => {
                if self.grid.get(coord) == Some(Cell::GrassBreaking) {
                    self.grid.set(coord, Cell::Empty);
                }
            }
            ScheduledEffect::PowerupSpawn(coord) => {
                self.try_spawn_powerup(coord, SpawnSource::Grass);
            }
            ScheduledEffect::AmbientPowerupRoll => self.ambient_powerup_roll(at),
            ScheduledEffect::InvulnerabilityExpiry(id) => {
                let player = &self.players[id.index()];
                if player.is_alive() && !player.is_invulnerable(at) {
                    self.events.push(ArenaEvent::InvulnerabilityEnded { player: id });
                }
            }
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            now: self.now,
            frame: self.frame,
            round: self.round,
            status: self.status,
            grid: self.grid.clone(),
            players: [
                PlayerSnapshot::capture(&self.players[0], self.now),
                PlayerSnapshot::capture(&self.players[1], self.now),
            ],
        }
    }

    #[must_use]
    pub fn status(&self) -> RoundStatus {
        self.status
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    #[must_use]
    pub fn grid(&self) -> &ArenaGrid {
        &self.grid
    }

    #[must_use]
    pub fn cell(&self, coord: Coord) -> Option<Cell> {
        self.grid.get(coord)
    }

    #[must_use]
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    #[must_use]
    pub fn bombs(&self) -> &BombStore {
        &self.bombs
    }

    #[must_use]
    pub fn explosions(&self) -> &ExplosionSet {
        &self.explosions
    }

    #[must_use]
    pub fn now(&self) -> Millis {
        self.now
    }

    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// 1-based round counter
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn live_bomb_count(&self) -> usize {
        self.bombs.len()
    }

    #[must_use]
    pub fn live_explosion_count(&self) -> usize {
        self.explosions.len()
    }

    /// Scheduled effects not yet fired, in firing order
    #[must_use]
    pub fn pending_effects(&self) -> Vec<ScheduledEvent> {
        self.scheduler.pending()
    }
}
