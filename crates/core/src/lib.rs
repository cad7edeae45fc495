//! Blast Arena Core Library
//!
//! A two-player grid arena simulation: players plant bombs that detonate
//! after a fuse, blasts travel along cardinal rays, break grass, set off
//! other bombs and eliminate players unless a companion absorbs the hit.
//!
//! The simulation is a single owned aggregate driven by a fixed-rate tick.
//! Every delayed consequence lives in one delay queue drained in due-time
//! order, so a tick never observes a half-applied effect.
//!
//! ## Quick start
//!
//! ```no_run
//! use blast_arena_core::{ArenaConfig, ArenaSimulation, Direction, Millis, PlayerId};
//!
//! let mut sim = ArenaSimulation::new(ArenaConfig::default().with_seed(1))?;
//! sim.submit_bomb(PlayerId::P1);
//! sim.submit_move(PlayerId::P2, Direction::Up);
//! let report = sim.update(Millis::new(16));
//! println!("{}", report.snapshot.render_text());
//! # Ok::<(), blast_arena_core::ConfigError>(())
//! ```

// Core types and utilities
pub mod core_types;

pub mod config;
pub mod entities;
pub mod grid;
pub mod simulation;

pub use config::{ArenaConfig, ConfigError, Loadout};
pub use core_types::{Coord, Direction, Millis};
pub use entities::{Companion, Orientation, Player, PlayerId};
pub use grid::{ArenaGrid, Cell, GridError, PowerupKind};
pub use simulation::{
    ArenaEvent, ArenaSimulation, ArenaSnapshot, IntentKind, PlayerIntent, PlayerSnapshot,
    RoundOutcome, RoundStatus, SpawnSource, TickReport,
};
