//! Arena grid: cell kinds and the terrain store

pub mod arena_grid;
pub mod cell;

pub use arena_grid::{ArenaGrid, GridError};
pub use cell::{Cell, PowerupKind};
