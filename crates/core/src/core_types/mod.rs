//! Core types and utilities

pub mod position;
pub mod units;

pub use position::{Coord, Direction};
pub use units::Millis;
