//! Entity store: players, bombs and live explosions

pub mod bomb;
pub mod explosion;
pub mod player;

pub use bomb::{Bomb, BombId, BombStore};
pub use explosion::{Explosion, ExplosionId, ExplosionSet};
pub use player::{Companion, Orientation, Player, PlayerId};
