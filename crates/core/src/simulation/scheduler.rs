//! Delay queue of timed effects
//!
//! Every delayed consequence in the arena (fuse expiry, explosion clearing,
//! chain detonation, grass-break clearing, powerup spawning, invulnerability
//! expiry and the periodic ambient roll) is a [`ScheduledEffect`] stored with
//! its due timestamp. The tick drains the queue in `(due, seq)` order, so
//! effects due at the same instant fire in the order they were scheduled.
//!
//! Individual entries cannot be cancelled; a round reset flushes everything.

use crate::core_types::{Coord, Millis};
use crate::entities::{BombId, ExplosionId, PlayerId};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A delayed effect waiting for its due time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduledEffect {
    /// A bomb's fuse ran out
    FuseExpiry(BombId),
    /// A bomb caught by another explosion's ray
    ChainDetonation(BombId),
    /// An explosion footprint stops being lethal
    ExplosionClear(ExplosionId),
    /// GrassBreaking reverts to Empty
    GrassBreakClear(Coord),
    /// Destroyed grass leaves a random powerup if the cell is still empty
    PowerupSpawn(Coord),
    /// Periodic roll for a powerup at a random coordinate
    AmbientPowerupRoll,
    /// A player's post-companion shield runs out
    InvulnerabilityExpiry(PlayerId),
}

/// Queue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub due: Millis,
    /// Insertion order, breaks ties between equal due times
    pub seq: u64,
    pub effect: ScheduledEffect,
}

// BinaryHeap is a max-heap; invert so the earliest (due, seq) pops first
impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
pub struct EventScheduler {
    queue: BinaryHeap<ScheduledEvent>,
    next_seq: u64,
}

impl EventScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Millis, effect: ScheduledEffect) {
        let seq = self.next_seq;
        self.next_seq += 1;
        tracing::trace!(due = due.as_u64(), seq, ?effect, "scheduled");
        self.queue.push(ScheduledEvent { due, seq, effect });
    }

    /// Due time of the next entry
    #[must_use]
    pub fn peek_due(&self) -> Option<Millis> {
        self.queue.peek().map(|e| e.due)
    }

    /// Pop the earliest entry if it is due at or before `now`
    pub fn pop_due(&mut self, now: Millis) -> Option<ScheduledEvent> {
        if self.peek_due()? <= now {
            self.queue.pop()
        } else {
            None
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending entries in firing order
    #[must_use]
    pub fn pending(&self) -> Vec<ScheduledEvent> {
        let mut entries = self.queue.clone().into_vec();
        entries.sort_by(|a, b| b.cmp(a));
        entries
    }

    /// Drop every pending effect
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
