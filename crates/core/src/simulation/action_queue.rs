//! Player intent queue
//!
//! The presentation layer submits intents at any time; the simulation takes
//! them all at the start of the next active tick and applies them in
//! submission order.
//!
//! - **Pending**: submitted but not yet processed
//! - **Executed this frame**: intents that changed state during the last tick
//! - **History**: bounded log of executed intents, oldest dropped first

use crate::core_types::{Direction, Millis};
use crate::entities::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// What a player wants to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentKind {
    Move(Direction),
    PlaceBomb,
}

/// One inbound command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIntent {
    pub player: PlayerId,
    pub kind: IntentKind,
}

impl PlayerIntent {
    #[must_use]
    pub fn movement(player: PlayerId, direction: Direction) -> Self {
        Self {
            player,
            kind: IntentKind::Move(direction),
        }
    }

    #[must_use]
    pub fn place_bomb(player: PlayerId) -> Self {
        Self {
            player,
            kind: IntentKind::PlaceBomb,
        }
    }
}

/// An intent that was applied, stamped with the simulation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutedIntent {
    pub intent: PlayerIntent,
    pub at: Millis,
    pub frame: u64,
}

#[derive(Debug)]
pub struct IntentQueue {
    pending: Vec<PlayerIntent>,
    executed_this_frame: Vec<ExecutedIntent>,
    history: VecDeque<ExecutedIntent>,
    max_history: usize,
}

impl Default for IntentQueue {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl IntentQueue {
    #[must_use]
    pub fn new(max_history: usize) -> Self {
        Self {
            pending: Vec::with_capacity(8),
            executed_this_frame: Vec::with_capacity(8),
            history: VecDeque::with_capacity(max_history.min(1024)),
            max_history,
        }
    }

    pub fn submit(&mut self, intent: PlayerIntent) {
        self.pending.push(intent);
    }

    #[must_use]
    pub fn pending(&self) -> &[PlayerIntent] {
        &self.pending
    }

    #[must_use]
    pub fn executed_this_frame(&self) -> &[ExecutedIntent] {
        &self.executed_this_frame
    }

    /// Executed intents, oldest first
    pub fn history(&self) -> impl Iterator<Item = &ExecutedIntent> {
        self.history.iter()
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Clear the per-frame log at the start of each tick
    pub fn begin_frame(&mut self) {
        self.executed_this_frame.clear();
    }

    /// Take everything submitted since the last tick
    pub fn take_pending(&mut self) -> Vec<PlayerIntent> {
        std::mem::take(&mut self.pending)
    }

    pub fn mark_executed(&mut self, executed: ExecutedIntent) {
        self.executed_this_frame.push(executed);
        self.history.push_back(executed);
        while self.history.len() > self.max_history {
            self.history.pop_front();
        }
    }

    /// Drop pending intents and the frame log; history survives round resets
    pub fn clear_pending(&mut self) {
        self.pending.clear();
        self.executed_this_frame.clear();
    }
}
