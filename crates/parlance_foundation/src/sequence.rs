//! Per-session counters for event ids and turns.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::EventId;

/// Issues event ids and tracks the turn number for one session.
///
/// Each session owns its own sequence, so two sessions in the same process
/// never share ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sequence {
    turn: u64,
    next_event: u64,
}

impl Sequence {
    /// Creates a sequence at turn 0 with no events issued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current turn number.
    #[must_use]
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Issues the next event id.
    pub fn next_event_id(&mut self) -> EventId {
        let id = EventId(self.next_event);
        self.next_event += 1;
        id
    }

    /// Returns how many event ids have been issued.
    #[must_use]
    pub fn events_issued(&self) -> u64 {
        self.next_event
    }

    /// Moves to the next turn and returns its number.
    pub fn advance_turn(&mut self) -> u64 {
        self.turn += 1;
        self.turn
    }

    /// Rewinds the turn counter, keeping event ids unique.
    pub fn set_turn(&mut self, turn: u64) {
        self.turn = turn;
    }
}
