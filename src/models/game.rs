//! A single bracket match, its status, and slot handling.

use crate::models::participant::ParticipantRef;
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Lifecycle of a match: `pending -> ready -> in_progress -> completed`.
/// Byes go straight from `pending` to `completed` while the bracket is built.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Waiting for winners of earlier rounds.
    #[default]
    Pending,
    /// Both slots filled, can be played.
    Ready,
    /// Score is being recorded.
    InProgress,
    /// Winner decided. Terminal.
    Completed,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Pending => write!(f, "pending"),
            MatchStatus::Ready => write!(f, "ready"),
            MatchStatus::InProgress => write!(f, "in_progress"),
            MatchStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A match in a single-elimination bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament: TournamentId,
    /// 1 is the opening round; the final has the highest round number.
    pub round: u32,
    /// Display ordering only.
    pub match_number: u32,
    pub slots: [Option<ParticipantRef>; 2],
    pub status: MatchStatus,
    pub winner: Option<ParticipantRef>,
    /// Match the winner advances into; `None` only for the final.
    pub next_match: Option<MatchId>,
}

impl GameMatch {
    /// A pending match with both slots empty.
    pub fn new(
        id: MatchId,
        tournament: TournamentId,
        round: u32,
        match_number: u32,
        next_match: Option<MatchId>,
    ) -> Self {
        Self {
            id,
            tournament,
            round,
            match_number,
            slots: [None, None],
            status: MatchStatus::Pending,
            winner: None,
            next_match,
        }
    }

    /// Occupants in slot order, skipping empty slots.
    pub fn participants(&self) -> impl Iterator<Item = ParticipantRef> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn filled_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_final(&self) -> bool {
        self.next_match.is_none()
    }

    pub fn contains(&self, participant: ParticipantRef) -> bool {
        self.slots.contains(&Some(participant))
    }

    /// Put `participant` into the first empty slot and return its index.
    /// Returns `None` when both slots are taken.
    pub fn fill_first_empty(&mut self, participant: ParticipantRef) -> Option<usize> {
        let slot = self.slots.iter().position(Option::is_none)?;
        self.slots[slot] = Some(participant);
        if self.filled_slots() == 2 && self.status == MatchStatus::Pending {
            self.status = MatchStatus::Ready;
        }
        Some(slot)
    }

    /// Mark the match completed with `winner`.
    pub fn complete(&mut self, winner: ParticipantRef) {
        self.winner = Some(winner);
        self.status = MatchStatus::Completed;
    }
}
