//! Errors returned by tournament, bracket and match operations.

use crate::models::{MatchId, TournamentId, TournamentKind};
use thiserror::Error;

/// Fewest participants a bracket can be built for.
pub const MIN_PARTICIPANTS: usize = 2;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    /// Fewer than two enrolled participants.
    #[error("Need at least {required} participants to start (found {found})")]
    InsufficientParticipants { required: usize, found: usize },

    /// Tournament or match is not in a state that allows this action.
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    /// Result already recorded, or the winner already sits in the next match.
    #[error("Match {0} has already been advanced")]
    AlreadyAdvanced(MatchId),

    #[error("Tournament {0} not found")]
    TournamentNotFound(TournamentId),

    #[error("Match {0} not found")]
    MatchNotFound(MatchId),

    /// Host-only command issued by another user.
    #[error("Not authorized as host")]
    NotHost,

    #[error("Tournament is full ({max} participants)")]
    TournamentFull { max: usize },

    #[error("Already enrolled")]
    AlreadyEnrolled,

    #[error("This is a {expected} tournament")]
    ParticipantKindMismatch { expected: TournamentKind },

    /// Reported winner does not occupy either slot of the match.
    #[error("Winner is not a participant of match {0}")]
    NotAParticipant(MatchId),

    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    /// Bracket sizing or linkage bug. Nothing is persisted when this is returned.
    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),

    /// A lock in the store was poisoned by a panicking writer.
    #[error("Tournament store unavailable")]
    StoreUnavailable,
}
