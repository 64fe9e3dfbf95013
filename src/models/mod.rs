//! Data structures for tournaments: participants, matches, tournament state.

mod game;
mod participant;
mod tournament;

pub use game::{GameMatch, MatchId, MatchStatus};
pub use participant::{ParticipantRef, SquadId, UserId};
pub use tournament::{
    Enrollment, EnrollmentForm, NewTournament, Tournament, TournamentId, TournamentKind,
    TournamentStatus,
};
