//! Participant pool: who gets seeded into the bracket.

use crate::error::{TournamentError, MIN_PARTICIPANTS};
use crate::models::{ParticipantRef, Tournament, TournamentStatus};

/// Enrolled participants in enrollment order.
///
/// The tournament must still be in registration and have at least two entries.
pub fn resolve_pool(tournament: &Tournament) -> Result<Vec<ParticipantRef>, TournamentError> {
    if tournament.status != TournamentStatus::Registration {
        return Err(TournamentError::InvalidState(
            "tournament has already started or ended",
        ));
    }
    let found = tournament.enrolled.len();
    if found < MIN_PARTICIPANTS {
        return Err(TournamentError::InsufficientParticipants {
            required: MIN_PARTICIPANTS,
            found,
        });
    }
    Ok(tournament.enrolled.iter().map(|e| e.participant).collect())
}
