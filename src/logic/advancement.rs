//! Match results: moving winners into the next round.

use crate::error::TournamentError;
use crate::models::{GameMatch, MatchId, MatchStatus, ParticipantRef};

/// What a recorded result did to the bracket.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Advancement {
    /// Winner placed into `slot` of `next_match`.
    Advanced {
        next_match: MatchId,
        slot: usize,
        /// Both slots of `next_match` are now filled.
        next_ready: bool,
    },
    /// The final was decided.
    Champion(ParticipantRef),
}

/// Place `winner` into the first empty slot of `next` and return the slot index.
///
/// A winner that already sits in `next`, or a `next` with no free slot, is
/// `AlreadyAdvanced` and leaves `next` untouched.
pub fn advance_winner(
    next: &mut GameMatch,
    winner: ParticipantRef,
) -> Result<usize, TournamentError> {
    if next.status == MatchStatus::Completed || next.contains(winner) {
        return Err(TournamentError::AlreadyAdvanced(next.id));
    }
    next.fill_first_empty(winner)
        .ok_or(TournamentError::AlreadyAdvanced(next.id))
}

fn position_of(matches: &[GameMatch], match_id: MatchId) -> Result<usize, TournamentError> {
    matches
        .iter()
        .position(|m| m.id == match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))
}

/// Start scoring a match: `Ready -> InProgress`.
pub fn begin_match(matches: &mut [GameMatch], match_id: MatchId) -> Result<(), TournamentError> {
    let idx = position_of(matches, match_id)?;
    let m = &mut matches[idx];
    match m.status {
        MatchStatus::Ready => {
            m.status = MatchStatus::InProgress;
            Ok(())
        }
        MatchStatus::InProgress => Err(TournamentError::InvalidState("match is already in progress")),
        MatchStatus::Pending => Err(TournamentError::InvalidState(
            "match is waiting for earlier rounds",
        )),
        MatchStatus::Completed => Err(TournamentError::AlreadyAdvanced(match_id)),
    }
}

/// Record `winner` for a ready or in-progress match and advance it.
///
/// The downstream slot is claimed before the match is marked completed, so any
/// error leaves both matches as they were.
pub fn report_result(
    matches: &mut [GameMatch],
    match_id: MatchId,
    winner: ParticipantRef,
) -> Result<Advancement, TournamentError> {
    let idx = position_of(matches, match_id)?;
    let m = &matches[idx];
    match m.status {
        MatchStatus::Ready | MatchStatus::InProgress => {}
        MatchStatus::Pending => {
            return Err(TournamentError::InvalidState(
                "match is waiting for earlier rounds",
            ))
        }
        MatchStatus::Completed => return Err(TournamentError::AlreadyAdvanced(match_id)),
    }
    if !m.contains(winner) {
        return Err(TournamentError::NotAParticipant(match_id));
    }

    let outcome = match m.next_match {
        Some(next_id) => {
            let next_idx = matches
                .iter()
                .position(|n| n.id == next_id)
                .ok_or_else(|| {
                    log::error!(
                        "Match {} links to missing match {} ({} matches in bracket)",
                        match_id,
                        next_id,
                        matches.len()
                    );
                    TournamentError::InvariantViolation(format!(
                        "match {match_id} links to missing match {next_id}"
                    ))
                })?;
            let slot = advance_winner(&mut matches[next_idx], winner)?;
            Advancement::Advanced {
                next_match: next_id,
                slot,
                next_ready: matches[next_idx].status == MatchStatus::Ready,
            }
        }
        None => Advancement::Champion(winner),
    };
    matches[idx].complete(winner);
    log::debug!("Match {} won by {}: {:?}", match_id, winner, outcome);
    Ok(outcome)
}
