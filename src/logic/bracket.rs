//! Single-elimination bracket construction.
//!
//! All matches live in one flat arena ordered by ascending round, then by position within
//! the round. Links to the next round are computed from `(round, position)` by index math,
//! so every match id is known before any match is created.

use crate::error::{TournamentError, MIN_PARTICIPANTS};
use crate::logic::advancement::advance_winner;
use crate::models::{GameMatch, MatchId, MatchStatus, ParticipantRef, TournamentId};
use serde::Serialize;
use uuid::Uuid;

/// Size of a bracket for a given pool.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct BracketShape {
    pub pool_size: usize,
    /// Smallest power of two `>= pool_size`.
    pub bracket_size: usize,
    /// `log2(bracket_size)`; round `total_rounds` is the final.
    pub total_rounds: u32,
}

impl BracketShape {
    pub fn for_pool(pool_size: usize) -> Result<Self, TournamentError> {
        if pool_size < MIN_PARTICIPANTS {
            return Err(TournamentError::InsufficientParticipants {
                required: MIN_PARTICIPANTS,
                found: pool_size,
            });
        }
        let bracket_size = pool_size.checked_next_power_of_two().ok_or_else(|| {
            TournamentError::InvariantViolation(format!("pool of {pool_size} is too large"))
        })?;
        let total_rounds = bracket_size.trailing_zeros();
        if total_rounds == 0 {
            return Err(TournamentError::InvariantViolation(format!(
                "pool of {pool_size} produced a bracket with no rounds"
            )));
        }
        Ok(Self {
            pool_size,
            bracket_size,
            total_rounds,
        })
    }

    pub fn matches_in_round(&self, round: u32) -> usize {
        self.bracket_size >> round
    }

    pub fn total_matches(&self) -> usize {
        self.bracket_size - 1
    }

    /// Opening-round matches with a single participant.
    pub fn byes(&self) -> usize {
        self.bracket_size - self.pool_size
    }

    /// Arena index of `position` in `round`. `round` must be in `1..=total_rounds`.
    fn index(&self, round: u32, position: usize) -> usize {
        self.bracket_size - (self.bracket_size >> (round - 1)) + position
    }
}

/// A freshly built bracket, not yet persisted.
#[derive(Clone, Debug)]
pub struct Bracket {
    shape: BracketShape,
    matches: Vec<GameMatch>,
}

impl Bracket {
    pub fn shape(&self) -> BracketShape {
        self.shape
    }

    /// All matches by ascending round.
    pub fn matches(&self) -> &[GameMatch] {
        &self.matches
    }

    pub fn round(&self, round: u32) -> &[GameMatch] {
        if round == 0 || round > self.shape.total_rounds {
            return &[];
        }
        let start = self.shape.index(round, 0);
        &self.matches[start..start + self.shape.matches_in_round(round)]
    }

    pub fn final_match(&self) -> Option<&GameMatch> {
        self.matches.last()
    }

    pub fn match_ids(&self) -> Vec<MatchId> {
        self.matches.iter().map(|m| m.id).collect()
    }

    pub fn into_matches(self) -> Vec<GameMatch> {
        self.matches
    }
}

/// Build the full bracket for an already shuffled pool.
///
/// Rounds are created from the final backwards, so `match_number` 1 is the final.
/// Participants are drawn from the tail of `pool` into the opening round, left to right.
/// Opening matches with a single participant are byes: completed on creation and their
/// winners already placed in round two when this returns.
pub fn build_bracket(
    tournament: TournamentId,
    mut pool: Vec<ParticipantRef>,
) -> Result<Bracket, TournamentError> {
    let shape = BracketShape::for_pool(pool.len())?;
    let ids: Vec<MatchId> = (0..shape.total_matches()).map(|_| Uuid::new_v4()).collect();
    let mut arena: Vec<Option<GameMatch>> = vec![None; ids.len()];
    let mut match_number = 0;

    for round in (1..=shape.total_rounds).rev() {
        let in_round = shape.matches_in_round(round);
        for position in 0..in_round {
            match_number += 1;
            let idx = shape.index(round, position);
            let next_match =
                (round < shape.total_rounds).then(|| ids[shape.index(round + 1, position / 2)]);
            let mut m = GameMatch::new(ids[idx], tournament, round, match_number, next_match);
            if round == 1 {
                seed_opening_match(&mut m, &mut pool, in_round - position - 1)?;
            }
            arena[idx] = Some(m);
        }
    }
    if !pool.is_empty() {
        return Err(TournamentError::InvariantViolation(format!(
            "{} participants left over after seeding the opening round",
            pool.len()
        )));
    }

    let mut matches = arena
        .into_iter()
        .enumerate()
        .map(|(idx, m)| {
            m.ok_or_else(|| {
                TournamentError::InvariantViolation(format!("arena slot {idx} never allocated"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    propagate_byes(&shape, &mut matches)?;

    Ok(Bracket { shape, matches })
}

/// Draw participants for one opening match. `waiting` is the number of opening matches
/// after this one; each of them needs at least one participant left in the pool.
fn seed_opening_match(
    m: &mut GameMatch,
    pool: &mut Vec<ParticipantRef>,
    waiting: usize,
) -> Result<(), TournamentError> {
    let first = pool.pop().ok_or_else(|| {
        TournamentError::InvariantViolation(format!(
            "opening match {} would have no participants",
            m.match_number
        ))
    })?;
    m.slots[0] = Some(first);
    if pool.len() > waiting {
        m.slots[1] = pool.pop();
    }
    match m.slots[1] {
        Some(_) => m.status = MatchStatus::Ready,
        None => m.complete(first),
    }
    Ok(())
}

/// Move every bye winner into round two, left to right.
fn propagate_byes(shape: &BracketShape, matches: &mut [GameMatch]) -> Result<(), TournamentError> {
    if shape.total_rounds < 2 {
        return Ok(());
    }
    for position in 0..shape.matches_in_round(1) {
        let bye = &matches[position];
        if bye.status != MatchStatus::Completed {
            continue;
        }
        let winner = bye.winner.ok_or_else(|| {
            TournamentError::InvariantViolation(format!("bye {} has no winner", bye.id))
        })?;
        advance_winner(&mut matches[shape.index(2, position / 2)], winner)?;
    }
    Ok(())
}
