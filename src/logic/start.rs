//! Starting a tournament: registration closes and the bracket is built.

use crate::error::TournamentError;
use crate::logic::bracket::{build_bracket, Bracket, BracketShape};
use crate::logic::pool::resolve_pool;
use crate::logic::seeding::shuffle_pool;
use crate::models::{Tournament, TournamentStatus};
use rand::Rng;

/// Build the bracket and move the tournament from `Registration` to `InProgress`.
///
/// The tournament is only modified once the whole bracket has been built; on any error it
/// is left exactly as it was. The caller persists the returned matches alongside it.
pub fn start_tournament<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<Bracket, TournamentError> {
    if tournament.status != TournamentStatus::Registration {
        return Err(TournamentError::InvalidState(
            "tournament has already started or ended",
        ));
    }
    let mut pool = resolve_pool(tournament)?;
    shuffle_pool(&mut pool, rng);

    let tournament_id = tournament.id;
    let pool_size = pool.len();
    let bracket = build_bracket(tournament_id, pool).map_err(|e| {
        if let TournamentError::InvariantViolation(detail) = &e {
            let bracket_size = BracketShape::for_pool(pool_size)
                .map(|s| s.bracket_size)
                .unwrap_or_default();
            log::error!(
                "Bracket construction failed for tournament {}: {} (pool size {}, bracket size {})",
                tournament_id,
                detail,
                pool_size,
                bracket_size
            );
        }
        e
    })?;

    tournament.begin(bracket.match_ids())?;
    let shape = bracket.shape();
    log::info!(
        "Tournament {} started: {} participants, bracket of {}, {} rounds, {} byes",
        tournament.id,
        shape.pool_size,
        shape.bracket_size,
        shape.total_rounds,
        shape.byes()
    );
    Ok(bracket)
}
