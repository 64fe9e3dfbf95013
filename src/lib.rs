//! Esports tournament host: library with models, bracket engine, store and REST API.

pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod models;
pub mod store;

pub use config::ServerConfig;
pub use error::{TournamentError, MIN_PARTICIPANTS};
pub use logic::{
    advance_winner, begin_match, build_bracket, report_result, resolve_pool, shuffle_pool,
    start_tournament, Advancement, Bracket, BracketShape,
};
pub use models::{
    Enrollment, EnrollmentForm, GameMatch, MatchId, MatchStatus, NewTournament, ParticipantRef,
    SquadId, Tournament, TournamentId, TournamentKind, TournamentStatus, UserId,
};
pub use store::{SweepReport, TournamentRecord, TournamentStore};
