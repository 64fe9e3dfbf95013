//! Bracket engine: pool resolution, seeding, construction, advancement, start gating.

mod advancement;
mod bracket;
mod pool;
mod seeding;
mod start;

pub use advancement::{advance_winner, begin_match, report_result, Advancement};
pub use bracket::{build_bracket, Bracket, BracketShape};
pub use pool::resolve_pool;
pub use seeding::shuffle_pool;
pub use start::start_tournament;
