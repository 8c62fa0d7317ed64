//! Tournament business logic: bracket generation, setup, results, championship transfers.
//!
//! Everything here is pure over in-memory values; loading and saving is the caller's job.

mod bracket;
mod championship;
mod results;
mod setup;

pub use bracket::{create_bracket, generate_matches, round_count, shuffle_seeds};
pub use championship::apply_championship_transfer;
pub use results::{record_winner, refresh_completion, RecordedResult};
pub use setup::{create_tournament, NewTournament};
