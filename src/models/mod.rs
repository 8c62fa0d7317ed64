//! Data structures for promotion tournaments: bracket matches, tournaments, roster records.

mod bracket_match;
mod roster;
mod tournament;

pub use bracket_match::{match_id, BracketMatch, MatchId, Slot, WrestlerId};
pub use roster::{Championship, ChampionshipId, ChampionshipTransfer, Wrestler};
pub use tournament::{Tournament, TournamentError, TournamentId};
