//! Wrestling promotion tournaments: library with models, the bracket engine and persistence.

pub mod config;
pub mod logic;
pub mod models;
pub mod promotion;
pub mod storage;

pub use config::Config;
pub use logic::{
    apply_championship_transfer, create_bracket, create_tournament, generate_matches,
    record_winner, refresh_completion, round_count, shuffle_seeds, NewTournament, RecordedResult,
};
pub use models::{
    match_id, BracketMatch, Championship, ChampionshipId, ChampionshipTransfer, MatchId, Slot,
    Tournament, TournamentError, TournamentId, Wrestler, WrestlerId,
};
pub use promotion::{Promotion, PromotionError};
pub use storage::{import_roster_csv, JsonDirStore, KeyValueStore, MemoryStore, StorageError};
