//! Tournament and TournamentError.

use crate::models::bracket_match::{BracketMatch, MatchId, WrestlerId};
use crate::models::roster::ChampionshipId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Tournament name is empty (after trimming).
    MissingName,
    /// Participant count is not a power of two of at least 2.
    InvalidParticipantCount(u32),
    /// Wrong number of wrestlers selected for the participant count.
    WrongNumberOfWrestlers { needed: u32, selected: usize },
    /// The same wrestler was selected twice.
    DuplicateWrestler(WrestlerId),
    /// No match with this id in the bracket.
    MatchNotFound(MatchId),
    /// Match does not have both wrestlers yet.
    MatchNotReady(MatchId),
    /// The declared winner is in neither slot of the match.
    WinnerNotInMatch { match_id: MatchId, winner_id: WrestlerId },
    /// Changing this result would contradict a later match that is already decided.
    DownstreamMatchDecided { match_id: MatchId, next_match_id: MatchId },
    /// Wrestler is not in the roster.
    WrestlerNotFound(WrestlerId),
    /// Championship does not exist.
    ChampionshipNotFound(ChampionshipId),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::MissingName => write!(f, "Tournament name is required"),
            TournamentError::InvalidParticipantCount(n) => {
                write!(f, "Participant count must be a power of two (got {})", n)
            }
            TournamentError::WrongNumberOfWrestlers { needed, selected } => {
                write!(f, "Please select exactly {} wrestlers (selected {})", needed, selected)
            }
            TournamentError::DuplicateWrestler(id) => {
                write!(f, "Wrestler {} was selected more than once", id)
            }
            TournamentError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            TournamentError::MatchNotReady(id) => {
                write!(f, "Match {} does not have two wrestlers yet", id)
            }
            TournamentError::WinnerNotInMatch { match_id, winner_id } => {
                write!(f, "Wrestler {} is not in match {}", winner_id, match_id)
            }
            TournamentError::DownstreamMatchDecided { match_id, next_match_id } => write!(
                f,
                "Cannot change the winner of {}: match {} is already decided",
                match_id, next_match_id
            ),
            TournamentError::WrestlerNotFound(id) => write!(f, "Wrestler {} not found", id),
            TournamentError::ChampionshipNotFound(id) => write!(f, "Championship {} not found", id),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// A single-elimination tournament: the full bracket plus the derived result.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub date: NaiveDate,
    /// Power of two, fixed at creation.
    pub participants: u32,
    /// Every (round, position) of the bracket, later rounds with empty slots until filled.
    pub matches: Vec<BracketMatch>,
    /// If set, the winner becomes this championship's holder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub championship_id: Option<ChampionshipId>,
    /// Derived: final match has a winner.
    #[serde(default)]
    pub completed: bool,
    /// Derived: the final match's winner when completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<WrestlerId>,
}

impl Tournament {
    /// Number of rounds; the final is round `rounds()`.
    pub fn rounds(&self) -> u32 {
        self.participants.checked_ilog2().unwrap_or(0)
    }

    pub fn find_match(&self, match_id: &str) -> Option<&BracketMatch> {
        self.matches.iter().find(|m| m.id == match_id)
    }

    pub fn match_at(&self, round: u32, position: u32) -> Option<&BracketMatch> {
        self.matches
            .iter()
            .find(|m| m.round == round && m.position == position)
    }

    pub fn match_at_mut(&mut self, round: u32, position: u32) -> Option<&mut BracketMatch> {
        self.matches
            .iter_mut()
            .find(|m| m.round == round && m.position == position)
    }

    /// The single match of the last round.
    pub fn final_match(&self) -> Option<&BracketMatch> {
        self.match_at(self.rounds(), 1)
    }

    /// Matches of `round`, ordered by position.
    pub fn round_matches(&self, round: u32) -> Vec<&BracketMatch> {
        let mut matches: Vec<_> = self.matches.iter().filter(|m| m.round == round).collect();
        matches.sort_by_key(|m| m.position);
        matches
    }
}
