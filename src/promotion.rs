//! The promotion's tournament desk: loads collections, runs the bracket engine,
//! applies its side effects and saves everything back.

use crate::logic::{self, NewTournament, RecordedResult};
use crate::models::{
    Championship, ChampionshipTransfer, Tournament, TournamentError, TournamentId, Wrestler,
};
use crate::storage::{
    load_collection, save_collection, KeyValueStore, StorageError, CHAMPIONSHIPS_KEY, HISTORY_KEY,
    TOURNAMENTS_KEY, WRESTLERS_KEY,
};
use log::{info, warn};
use rand::Rng;

/// Errors from promotion operations.
#[derive(Debug)]
pub enum PromotionError {
    Tournament(TournamentError),
    Storage(StorageError),
    TournamentNotFound(TournamentId),
}

impl std::fmt::Display for PromotionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromotionError::Tournament(e) => write!(f, "{}", e),
            PromotionError::Storage(e) => write!(f, "{}", e),
            PromotionError::TournamentNotFound(id) => write!(f, "Tournament {} not found", id),
        }
    }
}

impl std::error::Error for PromotionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PromotionError::Tournament(e) => Some(e),
            PromotionError::Storage(e) => Some(e),
            PromotionError::TournamentNotFound(_) => None,
        }
    }
}

impl From<TournamentError> for PromotionError {
    fn from(e: TournamentError) -> Self {
        PromotionError::Tournament(e)
    }
}

impl From<StorageError> for PromotionError {
    fn from(e: StorageError) -> Self {
        PromotionError::Storage(e)
    }
}

/// Tournaments, roster and championships kept in one key-value store.
#[derive(Debug)]
pub struct Promotion<S> {
    store: S,
}

impl<S: KeyValueStore> Promotion<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tournaments(&self) -> Result<Vec<Tournament>, PromotionError> {
        Ok(load_collection(&self.store, TOURNAMENTS_KEY)?)
    }

    pub fn tournament(&self, id: TournamentId) -> Result<Tournament, PromotionError> {
        self.tournaments()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(PromotionError::TournamentNotFound(id))
    }

    /// Snapshots of completed tournaments, oldest first.
    pub fn history(&self) -> Result<Vec<Tournament>, PromotionError> {
        Ok(load_collection(&self.store, HISTORY_KEY)?)
    }

    pub fn wrestlers(&self) -> Result<Vec<Wrestler>, PromotionError> {
        Ok(load_collection(&self.store, WRESTLERS_KEY)?)
    }

    pub fn championships(&self) -> Result<Vec<Championship>, PromotionError> {
        Ok(load_collection(&self.store, CHAMPIONSHIPS_KEY)?)
    }

    pub fn save_wrestlers(&self, wrestlers: &[Wrestler]) -> Result<(), PromotionError> {
        Ok(save_collection(&self.store, WRESTLERS_KEY, wrestlers)?)
    }

    pub fn save_championships(&self, championships: &[Championship]) -> Result<(), PromotionError> {
        Ok(save_collection(&self.store, CHAMPIONSHIPS_KEY, championships)?)
    }

    /// Create and store a tournament. Every selected wrestler must be on the roster
    /// and the championship, if any, must exist.
    pub fn create_tournament<R: Rng + ?Sized>(
        &self,
        new: NewTournament,
        rng: &mut R,
    ) -> Result<Tournament, PromotionError> {
        let wrestlers = self.wrestlers()?;
        if let Some(missing) = new
            .wrestler_ids
            .iter()
            .find(|id| !wrestlers.iter().any(|w| &w.id == *id))
        {
            return Err(TournamentError::WrestlerNotFound(missing.clone()).into());
        }
        if let Some(championship_id) = &new.championship_id {
            if !self.championships()?.iter().any(|c| &c.id == championship_id) {
                return Err(TournamentError::ChampionshipNotFound(championship_id.clone()).into());
            }
        }

        let tournament = logic::create_tournament(new, rng)?;
        let mut tournaments = self.tournaments()?;
        tournaments.push(tournament.clone());
        save_collection(&self.store, TOURNAMENTS_KEY, &tournaments)?;
        info!(
            "Created tournament {} ({}) with {} participants",
            tournament.id, tournament.name, tournament.participants
        );
        Ok(tournament)
    }

    /// Record a match winner and persist the result.
    ///
    /// A championship transfer reported by the engine is applied to the championship
    /// and roster records; if either record no longer exists the transfer is skipped
    /// with a warning and the result is still recorded. While a tournament is
    /// completed, its snapshot in the history is kept in sync (one entry per tournament).
    pub fn record_winner(
        &self,
        tournament_id: TournamentId,
        match_id: &str,
        winner_id: &str,
    ) -> Result<RecordedResult, PromotionError> {
        let mut tournaments = self.tournaments()?;
        let idx = tournaments
            .iter()
            .position(|t| t.id == tournament_id)
            .ok_or(PromotionError::TournamentNotFound(tournament_id))?;

        let result = logic::record_winner(&tournaments[idx], match_id, winner_id)?;

        // Transfers are idempotent, so they are saved before the tournament: if a later
        // save fails, recording the same winner again re-applies the transfer.
        if let Some(transfer) = &result.championship_transfer {
            self.apply_transfer(tournament_id, transfer)?;
        }

        tournaments[idx] = result.tournament.clone();
        save_collection(&self.store, TOURNAMENTS_KEY, &tournaments)?;

        if result.tournament.completed {
            let mut history = self.history()?;
            match history.iter_mut().find(|t| t.id == tournament_id) {
                Some(entry) => *entry = result.tournament.clone(),
                None => history.push(result.tournament.clone()),
            }
            save_collection(&self.store, HISTORY_KEY, &history)?;
        }
        Ok(result)
    }

    fn apply_transfer(
        &self,
        tournament_id: TournamentId,
        transfer: &ChampionshipTransfer,
    ) -> Result<(), PromotionError> {
        let mut championships = self.championships()?;
        let mut wrestlers = self.wrestlers()?;
        match logic::apply_championship_transfer(&mut championships, &mut wrestlers, transfer) {
            Ok(()) => {
                self.save_championships(&championships)?;
                self.save_wrestlers(&wrestlers)
            }
            Err(
                e @ (TournamentError::ChampionshipNotFound(_) | TournamentError::WrestlerNotFound(_)),
            ) => {
                warn!("Tournament {}: championship transfer skipped: {}", tournament_id, e);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a tournament. History snapshots are kept.
    pub fn delete_tournament(&self, id: TournamentId) -> Result<(), PromotionError> {
        let mut tournaments = self.tournaments()?;
        let before = tournaments.len();
        tournaments.retain(|t| t.id != id);
        if tournaments.len() == before {
            return Err(PromotionError::TournamentNotFound(id));
        }
        save_collection(&self.store, TOURNAMENTS_KEY, &tournaments)?;
        info!("Deleted tournament {}", id);
        Ok(())
    }

    /// Merge wrestlers into the roster: new ids are added, known ids get the new name.
    /// Returns how many wrestlers were added.
    pub fn import_roster(&self, imported: Vec<Wrestler>) -> Result<usize, PromotionError> {
        let mut wrestlers = self.wrestlers()?;
        let mut added = 0;
        for w in imported {
            match wrestlers.iter_mut().find(|existing| existing.id == w.id) {
                Some(existing) => existing.name = w.name,
                None => {
                    wrestlers.push(w);
                    added += 1;
                }
            }
        }
        self.save_wrestlers(&wrestlers)?;
        info!("Roster import: {} added, {} total", added, wrestlers.len());
        Ok(added)
    }
}
