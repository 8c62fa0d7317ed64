//! Setup: create a tournament from a wrestler selection.

use crate::logic::bracket::{create_bracket, round_count, shuffle_seeds};
use crate::models::{ChampionshipId, Tournament, TournamentError, WrestlerId};
use chrono::NaiveDate;
use rand::Rng;
use serde::Deserialize;
use uuid::Uuid;

/// Form input for a new tournament.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTournament {
    pub name: String,
    #[serde(default = "today")]
    pub date: NaiveDate,
    pub participants: u32,
    #[serde(default)]
    pub championship_id: Option<ChampionshipId>,
    /// Selected wrestlers, exactly `participants` of them.
    pub wrestler_ids: Vec<WrestlerId>,
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Create a tournament: validate the form, draw round 1 at random, generate the full bracket.
pub fn create_tournament<R: Rng + ?Sized>(
    new: NewTournament,
    rng: &mut R,
) -> Result<Tournament, TournamentError> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(TournamentError::MissingName);
    }
    round_count(new.participants)?;
    if new.wrestler_ids.len() != new.participants as usize {
        return Err(TournamentError::WrongNumberOfWrestlers {
            needed: new.participants,
            selected: new.wrestler_ids.len(),
        });
    }

    let seeds = shuffle_seeds(&new.wrestler_ids, rng);
    let matches = create_bracket(new.participants, &seeds)?;

    Ok(Tournament {
        id: Uuid::new_v4(),
        name: name.to_string(),
        date: new.date,
        participants: new.participants,
        matches,
        championship_id: new.championship_id,
        completed: false,
        winner: None,
    })
}
