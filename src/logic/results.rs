//! Match results: record a winner, advance them, detect completion.

use crate::models::{ChampionshipTransfer, Slot, Tournament, TournamentError};
use log::{debug, info};
use serde::Serialize;

/// Outcome of [`record_winner`]: the updated tournament and, once it is complete
/// with a championship on the line, the holder change for the caller to apply.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedResult {
    pub tournament: Tournament,
    pub championship_transfer: Option<ChampionshipTransfer>,
}

/// Record `winner_id` as the winner of `match_id`.
///
/// 1. Sets the match's winner (both slots must be filled and one must be the winner).
/// 2. Advances the winner to `(round + 1, ceil(position / 2))`: odd positions
///    fill the first slot, even positions the second. No-op for the final.
/// 3. Recomputes `completed` / `winner` from the final match.
/// 4. Reports a championship transfer if the tournament is complete and has a championship.
///
/// Recording the same winner again yields the same tournament. A different winner is
/// accepted only while the next match is undecided, since its slot is simply overwritten.
/// The input is never modified.
pub fn record_winner(
    tournament: &Tournament,
    match_id: &str,
    winner_id: &str,
) -> Result<RecordedResult, TournamentError> {
    let mut updated = tournament.clone();

    let idx = updated
        .matches
        .iter()
        .position(|m| m.id == match_id)
        .ok_or_else(|| TournamentError::MatchNotFound(match_id.to_string()))?;
    let decided = &updated.matches[idx];
    if decided.wrestler1_id.is_none() || decided.wrestler2_id.is_none() {
        return Err(TournamentError::MatchNotReady(decided.id.clone()));
    }
    if !decided.has_wrestler(winner_id) {
        return Err(TournamentError::WinnerNotInMatch {
            match_id: decided.id.clone(),
            winner_id: winner_id.to_string(),
        });
    }

    let next_at = decided.next_round_position();
    let slot = Slot::fed_by(decided.position);
    if let Some(next) = next_at.and_then(|(round, position)| updated.match_at(round, position)) {
        let feed_changes = next.slot(slot).map(String::as_str) != Some(winner_id);
        if next.is_decided() && feed_changes {
            return Err(TournamentError::DownstreamMatchDecided {
                match_id: decided.id.clone(),
                next_match_id: next.id.clone(),
            });
        }
    }

    let tournament_id = updated.id;
    updated.matches[idx].winner_id = Some(winner_id.to_string());
    if let Some((round, position)) = next_at {
        if let Some(next) = updated.match_at_mut(round, position) {
            next.set_slot(slot, Some(winner_id.to_string()));
            debug!(
                "Tournament {}: {} advances from {} to {} ({:?} slot)",
                tournament_id, winner_id, match_id, next.id, slot
            );
        }
    }

    let was_completed = tournament.completed;
    refresh_completion(&mut updated);
    if updated.completed && !was_completed {
        info!(
            "Tournament {} ({}) completed, winner {}",
            updated.id,
            updated.name,
            updated.winner.as_deref().unwrap_or_default()
        );
    }

    let championship_transfer = championship_transfer(&updated);
    Ok(RecordedResult {
        tournament: updated,
        championship_transfer,
    })
}

/// Recompute `completed` and `winner` from the final match.
pub fn refresh_completion(tournament: &mut Tournament) {
    let winner = tournament.final_match().and_then(|m| m.winner_id.clone());
    tournament.completed = winner.is_some();
    tournament.winner = winner;
}

fn championship_transfer(tournament: &Tournament) -> Option<ChampionshipTransfer> {
    if !tournament.completed {
        return None;
    }
    Some(ChampionshipTransfer {
        championship_id: tournament.championship_id.clone()?,
        new_holder_id: tournament.winner.clone()?,
    })
}
