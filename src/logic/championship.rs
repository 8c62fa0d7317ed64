//! Applying a championship transfer to the championship and roster records.

use crate::models::{Championship, ChampionshipTransfer, TournamentError, Wrestler};
use log::info;

/// Make `transfer.new_holder_id` the holder of `transfer.championship_id`.
///
/// The championship is added to the new holder's list and removed from the previous
/// holder's. Fails with `ChampionshipNotFound` or `WrestlerNotFound`, leaving both
/// slices untouched, if either record is missing. Applying the same transfer twice
/// is a no-op the second time.
pub fn apply_championship_transfer(
    championships: &mut [Championship],
    wrestlers: &mut [Wrestler],
    transfer: &ChampionshipTransfer,
) -> Result<(), TournamentError> {
    let championship = championships
        .iter_mut()
        .find(|c| c.id == transfer.championship_id)
        .ok_or_else(|| TournamentError::ChampionshipNotFound(transfer.championship_id.clone()))?;
    if !wrestlers.iter().any(|w| w.id == transfer.new_holder_id) {
        return Err(TournamentError::WrestlerNotFound(transfer.new_holder_id.clone()));
    }

    let previous = championship
        .current_holder
        .replace(transfer.new_holder_id.clone());
    if previous.as_deref() != Some(transfer.new_holder_id.as_str()) {
        info!(
            "{} changes hands: {} -> {}",
            championship.name,
            previous.as_deref().unwrap_or("vacant"),
            transfer.new_holder_id
        );
    }

    for wrestler in wrestlers.iter_mut() {
        if wrestler.id == transfer.new_holder_id {
            if !wrestler.holds(&transfer.championship_id) {
                wrestler.championships.push(transfer.championship_id.clone());
            }
        } else if previous.as_deref() == Some(wrestler.id.as_str()) {
            wrestler.championships.retain(|c| *c != transfer.championship_id);
        }
    }
    Ok(())
}
