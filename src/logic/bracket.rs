//! Bracket generation: the empty single-elimination bracket and round-1 seeding.

use crate::models::{BracketMatch, TournamentError, WrestlerId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Number of rounds for `participants`, which must be a power of two of at least 2.
pub fn round_count(participants: u32) -> Result<u32, TournamentError> {
    if participants < 2 || !participants.is_power_of_two() {
        return Err(TournamentError::InvalidParticipantCount(participants));
    }
    Ok(participants.ilog2())
}

/// Generate every match of the bracket with empty slots.
///
/// Round `r` gets `participants / 2^r` matches at positions `1..=count`, so the
/// bracket holds `participants - 1` matches and the final is the only match of
/// the last round. Matches are ordered by round, then position.
pub fn generate_matches(participants: u32) -> Result<Vec<BracketMatch>, TournamentError> {
    let rounds = round_count(participants)?;
    let mut matches = Vec::with_capacity(participants as usize - 1);
    for round in 1..=rounds {
        let matches_in_round = participants >> round;
        for position in 1..=matches_in_round {
            matches.push(BracketMatch::new(round, position));
        }
    }
    Ok(matches)
}

/// Generate the bracket and seed round 1 in the given order: the match at
/// position `p` gets `seeded_ids[2(p-1)]` and `seeded_ids[2(p-1)+1]`.
///
/// Seeds are used as given; shuffle them first with [`shuffle_seeds`] for a random draw.
pub fn create_bracket(
    participants: u32,
    seeded_ids: &[WrestlerId],
) -> Result<Vec<BracketMatch>, TournamentError> {
    let mut matches = generate_matches(participants)?;
    if seeded_ids.len() != participants as usize {
        return Err(TournamentError::WrongNumberOfWrestlers {
            needed: participants,
            selected: seeded_ids.len(),
        });
    }
    let mut seen = HashSet::with_capacity(seeded_ids.len());
    for id in seeded_ids {
        if !seen.insert(id.as_str()) {
            return Err(TournamentError::DuplicateWrestler(id.clone()));
        }
    }

    for (m, pair) in matches
        .iter_mut()
        .filter(|m| m.round == 1)
        .zip(seeded_ids.chunks_exact(2))
    {
        m.wrestler1_id = Some(pair[0].clone());
        m.wrestler2_id = Some(pair[1].clone());
    }
    Ok(matches)
}

/// Uniformly random permutation of the selected wrestlers (Fisher-Yates).
pub fn shuffle_seeds<R: Rng + ?Sized>(wrestler_ids: &[WrestlerId], rng: &mut R) -> Vec<WrestlerId> {
    let mut seeds = wrestler_ids.to_vec();
    seeds.shuffle(rng);
    seeds
}
