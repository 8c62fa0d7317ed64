//! A single bracket match, addressed by round and position.

use serde::{Deserialize, Serialize};

/// Identifier of a wrestler in the roster store (opaque).
pub type WrestlerId = String;

/// Match id, always `"<round>-<position>"`.
pub type MatchId = String;

/// Build the id for the match at `round` / `position` (both 1-based).
pub fn match_id(round: u32, position: u32) -> MatchId {
    format!("{}-{}", round, position)
}

/// Which of the two wrestler slots of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    /// Slot of the next-round match fed by a match at `position`.
    /// Odd positions feed the first slot, even positions the second.
    pub fn fed_by(position: u32) -> Self {
        if position % 2 == 1 {
            Slot::First
        } else {
            Slot::Second
        }
    }
}

/// One match of the bracket. Empty slots are shown as TBD.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketMatch {
    pub id: MatchId,
    pub round: u32,
    pub position: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrestler1_id: Option<WrestlerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrestler2_id: Option<WrestlerId>,
    /// None until decided; otherwise one of the two slots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<WrestlerId>,
}

impl BracketMatch {
    /// An undecided match with both slots empty.
    pub fn new(round: u32, position: u32) -> Self {
        Self {
            id: match_id(round, position),
            round,
            position,
            wrestler1_id: None,
            wrestler2_id: None,
            winner_id: None,
        }
    }

    pub fn slot(&self, slot: Slot) -> Option<&WrestlerId> {
        match slot {
            Slot::First => self.wrestler1_id.as_ref(),
            Slot::Second => self.wrestler2_id.as_ref(),
        }
    }

    pub fn set_slot(&mut self, slot: Slot, wrestler_id: Option<WrestlerId>) {
        match slot {
            Slot::First => self.wrestler1_id = wrestler_id,
            Slot::Second => self.wrestler2_id = wrestler_id,
        }
    }

    /// True if `wrestler_id` occupies either slot.
    pub fn has_wrestler(&self, wrestler_id: &str) -> bool {
        self.wrestler1_id.as_deref() == Some(wrestler_id)
            || self.wrestler2_id.as_deref() == Some(wrestler_id)
    }

    pub fn is_decided(&self) -> bool {
        self.winner_id.is_some()
    }

    /// Round and position of the match the winner advances to.
    /// None if the round number cannot be incremented.
    pub fn next_round_position(&self) -> Option<(u32, u32)> {
        Some((self.round.checked_add(1)?, self.position.div_ceil(2)))
    }
}
