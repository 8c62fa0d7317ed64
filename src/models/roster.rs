//! Wrestler and Championship records as kept by the roster and championship stores.
//!
//! Only the fields the bracket workflow touches are typed; anything else stored
//! alongside (alignment, finisher, images, ...) round-trips through `extra`.

use crate::models::bracket_match::WrestlerId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a championship in the championship store.
pub type ChampionshipId = String;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wrestler {
    pub id: WrestlerId,
    pub name: String,
    /// Championships currently held.
    #[serde(default)]
    pub championships: Vec<ChampionshipId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Wrestler {
    pub fn new(id: impl Into<WrestlerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            championships: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn holds(&self, championship_id: &str) -> bool {
        self.championships.iter().any(|c| c == championship_id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Championship {
    pub id: ChampionshipId,
    pub name: String,
    /// None while vacant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_holder: Option<WrestlerId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Championship {
    pub fn new(id: impl Into<ChampionshipId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            current_holder: None,
            extra: Map::new(),
        }
    }
}

/// A championship holder change reported by the engine for the caller to apply.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionshipTransfer {
    pub championship_id: ChampionshipId,
    pub new_holder_id: WrestlerId,
}
