//! The finished character handed to exporters once creation completes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::budget::FreebiePool;
use crate::catalog::Category;
use crate::clan::Clan;
use crate::concept::ConceptSheet;
use crate::generation::Generation;
use crate::ids::CharacterId;
use crate::weighting::Weighting;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedTrait {
    pub key: String,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedCategory {
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighting: Option<Weighting>,
    pub traits: Vec<RecordedTrait>,
}

/// An immutable, fully built character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    pub id: CharacterId,
    pub created_at: DateTime<Utc>,
    pub concept: ConceptSheet,
    pub clan: Clan,
    pub clan_weakness: String,
    pub generation: Generation,
    pub blood_pool: u8,
    pub blood_per_turn: u8,
    pub categories: Vec<RecordedCategory>,
    pub merits: Vec<String>,
    pub flaws: Vec<String>,
    pub road: String,
    /// Conscience + Self-Control
    pub road_rating: u8,
    /// Starts equal to Courage
    pub willpower: u8,
    pub freebies: FreebiePool,
}

impl CharacterRecord {
    /// Value of one trait, if the record has it.
    pub fn trait_value(&self, category: Category, key: &str) -> Option<u8> {
        self.categories
            .iter()
            .find(|c| c.category == category)?
            .traits
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value)
    }
}
