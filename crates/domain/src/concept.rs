//! Concept fields - the free-text identity of the character.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Maximum length of any concept field
const MAX_FIELD_LENGTH: usize = 200;

/// Road used when none was entered.
pub const DEFAULT_ROAD: &str = "Humanity";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptField {
    Name,
    Nickname,
    Player,
    Chronicle,
    Nature,
    Demeanor,
    Concept,
    Sire,
    Haven,
    Road,
}

impl ConceptField {
    pub const ALL: [ConceptField; 10] = [
        Self::Name,
        Self::Nickname,
        Self::Player,
        Self::Chronicle,
        Self::Nature,
        Self::Demeanor,
        Self::Concept,
        Self::Sire,
        Self::Haven,
        Self::Road,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Nickname => "nickname",
            Self::Player => "player",
            Self::Chronicle => "chronicle",
            Self::Nature => "nature",
            Self::Demeanor => "demeanor",
            Self::Concept => "concept",
            Self::Sire => "sire",
            Self::Haven => "haven",
            Self::Road => "road",
        }
    }

    /// Must be filled in before the attributes step unlocks.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Self::Name | Self::Player | Self::Nature | Self::Demeanor | Self::Concept
        )
    }
}

impl fmt::Display for ConceptField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConceptField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::parse(format!("Unknown concept field: {}", s)))
    }
}

/// The character's text fields. Blank values are not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptSheet(BTreeMap<ConceptField, String>);

impl ConceptSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field; a blank value clears it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the trimmed value exceeds 200 characters.
    pub fn set(&mut self, field: ConceptField, value: impl Into<String>) -> Result<(), DomainError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.chars().count() > MAX_FIELD_LENGTH {
            return Err(DomainError::validation(format!(
                "{} cannot exceed {} characters",
                field, MAX_FIELD_LENGTH
            )));
        }
        if trimmed.is_empty() {
            self.0.remove(&field);
        } else {
            self.0.insert(field, trimmed.to_string());
        }
        Ok(())
    }

    pub fn get(&self, field: ConceptField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn missing_required(&self) -> Vec<ConceptField> {
        ConceptField::ALL
            .into_iter()
            .filter(|f| f.is_required() && self.get(*f).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    pub fn road(&self) -> &str {
        self.get(ConceptField::Road).unwrap_or(DEFAULT_ROAD)
    }
}
