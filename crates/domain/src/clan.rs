//! Clans and the per-clan rules the creation session applies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::Category;
use crate::error::DomainError;

/// A trait whose range a clan replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraitOverride {
    pub category: Category,
    pub key: &'static str,
    pub minimum: u8,
    pub maximum: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clan {
    Assamite,
    Brujah,
    FollowersOfSet,
    Gangrel,
    Giovanni,
    Lasombra,
    Malkavian,
    Nosferatu,
    Ravnos,
    Toreador,
    Tremere,
    Tzimisce,
    Ventrue,
    Caitiff,
}

const NOSFERATU_OVERRIDES: &[TraitOverride] = &[TraitOverride {
    category: Category::Social,
    key: "appearance",
    minimum: 0,
    maximum: 0,
}];

impl Clan {
    pub const ALL: [Clan; 14] = [
        Self::Assamite,
        Self::Brujah,
        Self::FollowersOfSet,
        Self::Gangrel,
        Self::Giovanni,
        Self::Lasombra,
        Self::Malkavian,
        Self::Nosferatu,
        Self::Ravnos,
        Self::Toreador,
        Self::Tremere,
        Self::Tzimisce,
        Self::Ventrue,
        Self::Caitiff,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assamite => "assamite",
            Self::Brujah => "brujah",
            Self::FollowersOfSet => "followers_of_set",
            Self::Gangrel => "gangrel",
            Self::Giovanni => "giovanni",
            Self::Lasombra => "lasombra",
            Self::Malkavian => "malkavian",
            Self::Nosferatu => "nosferatu",
            Self::Ravnos => "ravnos",
            Self::Toreador => "toreador",
            Self::Tremere => "tremere",
            Self::Tzimisce => "tzimisce",
            Self::Ventrue => "ventrue",
            Self::Caitiff => "caitiff",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Assamite => "Assamite",
            Self::Brujah => "Brujah",
            Self::FollowersOfSet => "Followers of Set",
            Self::Gangrel => "Gangrel",
            Self::Giovanni => "Giovanni",
            Self::Lasombra => "Lasombra",
            Self::Malkavian => "Malkavian",
            Self::Nosferatu => "Nosferatu",
            Self::Ravnos => "Ravnos",
            Self::Toreador => "Toreador",
            Self::Tremere => "Tremere",
            Self::Tzimisce => "Tzimisce",
            Self::Ventrue => "Ventrue",
            Self::Caitiff => "Caitiff",
        }
    }

    /// Discipline keys the clan learns in-clan. Caitiff have none.
    pub fn disciplines(&self) -> &'static [&'static str] {
        match self {
            Self::Assamite => &["celerity", "obfuscate", "quietus"],
            Self::Brujah => &["celerity", "potence", "presence"],
            Self::FollowersOfSet => &["obfuscate", "presence", "serpentis"],
            Self::Gangrel => &["animalism", "fortitude", "protean"],
            Self::Giovanni => &["dominate", "necromancy", "potence"],
            Self::Lasombra => &["dominate", "obtenebration", "potence"],
            Self::Malkavian => &["auspex", "dementation", "obfuscate"],
            Self::Nosferatu => &["animalism", "obfuscate", "potence"],
            Self::Ravnos => &["animalism", "chimerstry", "fortitude"],
            Self::Toreador => &["auspex", "celerity", "presence"],
            Self::Tremere => &["auspex", "dominate", "thaumaturgy"],
            Self::Tzimisce => &["animalism", "auspex", "vicissitude"],
            Self::Ventrue => &["dominate", "fortitude", "presence"],
            Self::Caitiff => &[],
        }
    }

    pub fn weakness(&self) -> &'static str {
        match self {
            Self::Assamite => "Addicted to the vitae of other Kindred; diablerie tithe to the clan",
            Self::Brujah => "Difficulty to resist frenzy is two higher",
            Self::FollowersOfSet => "Bright light inflicts extra damage",
            Self::Gangrel => "Each frenzy leaves a permanent animal feature",
            Self::Giovanni => "The Kiss inflicts twice the normal damage on mortals",
            Self::Lasombra => "Casts no reflection",
            Self::Malkavian => "Permanently afflicted with at least one derangement",
            Self::Nosferatu => "Monstrous appearance; Appearance is always zero",
            Self::Ravnos => "Compelled toward one particular vice",
            Self::Toreador => "Can be entranced by beauty",
            Self::Tremere => "One step blood bound to the clan elders",
            Self::Tzimisce => "Must rest with two handfuls of native soil",
            Self::Ventrue => "Can feed only from one kind of mortal",
            Self::Caitiff => "No clan to call upon",
        }
    }

    /// Traits whose range this clan replaces.
    pub fn trait_overrides(&self) -> &'static [TraitOverride] {
        match self {
            Self::Nosferatu => NOSFERATU_OVERRIDES,
            _ => &[],
        }
    }
}

impl fmt::Display for Clan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Clan {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| DomainError::parse(format!("Unknown clan: {}", s)))
    }
}
