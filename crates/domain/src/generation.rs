//! Generation - distance from Caine, which bounds trait ratings and blood.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A validated generation (3..=15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Generation(u8);

impl Generation {
    pub const MIN: u8 = 3;
    pub const MAX: u8 = 15;

    /// Create a validated generation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` outside 3..=15.
    pub fn new(generation: u8) -> Result<Self, DomainError> {
        if !(Self::MIN..=Self::MAX).contains(&generation) {
            return Err(DomainError::validation(format!(
                "Generation must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                generation
            )));
        }
        Ok(Self(generation))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Highest rating any generation-bound trait may reach.
    pub fn trait_ceiling(&self) -> u8 {
        match self.0 {
            3 => 10,
            4 => 9,
            5 => 8,
            6 => 7,
            7 => 6,
            _ => 5,
        }
    }

    /// Blood pool size.
    pub fn blood_pool(&self) -> u8 {
        match self.0 {
            3 | 4 => 50,
            5 => 40,
            6 => 30,
            7 => 20,
            8 => 15,
            9 => 14,
            10 => 13,
            11 => 12,
            12 => 11,
            _ => 10,
        }
    }

    /// Blood points spendable per turn.
    pub fn blood_per_turn(&self) -> u8 {
        match self.0 {
            3 | 4 => 10,
            5 => 8,
            6 => 6,
            7 => 4,
            8 => 3,
            9 => 2,
            _ => 1,
        }
    }
}

impl Default for Generation {
    fn default() -> Self {
        Self(13)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Generation {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Generation> for u8 {
    fn from(generation: Generation) -> u8 {
        generation.0
    }
}
