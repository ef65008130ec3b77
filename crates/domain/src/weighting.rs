//! Weighting tiers and the three-slot assignment that keeps them a permutation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::WeightedGroup;
use crate::error::DomainError;

/// Priority tier of a weighted category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    Primary,
    Secondary,
    Tertiary,
}

impl Weighting {
    pub const ALL: [Weighting; 3] = [Self::Primary, Self::Secondary, Self::Tertiary];

    /// Dots available to an attribute category holding this tier.
    pub fn attribute_max(&self) -> u32 {
        match self {
            Self::Primary => 7,
            Self::Secondary => 5,
            Self::Tertiary => 3,
        }
    }

    /// Dots available to an ability category holding this tier.
    pub fn ability_max(&self) -> u32 {
        match self {
            Self::Primary => 13,
            Self::Secondary => 9,
            Self::Tertiary => 5,
        }
    }

    pub fn max_for(&self, group: WeightedGroup) -> u32 {
        match group {
            WeightedGroup::Attributes => self.attribute_max(),
            WeightedGroup::Abilities => self.ability_max(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Tertiary => "tertiary",
        }
    }
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Weighting {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            "tertiary" => Ok(Self::Tertiary),
            _ => Err(DomainError::parse(format!("Unknown weighting: {}", s))),
        }
    }
}

/// Tier assignment of the three categories in a weighted group.
///
/// # Invariants
///
/// - No two slots hold the same tier. Unassigned slots are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightingSlots([Option<Weighting>; 3]);

impl WeightingSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: usize) -> Option<Weighting> {
        self.0[slot]
    }

    pub fn is_fully_assigned(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    /// Assign `tier` to `slot`, repairing whichever other slot already held it.
    ///
    /// The repaired slot takes the tier `slot` held before the edit, or, when
    /// `slot` was unassigned, the first tier held by neither of the other two.
    /// The edited slot itself is never changed back. Returns the repaired slot.
    pub fn assign(&mut self, slot: usize, tier: Weighting) -> Option<usize> {
        let previous = self.0[slot];
        if previous == Some(tier) {
            return None;
        }
        self.0[slot] = Some(tier);

        let conflict = (0..3).find(|&other| other != slot && self.0[other] == Some(tier))?;
        let third = 3 - slot - conflict;
        let replacement = previous.or_else(|| {
            Weighting::ALL
                .into_iter()
                .find(|t| Some(*t) != self.0[slot] && Some(*t) != self.0[third])
        });
        self.0[conflict] = replacement;
        Some(conflict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distinct(slots: &WeightingSlots) -> bool {
        let assigned: Vec<_> = (0..3).filter_map(|i| slots.get(i)).collect();
        assigned
            .iter()
            .enumerate()
            .all(|(i, a)| assigned[i + 1..].iter().all(|b| a != b))
    }

    #[test]
    fn tier_tables() {
        assert_eq!(Weighting::Primary.attribute_max(), 7);
        assert_eq!(Weighting::Secondary.attribute_max(), 5);
        assert_eq!(Weighting::Tertiary.attribute_max(), 3);
        assert_eq!(Weighting::Primary.ability_max(), 13);
        assert_eq!(Weighting::Tertiary.max_for(WeightedGroup::Abilities), 5);
    }

    #[test]
    fn assigning_free_tier_repairs_nothing() {
        let mut slots = WeightingSlots::new();
        assert_eq!(slots.assign(0, Weighting::Primary), None);
        assert_eq!(slots.assign(1, Weighting::Secondary), None);
        assert_eq!(slots.get(0), Some(Weighting::Primary));
        assert_eq!(slots.get(2), None);
    }

    #[test]
    fn conflicting_slot_takes_previous_tier() {
        let mut slots = WeightingSlots::new();
        slots.assign(0, Weighting::Primary);
        slots.assign(1, Weighting::Secondary);
        slots.assign(2, Weighting::Tertiary);

        assert_eq!(slots.assign(2, Weighting::Primary), Some(0));
        assert_eq!(slots.get(0), Some(Weighting::Tertiary));
        assert_eq!(slots.get(1), Some(Weighting::Secondary));
        assert_eq!(slots.get(2), Some(Weighting::Primary));
    }

    #[test]
    fn unassigned_editor_gives_conflict_an_unused_tier() {
        let mut slots = WeightingSlots::new();
        slots.assign(0, Weighting::Primary);
        slots.assign(2, Weighting::Secondary);

        assert_eq!(slots.assign(1, Weighting::Primary), Some(0));
        assert_eq!(slots.get(1), Some(Weighting::Primary));
        assert_eq!(slots.get(0), Some(Weighting::Tertiary));
        assert!(slots.is_fully_assigned());
    }

    #[test]
    fn repeated_assignment_is_idempotent() {
        let mut slots = WeightingSlots::new();
        slots.assign(0, Weighting::Primary);
        slots.assign(1, Weighting::Secondary);
        slots.assign(2, Weighting::Tertiary);

        slots.assign(1, Weighting::Primary);
        let after_first = slots;
        assert_eq!(slots.assign(1, Weighting::Primary), None);
        assert_eq!(slots, after_first);
    }

    #[test]
    fn tiers_stay_distinct_under_any_edit_sequence() {
        let mut slots = WeightingSlots::new();
        for step in 0..27 {
            let slot = step % 3;
            let tier = Weighting::ALL[(step / 3) % 3];
            slots.assign(slot, tier);
            assert!(distinct(&slots), "duplicate tiers after step {step}: {slots:?}");
        }
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Primary".parse::<Weighting>().unwrap(), Weighting::Primary);
        assert!("quaternary".parse::<Weighting>().is_err());
    }
}
