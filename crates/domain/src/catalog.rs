//! Trait catalog - the read-only lookup table the budget engine is built from.
//!
//! Categories are a closed enum; their design maxima and exchange rates live in
//! lookup tables on the enum instead of being selected by name at runtime.
//! The catalog itself lists, per category, the trait keys with their display
//! labels, minimums, and hard caps, plus the merits and flaws with their flat
//! freebie costs.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

// =============================================================================
// Categories
// =============================================================================

/// A pool of allocatable trait dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Physical,
    Social,
    Mental,
    Talents,
    Skills,
    Knowledges,
    Backgrounds,
    Disciplines,
    Virtues,
}

/// Coarse grouping of categories, one per creation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryGroup {
    Attributes,
    Abilities,
    Advantages,
}

/// A group of three categories that share the three weighting tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightedGroup {
    Attributes,
    Abilities,
}

impl WeightedGroup {
    pub const ALL: [WeightedGroup; 2] = [Self::Attributes, Self::Abilities];

    /// Member categories, in slot order.
    pub fn members(self) -> [Category; 3] {
        match self {
            Self::Attributes => [Category::Physical, Category::Social, Category::Mental],
            Self::Abilities => [Category::Talents, Category::Skills, Category::Knowledges],
        }
    }
}

impl Category {
    pub const ALL: [Category; 9] = [
        Self::Physical,
        Self::Social,
        Self::Mental,
        Self::Talents,
        Self::Skills,
        Self::Knowledges,
        Self::Backgrounds,
        Self::Disciplines,
        Self::Virtues,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Social => "social",
            Self::Mental => "mental",
            Self::Talents => "talents",
            Self::Skills => "skills",
            Self::Knowledges => "knowledges",
            Self::Backgrounds => "backgrounds",
            Self::Disciplines => "disciplines",
            Self::Virtues => "virtues",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Physical => "Physical",
            Self::Social => "Social",
            Self::Mental => "Mental",
            Self::Talents => "Talents",
            Self::Skills => "Skills",
            Self::Knowledges => "Knowledges",
            Self::Backgrounds => "Backgrounds",
            Self::Disciplines => "Disciplines",
            Self::Virtues => "Virtues",
        }
    }

    pub fn group(&self) -> CategoryGroup {
        match self {
            Self::Physical | Self::Social | Self::Mental => CategoryGroup::Attributes,
            Self::Talents | Self::Skills | Self::Knowledges => CategoryGroup::Abilities,
            Self::Backgrounds | Self::Disciplines | Self::Virtues => CategoryGroup::Advantages,
        }
    }

    /// The weighted group and slot index, for categories driven by a weighting tier.
    pub fn weighted_slot(&self) -> Option<(WeightedGroup, usize)> {
        match self {
            Self::Physical => Some((WeightedGroup::Attributes, 0)),
            Self::Social => Some((WeightedGroup::Attributes, 1)),
            Self::Mental => Some((WeightedGroup::Attributes, 2)),
            Self::Talents => Some((WeightedGroup::Abilities, 0)),
            Self::Skills => Some((WeightedGroup::Abilities, 1)),
            Self::Knowledges => Some((WeightedGroup::Abilities, 2)),
            Self::Backgrounds | Self::Disciplines | Self::Virtues => None,
        }
    }

    pub fn is_weighted(&self) -> bool {
        self.weighted_slot().is_some()
    }

    /// Design maximum for categories that are not weighted.
    pub fn fixed_design_maximum(&self) -> Option<u32> {
        match self {
            Self::Backgrounds => Some(5),
            Self::Disciplines => Some(4),
            Self::Virtues => Some(7),
            _ => None,
        }
    }

    /// Freebie cost of one dot of overspend.
    pub fn exchange_rate(&self) -> u32 {
        match self {
            Self::Physical | Self::Social | Self::Mental => 5,
            Self::Talents | Self::Skills | Self::Knowledges => 2,
            Self::Backgrounds => 1,
            Self::Disciplines => 7,
            Self::Virtues => 2,
        }
    }

    /// Whether the generation trait ceiling applies to this category.
    pub fn follows_generation(&self) -> bool {
        !matches!(self, Self::Backgrounds | Self::Virtues)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::parse(format!("Unknown category: {}", s)))
    }
}

// =============================================================================
// Definitions
// =============================================================================

/// One allocatable trait in a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitDefinition {
    pub key: String,
    pub label: String,
    pub minimum: u8,
    pub hard_cap: u8,
}

impl TraitDefinition {
    pub fn new(key: impl Into<String>, label: impl Into<String>, minimum: u8, hard_cap: u8) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            minimum,
            hard_cap,
        }
    }
}

/// Merit or flaw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerkKind {
    Merit,
    Flaw,
}

/// A merit or flaw with its flat freebie cost (merits) or bonus (flaws).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerkDefinition {
    pub key: String,
    pub label: String,
    pub kind: PerkKind,
    pub cost: u32,
}

impl PerkDefinition {
    pub fn merit(key: impl Into<String>, label: impl Into<String>, cost: u32) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: PerkKind::Merit,
            cost,
        }
    }

    pub fn flaw(key: impl Into<String>, label: impl Into<String>, cost: u32) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: PerkKind::Flaw,
            cost,
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Read-only lookup table of traits, merits and flaws.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraitCatalog {
    traits: BTreeMap<Category, Vec<TraitDefinition>>,
    merits: Vec<PerkDefinition>,
    flaws: Vec<PerkDefinition>,
}

impl TraitCatalog {
    /// Catalog with no categories populated.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_traits(mut self, category: Category, traits: Vec<TraitDefinition>) -> Self {
        self.traits.insert(category, traits);
        self
    }

    pub fn with_perk(mut self, perk: PerkDefinition) -> Self {
        match perk.kind {
            PerkKind::Merit => self.merits.push(perk),
            PerkKind::Flaw => self.flaws.push(perk),
        }
        self
    }

    /// Traits of a category in display order. Empty if the category is absent.
    pub fn traits(&self, category: Category) -> &[TraitDefinition] {
        self.traits.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn definition(&self, category: Category, key: &str) -> Option<&TraitDefinition> {
        self.traits(category).iter().find(|t| t.key == key)
    }

    pub fn merits(&self) -> &[PerkDefinition] {
        &self.merits
    }

    pub fn flaws(&self) -> &[PerkDefinition] {
        &self.flaws
    }

    pub fn perk(&self, kind: PerkKind, key: &str) -> Option<&PerkDefinition> {
        let list = match kind {
            PerkKind::Merit => &self.merits,
            PerkKind::Flaw => &self.flaws,
        };
        list.iter().find(|p| p.key == key)
    }

    /// The standard Masquerade catalog.
    pub fn masquerade() -> Self {
        let attribute = |key: &str, label: &str| TraitDefinition::new(key, label, 1, 10);
        let ability = |key: &str, label: &str| TraitDefinition::new(key, label, 0, 10);

        let mut catalog = Self::empty()
            .with_traits(
                Category::Physical,
                vec![
                    attribute("strength", "Strength"),
                    attribute("dexterity", "Dexterity"),
                    attribute("stamina", "Stamina"),
                ],
            )
            .with_traits(
                Category::Social,
                vec![
                    attribute("charisma", "Charisma"),
                    attribute("manipulation", "Manipulation"),
                    attribute("appearance", "Appearance"),
                ],
            )
            .with_traits(
                Category::Mental,
                vec![
                    attribute("perception", "Perception"),
                    attribute("intelligence", "Intelligence"),
                    attribute("wits", "Wits"),
                ],
            )
            .with_traits(
                Category::Talents,
                [
                    ("alertness", "Alertness"),
                    ("athletics", "Athletics"),
                    ("brawl", "Brawl"),
                    ("dodge", "Dodge"),
                    ("empathy", "Empathy"),
                    ("expression", "Expression"),
                    ("intimidation", "Intimidation"),
                    ("leadership", "Leadership"),
                    ("streetwise", "Streetwise"),
                    ("subterfuge", "Subterfuge"),
                ]
                .iter()
                .map(|&(k, l)| ability(k, l))
                .collect(),
            )
            .with_traits(
                Category::Skills,
                [
                    ("animal_ken", "Animal Ken"),
                    ("crafts", "Crafts"),
                    ("drive", "Drive"),
                    ("etiquette", "Etiquette"),
                    ("firearms", "Firearms"),
                    ("melee", "Melee"),
                    ("performance", "Performance"),
                    ("security", "Security"),
                    ("stealth", "Stealth"),
                    ("survival", "Survival"),
                ]
                .iter()
                .map(|&(k, l)| ability(k, l))
                .collect(),
            )
            .with_traits(
                Category::Knowledges,
                [
                    ("academics", "Academics"),
                    ("computer", "Computer"),
                    ("finance", "Finance"),
                    ("investigation", "Investigation"),
                    ("law", "Law"),
                    ("linguistics", "Linguistics"),
                    ("medicine", "Medicine"),
                    ("occult", "Occult"),
                    ("politics", "Politics"),
                    ("science", "Science"),
                ]
                .iter()
                .map(|&(k, l)| ability(k, l))
                .collect(),
            )
            .with_traits(
                Category::Backgrounds,
                [
                    ("allies", "Allies"),
                    ("contacts", "Contacts"),
                    ("fame", "Fame"),
                    ("generation", "Generation"),
                    ("herd", "Herd"),
                    ("influence", "Influence"),
                    ("mentor", "Mentor"),
                    ("resources", "Resources"),
                    ("retainers", "Retainers"),
                    ("status", "Status"),
                ]
                .iter()
                .map(|&(k, l)| TraitDefinition::new(k, l, 0, 5))
                .collect(),
            )
            .with_traits(
                Category::Disciplines,
                [
                    ("animalism", "Animalism"),
                    ("auspex", "Auspex"),
                    ("celerity", "Celerity"),
                    ("chimerstry", "Chimerstry"),
                    ("dementation", "Dementation"),
                    ("dominate", "Dominate"),
                    ("fortitude", "Fortitude"),
                    ("necromancy", "Necromancy"),
                    ("obfuscate", "Obfuscate"),
                    ("obtenebration", "Obtenebration"),
                    ("potence", "Potence"),
                    ("presence", "Presence"),
                    ("protean", "Protean"),
                    ("quietus", "Quietus"),
                    ("serpentis", "Serpentis"),
                    ("thaumaturgy", "Thaumaturgy"),
                    ("vicissitude", "Vicissitude"),
                ]
                .iter()
                .map(|&(k, l)| ability(k, l))
                .collect(),
            )
            .with_traits(
                Category::Virtues,
                vec![
                    TraitDefinition::new("conscience", "Conscience", 1, 5),
                    TraitDefinition::new("self_control", "Self-Control", 1, 5),
                    TraitDefinition::new("courage", "Courage", 1, 5),
                ],
            );

        for (key, label, cost) in [
            ("acute_sense", "Acute Sense", 1),
            ("ambidextrous", "Ambidextrous", 1),
            ("common_sense", "Common Sense", 1),
            ("concentration", "Concentration", 1),
            ("eat_food", "Eat Food", 1),
            ("time_sense", "Time Sense", 1),
            ("code_of_honor", "Code of Honor", 2),
            ("eidetic_memory", "Eidetic Memory", 2),
            ("light_sleeper", "Light Sleeper", 2),
            ("natural_linguist", "Natural Linguist", 2),
            ("blush_of_health", "Blush of Health", 2),
            ("medium", "Medium", 2),
            ("iron_will", "Iron Will", 3),
            ("daredevil", "Daredevil", 3),
            ("lucky", "Lucky", 3),
            ("clear_sighted", "Clear Sighted", 3),
            ("efficient_digestion", "Efficient Digestion", 3),
            ("unbondable", "Unbondable", 3),
            ("true_faith", "True Faith", 7),
        ] {
            catalog = catalog.with_perk(PerkDefinition::merit(key, label, cost));
        }

        for (key, label, cost) in [
            ("hard_of_hearing", "Hard of Hearing", 1),
            ("short", "Short", 1),
            ("smell_of_the_grave", "Smell of the Grave", 1),
            ("deep_sleeper", "Deep Sleeper", 1),
            ("nightmares", "Nightmares", 1),
            ("prey_exclusion", "Prey Exclusion", 1),
            ("shy", "Shy", 1),
            ("soft_hearted", "Soft-Hearted", 1),
            ("overconfident", "Overconfident", 1),
            ("dark_secret", "Dark Secret", 1),
            ("vengeful", "Vengeful", 2),
            ("bad_sight", "Bad Sight", 2),
            ("one_eye", "One Eye", 2),
            ("lame", "Lame", 3),
            ("deformity", "Deformity", 3),
            ("haunted", "Haunted", 3),
            ("enemy", "Enemy", 3),
            ("permanent_wound", "Permanent Wound", 3),
            ("thin_blood", "Thin Blood", 4),
            ("flesh_of_the_corpse", "Flesh of the Corpse", 5),
        ] {
            catalog = catalog.with_perk(PerkDefinition::flaw(key, label, cost));
        }

        catalog
    }
}
