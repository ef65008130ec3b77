//! Creation session - one character being built, from concept to freebies.
//!
//! The session owns the budget engine and the wizard gate and is the only
//! thing callers mutate. Every edit runs the whole cascade synchronously:
//! ceilings and clan overrides are applied, the budget engine recomputes its
//! pool, and the wizard gate is re-evaluated until nothing else unlocks.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::budget::{CategoryBudget, FreebiePool, PointBudgetEngine, DEFAULT_FREEBIE_BASE};
use crate::catalog::{Category, CategoryGroup, PerkKind, TraitCatalog};
use crate::clan::Clan;
use crate::concept::{ConceptField, ConceptSheet};
use crate::error::DomainError;
use crate::generation::Generation;
use crate::ids::CharacterId;
use crate::record::{CharacterRecord, RecordedCategory, RecordedTrait};
use crate::weighting::Weighting;
use crate::wizard::WizardGate;

// =============================================================================
// Steps
// =============================================================================

/// Steps of the creation wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationStep {
    Concept,
    Attributes,
    Abilities,
    Advantages,
    Freebies,
}

impl CreationStep {
    pub const ALL: [CreationStep; 5] = [
        Self::Concept,
        Self::Attributes,
        Self::Abilities,
        Self::Advantages,
        Self::Freebies,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concept => "concept",
            Self::Attributes => "attributes",
            Self::Abilities => "abilities",
            Self::Advantages => "advantages",
            Self::Freebies => "freebies",
        }
    }
}

impl fmt::Display for CreationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CreationStep {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|step| step.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::parse(format!("Unknown creation step: {}", s)))
    }
}

// =============================================================================
// Report
// =============================================================================

/// Range and value of one trait, for rendering its spinner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitReport {
    pub key: String,
    pub value: u8,
    pub minimum: u8,
    pub ceiling: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryReport {
    #[serde(flatten)]
    pub budget: CategoryBudget,
    pub complete: bool,
    pub traits: Vec<TraitReport>,
}

/// Everything a presentation layer shows, computed by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub concept: ConceptSheet,
    pub missing_fields: Vec<ConceptField>,
    pub clan: Option<Clan>,
    pub generation: Generation,
    pub categories: Vec<CategoryReport>,
    pub merits: Vec<String>,
    pub flaws: Vec<String>,
    pub freebies: FreebiePool,
    pub over_budget: bool,
    pub max_unlocked_step: CreationStep,
    pub can_finish: bool,
}

// =============================================================================
// Session
// =============================================================================

/// Everything the wizard predicates look at.
#[derive(Debug, Clone)]
struct Draft {
    concept: ConceptSheet,
    clan: Option<Clan>,
    generation: Generation,
    budget: PointBudgetEngine,
}

impl Draft {
    fn concept_ready(&self) -> bool {
        self.concept.is_complete() && self.clan.is_some()
    }

    fn group_complete(&self, group: CategoryGroup) -> bool {
        Category::ALL
            .into_iter()
            .filter(|c| c.group() == group)
            .all(|c| self.budget.is_complete(c))
    }

    fn apply_generation(&mut self) {
        let ceiling = self.generation.trait_ceiling();
        for category in Category::ALL.into_iter().filter(Category::follows_generation) {
            self.budget.set_ceiling(category, ceiling);
        }
    }
}

pub struct CreationSession {
    draft: Draft,
    gate: WizardGate<Draft>,
}

impl CreationSession {
    pub fn new(catalog: &TraitCatalog) -> Self {
        Self::with_freebie_base(catalog, DEFAULT_FREEBIE_BASE)
    }

    pub fn with_freebie_base(catalog: &TraitCatalog, freebie_base: u32) -> Self {
        let mut draft = Draft {
            concept: ConceptSheet::new(),
            clan: None,
            generation: Generation::default(),
            budget: PointBudgetEngine::with_freebie_base(catalog, freebie_base),
        };
        draft.apply_generation();

        let mut gate = WizardGate::new(CreationStep::ALL.len());
        gate.register(CreationStep::Concept.index(), Draft::concept_ready);
        gate.register(CreationStep::Attributes.index(), |d: &Draft| {
            d.group_complete(CategoryGroup::Attributes)
        });
        gate.register(CreationStep::Abilities.index(), |d: &Draft| {
            d.group_complete(CategoryGroup::Abilities)
        });
        gate.register(CreationStep::Advantages.index(), |d: &Draft| {
            d.group_complete(CategoryGroup::Advantages)
        });

        let mut session = Self { draft, gate };
        session.settle();
        session
    }

    fn settle(&mut self) {
        self.gate.evaluate_all(&self.draft);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn budget(&self) -> &PointBudgetEngine {
        &self.draft.budget
    }

    pub fn concept(&self) -> &ConceptSheet {
        &self.draft.concept
    }

    pub fn clan(&self) -> Option<Clan> {
        self.draft.clan
    }

    pub fn generation(&self) -> Generation {
        self.draft.generation
    }

    pub fn max_unlocked_step(&self) -> CreationStep {
        // the gate is built with exactly CreationStep::ALL.len() steps
        CreationStep::from_index(self.gate.current_max()).unwrap_or(CreationStep::Freebies)
    }

    pub fn can_advance(&self, step: CreationStep) -> bool {
        self.gate.can_advance(step.index())
    }

    /// Terminal step reached and the freebie pool is not exceeded.
    pub fn can_finish(&self) -> bool {
        self.gate.is_terminal() && !self.draft.budget.is_over_budget()
    }

    // =========================================================================
    // Edits
    // =========================================================================

    pub fn set_field(&mut self, field: ConceptField, value: impl Into<String>) -> Result<(), DomainError> {
        self.draft.concept.set(field, value)?;
        self.settle();
        Ok(())
    }

    /// Switch clan, lifting the previous clan's trait overrides first.
    pub fn select_clan(&mut self, clan: Clan) {
        if let Some(previous) = self.draft.clan {
            for o in previous.trait_overrides() {
                self.draft.budget.set_item_range(o.category, o.key, None);
            }
        }
        for o in clan.trait_overrides() {
            self.draft
                .budget
                .set_item_range(o.category, o.key, Some((o.minimum, o.maximum)));
        }
        self.draft.clan = Some(clan);
        tracing::debug!(clan = %clan, "Clan selected");
        self.settle();
    }

    /// Switch generation; generation-bound traits above the new ceiling drop to it.
    pub fn select_generation(&mut self, generation: Generation) {
        self.draft.generation = generation;
        self.draft.apply_generation();
        tracing::debug!(
            generation = generation.value(),
            ceiling = generation.trait_ceiling(),
            "Generation selected"
        );
        self.settle();
    }

    /// Set a trait, clamped into its range. Returns the stored value.
    pub fn set_trait(&mut self, category: Category, key: &str, value: i32) -> u8 {
        let stored = self.draft.budget.set_value(category, key, value);
        self.settle();
        stored
    }

    pub fn set_weighting(&mut self, category: Category, tier: Weighting) -> Option<Category> {
        let repaired = self.draft.budget.set_weighting(category, tier);
        self.settle();
        repaired
    }

    pub fn select_perk(&mut self, kind: PerkKind, key: &str) -> bool {
        let changed = self.draft.budget.select_perk(kind, key);
        self.settle();
        changed
    }

    pub fn deselect_perk(&mut self, kind: PerkKind, key: &str) -> bool {
        let changed = self.draft.budget.deselect_perk(kind, key);
        self.settle();
        changed
    }

    // =========================================================================
    // Read model and completion
    // =========================================================================

    pub fn report(&self) -> SessionReport {
        let budget = &self.draft.budget;
        let categories = Category::ALL
            .into_iter()
            .map(|category| CategoryReport {
                budget: budget.category_budget(category),
                complete: budget.is_complete(category),
                traits: budget
                    .values(category)
                    .into_iter()
                    .map(|(key, value)| TraitReport {
                        minimum: budget.minimum(category, &key),
                        ceiling: budget.ceiling(category, &key),
                        key,
                        value,
                    })
                    .collect(),
            })
            .collect();

        SessionReport {
            concept: self.draft.concept.clone(),
            missing_fields: self.draft.concept.missing_required(),
            clan: self.draft.clan,
            generation: self.draft.generation,
            categories,
            merits: budget.selected_perks(PerkKind::Merit).into_iter().collect(),
            flaws: budget.selected_perks(PerkKind::Flaw).into_iter().collect(),
            freebies: budget.freebie_pool(),
            over_budget: budget.is_over_budget(),
            max_unlocked_step: self.max_unlocked_step(),
            can_finish: self.can_finish(),
        }
    }

    /// Assemble the finished character.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` before the freebie step is unlocked
    /// - `Constraint` while the freebie pool is exceeded
    pub fn finish(&self, id: CharacterId, now: DateTime<Utc>) -> Result<CharacterRecord, DomainError> {
        if !self.gate.is_terminal() {
            return Err(DomainError::invalid_state_transition(format!(
                "creation is at step {}, not {}",
                self.max_unlocked_step(),
                CreationStep::Freebies
            )));
        }
        let budget = &self.draft.budget;
        let pool = budget.freebie_pool();
        if pool.is_over_budget() {
            return Err(DomainError::constraint(format!(
                "{} freebie points spent, only {} available",
                pool.used, pool.max
            )));
        }
        let Some(clan) = self.draft.clan else {
            return Err(DomainError::invalid_state_transition("no clan selected"));
        };

        let categories = Category::ALL
            .into_iter()
            .map(|category| RecordedCategory {
                category,
                weighting: budget.weighting(category),
                traits: budget
                    .values(category)
                    .into_iter()
                    .map(|(key, value)| RecordedTrait { key, value })
                    .collect(),
            })
            .collect();
        let virtue = |key: &str| budget.value(Category::Virtues, key);

        Ok(CharacterRecord {
            id,
            created_at: now,
            concept: self.draft.concept.clone(),
            clan,
            clan_weakness: clan.weakness().to_string(),
            generation: self.draft.generation,
            blood_pool: self.draft.generation.blood_pool(),
            blood_per_turn: self.draft.generation.blood_per_turn(),
            categories,
            merits: budget.selected_perks(PerkKind::Merit).into_iter().collect(),
            flaws: budget.selected_perks(PerkKind::Flaw).into_iter().collect(),
            road: self.draft.concept.road().to_string(),
            road_rating: virtue("conscience") + virtue("self_control"),
            willpower: virtue("courage"),
            freebies: pool,
        })
    }
}

impl fmt::Debug for CreationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreationSession")
            .field("draft", &self.draft)
            .field("gate", &self.gate)
            .finish()
    }
}
