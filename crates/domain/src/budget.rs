//! Point budget engine - per-category spend, design maxima, and the freebie pool.
//!
//! Every edit recomputes the freebie pool from scratch.
//!
//! Category and trait keys come from the catalog the engine was built with.
//! Asking about a key the catalog does not have is a wiring defect and panics;
//! callers holding untrusted input check [`TraitCatalog::definition`] first.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{Category, PerkKind, TraitCatalog, WeightedGroup};
use crate::error::DomainError;
use crate::weighting::{Weighting, WeightingSlots};

/// Freebie points every character starts with.
pub const DEFAULT_FREEBIE_BASE: u32 = 15;

/// Ceiling applied before any generation is selected.
const DEFAULT_CEILING: u8 = 5;

/// Shared freebie budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreebiePool {
    pub used: u32,
    pub max: u32,
}

impl FreebiePool {
    pub fn is_over_budget(&self) -> bool {
        self.used > self.max
    }

    pub fn remaining(&self) -> i64 {
        i64::from(self.max) - i64::from(self.used)
    }
}

#[derive(Debug, Clone)]
struct TraitSlot {
    key: String,
    minimum: u8,
    hard_cap: u8,
    /// Clan-imposed (minimum, maximum), replaces the catalog minimum.
    range_override: Option<(u8, u8)>,
    value: u8,
}

impl TraitSlot {
    fn minimum(&self) -> u8 {
        self.range_override.map_or(self.minimum, |(min, _)| min)
    }

    fn ceiling(&self, category_ceiling: u8) -> u8 {
        let ceiling = self.hard_cap.min(category_ceiling);
        let ceiling = match self.range_override {
            Some((_, max)) => ceiling.min(max),
            None => ceiling,
        };
        ceiling.max(self.minimum())
    }

    fn spent(&self) -> u32 {
        u32::from(self.value.saturating_sub(self.minimum()))
    }
}

#[derive(Debug, Clone)]
struct CategoryState {
    ceiling: u8,
    slots: Vec<TraitSlot>,
}

impl CategoryState {
    fn slot_mut(&mut self, category: Category, key: &str) -> &mut TraitSlot {
        match self.slots.iter_mut().find(|s| s.key == key) {
            Some(slot) => slot,
            None => panic!("trait {key:?} is not in category {category}"),
        }
    }
}

/// Budget snapshot of one category, as shown next to its traits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBudget {
    pub category: Category,
    pub spent: u32,
    pub displayed: u32,
    pub design_maximum: u32,
    pub overflowing: bool,
    pub overflow_cost: u32,
    pub weighting: Option<Weighting>,
}

/// Point allocation state of one character under creation.
#[derive(Debug, Clone)]
pub struct PointBudgetEngine {
    categories: BTreeMap<Category, CategoryState>,
    weightings: BTreeMap<WeightedGroup, WeightingSlots>,
    merits: BTreeMap<String, u32>,
    flaws: BTreeMap<String, u32>,
    perk_costs: BTreeMap<(PerkKind, String), u32>,
    freebie_base: u32,
    pool: FreebiePool,
}

impl PointBudgetEngine {
    /// Build an engine with every trait at its minimum and no weightings chosen.
    pub fn new(catalog: &TraitCatalog) -> Self {
        Self::with_freebie_base(catalog, DEFAULT_FREEBIE_BASE)
    }

    pub fn with_freebie_base(catalog: &TraitCatalog, freebie_base: u32) -> Self {
        let categories = Category::ALL
            .into_iter()
            .map(|category| {
                let slots = catalog
                    .traits(category)
                    .iter()
                    .map(|def| TraitSlot {
                        key: def.key.clone(),
                        minimum: def.minimum,
                        hard_cap: def.hard_cap,
                        range_override: None,
                        value: def.minimum,
                    })
                    .collect();
                (
                    category,
                    CategoryState {
                        ceiling: DEFAULT_CEILING,
                        slots,
                    },
                )
            })
            .collect();

        let perk_costs = catalog
            .merits()
            .iter()
            .chain(catalog.flaws())
            .map(|p| ((p.kind, p.key.clone()), p.cost))
            .collect();

        let mut engine = Self {
            categories,
            weightings: WeightedGroup::ALL
                .into_iter()
                .map(|g| (g, WeightingSlots::new()))
                .collect(),
            merits: BTreeMap::new(),
            flaws: BTreeMap::new(),
            perk_costs,
            freebie_base,
            pool: FreebiePool {
                used: 0,
                max: freebie_base,
            },
        };
        engine.recompute();
        engine
    }

    fn state(&self, category: Category) -> &CategoryState {
        match self.categories.get(&category) {
            Some(state) => state,
            None => panic!("category {category} is not tracked"),
        }
    }

    fn state_mut(&mut self, category: Category) -> &mut CategoryState {
        match self.categories.get_mut(&category) {
            Some(state) => state,
            None => panic!("category {category} is not tracked"),
        }
    }

    fn slot(&self, category: Category, key: &str) -> &TraitSlot {
        match self.state(category).slots.iter().find(|s| s.key == key) {
            Some(slot) => slot,
            None => panic!("trait {key:?} is not in category {category}"),
        }
    }

    // =========================================================================
    // Trait values
    // =========================================================================

    pub fn value(&self, category: Category, key: &str) -> u8 {
        self.slot(category, key).value
    }

    pub fn minimum(&self, category: Category, key: &str) -> u8 {
        self.slot(category, key).minimum()
    }

    /// Effective ceiling of one trait: hard cap, category ceiling, and clan override.
    pub fn ceiling(&self, category: Category, key: &str) -> u8 {
        let state = self.state(category);
        self.slot(category, key).ceiling(state.ceiling)
    }

    /// Current (key, value) pairs of a category in catalog order.
    pub fn values(&self, category: Category) -> Vec<(String, u8)> {
        self.state(category)
            .slots
            .iter()
            .map(|s| (s.key.clone(), s.value))
            .collect()
    }

    /// Store `requested` clamped into the trait's current range.
    ///
    /// Returns the value actually stored.
    pub fn set_value(&mut self, category: Category, key: &str, requested: i32) -> u8 {
        let state = self.state_mut(category);
        let ceiling = state.ceiling;
        let slot = state.slot_mut(category, key);
        let requested = requested.clamp(0, i32::from(u8::MAX)) as u8;
        let stored = requested.clamp(slot.minimum(), slot.ceiling(ceiling));
        slot.value = stored;
        self.recompute();
        stored
    }

    /// Store `requested` only if it already lies inside the trait's range.
    pub fn try_set_value(
        &mut self,
        category: Category,
        key: &str,
        requested: i32,
    ) -> Result<u8, DomainError> {
        let minimum = self.minimum(category, key);
        let ceiling = self.ceiling(category, key);
        if requested < i32::from(minimum) || requested > i32::from(ceiling) {
            return Err(DomainError::out_of_range(
                category, key, requested, minimum, ceiling,
            ));
        }
        Ok(self.set_value(category, key, requested))
    }

    /// Change the ceiling of every trait in a category.
    ///
    /// Values above the new ceiling drop to it; no value is ever raised.
    pub fn set_ceiling(&mut self, category: Category, ceiling: u8) {
        let state = self.state_mut(category);
        state.ceiling = ceiling;
        for slot in &mut state.slots {
            let slot_ceiling = slot.ceiling(ceiling);
            if slot.value > slot_ceiling {
                slot.value = slot_ceiling;
            }
        }
        self.recompute();
    }

    pub fn category_ceiling(&self, category: Category) -> u8 {
        self.state(category).ceiling
    }

    /// Force one trait into `range` (or restore its catalog range with `None`).
    ///
    /// The value is clamped into the new effective range, which may raise it
    /// to a new minimum.
    pub fn set_item_range(&mut self, category: Category, key: &str, range: Option<(u8, u8)>) {
        let state = self.state_mut(category);
        let ceiling = state.ceiling;
        let slot = state.slot_mut(category, key);
        slot.range_override = range;
        slot.value = slot.value.clamp(slot.minimum(), slot.ceiling(ceiling));
        self.recompute();
    }

    // =========================================================================
    // Budget queries
    // =========================================================================

    /// Raw dots spent above minimums, not capped by the design maximum.
    pub fn spent_points(&self, category: Category) -> u32 {
        self.state(category).slots.iter().map(TraitSlot::spent).sum()
    }

    /// Spent dots capped at the design maximum; overflow shows up in the pool instead.
    pub fn displayed_points(&self, category: Category) -> u32 {
        self.spent_points(category).min(self.design_maximum(category))
    }

    pub fn is_overflowing(&self, category: Category) -> bool {
        self.spent_points(category) > self.design_maximum(category)
    }

    /// Fixed table value, or the maximum of the category's weighting tier.
    ///
    /// A weighted category without a tier has a design maximum of 0.
    pub fn design_maximum(&self, category: Category) -> u32 {
        match category.weighted_slot() {
            Some((group, _)) => self
                .weighting(category)
                .map_or(0, |tier| tier.max_for(group)),
            None => category.fixed_design_maximum().unwrap_or(0),
        }
    }

    /// Freebie cost of this category's overspend.
    pub fn overflow_cost(&self, category: Category) -> u32 {
        self.spent_points(category)
            .saturating_sub(self.design_maximum(category))
            * category.exchange_rate()
    }

    /// All intended dots spent. A zero design maximum is never complete.
    pub fn is_complete(&self, category: Category) -> bool {
        let maximum = self.design_maximum(category);
        maximum > 0 && self.spent_points(category) >= maximum
    }

    pub fn category_budget(&self, category: Category) -> CategoryBudget {
        CategoryBudget {
            category,
            spent: self.spent_points(category),
            displayed: self.displayed_points(category),
            design_maximum: self.design_maximum(category),
            overflowing: self.is_overflowing(category),
            overflow_cost: self.overflow_cost(category),
            weighting: self.weighting(category),
        }
    }

    // =========================================================================
    // Weightings
    // =========================================================================

    pub fn weighting(&self, category: Category) -> Option<Weighting> {
        let (group, slot) = category.weighted_slot()?;
        self.weightings.get(&group).and_then(|w| w.get(slot))
    }

    /// Assign a tier, moving the category that already held it.
    ///
    /// Returns the category whose tier changed as a side effect.
    ///
    /// # Panics
    ///
    /// If `category` is not weighted.
    pub fn set_weighting(&mut self, category: Category, tier: Weighting) -> Option<Category> {
        let Some((group, slot)) = category.weighted_slot() else {
            panic!("category {category} has no weighting");
        };
        let repaired = self
            .weightings
            .entry(group)
            .or_default()
            .assign(slot, tier)
            .map(|index| group.members()[index]);
        if let Some(other) = repaired {
            tracing::debug!(
                category = %category,
                tier = %tier,
                repaired = %other,
                "Weighting conflict resolved"
            );
        }
        self.recompute();
        repaired
    }

    // =========================================================================
    // Merits and flaws
    // =========================================================================

    fn perk_cost(&self, kind: PerkKind, key: &str) -> u32 {
        match self.perk_costs.get(&(kind, key.to_string())) {
            Some(cost) => *cost,
            None => panic!("{kind:?} {key:?} is not in the catalog"),
        }
    }

    /// Select a merit or flaw. Returns false if it was already selected.
    pub fn select_perk(&mut self, kind: PerkKind, key: &str) -> bool {
        let cost = self.perk_cost(kind, key);
        let selected = match kind {
            PerkKind::Merit => &mut self.merits,
            PerkKind::Flaw => &mut self.flaws,
        };
        let inserted = selected.insert(key.to_string(), cost).is_none();
        self.recompute();
        inserted
    }

    /// Deselect a merit or flaw. Returns false if it was not selected.
    pub fn deselect_perk(&mut self, kind: PerkKind, key: &str) -> bool {
        self.perk_cost(kind, key);
        let selected = match kind {
            PerkKind::Merit => &mut self.merits,
            PerkKind::Flaw => &mut self.flaws,
        };
        let removed = selected.remove(key).is_some();
        self.recompute();
        removed
    }

    pub fn selected_perks(&self, kind: PerkKind) -> BTreeSet<String> {
        match kind {
            PerkKind::Merit => self.merits.keys().cloned().collect(),
            PerkKind::Flaw => self.flaws.keys().cloned().collect(),
        }
    }

    // =========================================================================
    // Freebie pool
    // =========================================================================

    pub fn freebie_pool(&self) -> FreebiePool {
        self.pool
    }

    pub fn is_over_budget(&self) -> bool {
        self.pool.is_over_budget()
    }

    fn recompute(&mut self) {
        let overflow: u32 = Category::ALL
            .into_iter()
            .filter(|c| self.categories.contains_key(c))
            .map(|c| self.overflow_cost(c))
            .sum();
        let merits: u32 = self.merits.values().sum();
        let flaws: u32 = self.flaws.values().sum();
        self.pool = FreebiePool {
            used: overflow + merits,
            max: self.freebie_base + flaws,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PerkDefinition, TraitDefinition};

    fn engine() -> PointBudgetEngine {
        PointBudgetEngine::new(&TraitCatalog::masquerade())
    }

    mod values {
        use super::*;

        #[test]
        fn traits_start_at_minimum() {
            let engine = engine();
            assert_eq!(engine.value(Category::Physical, "strength"), 1);
            assert_eq!(engine.value(Category::Talents, "brawl"), 0);
            assert_eq!(engine.spent_points(Category::Physical), 0);
            assert_eq!(engine.freebie_pool(), FreebiePool { used: 0, max: 15 });
        }

        #[test]
        fn set_value_clamps_to_ceiling_and_minimum() {
            let mut engine = engine();
            engine.set_ceiling(Category::Physical, 7);

            assert_eq!(engine.set_value(Category::Physical, "strength", 9), 7);
            assert_eq!(engine.value(Category::Physical, "strength"), 7);
            assert_eq!(engine.set_value(Category::Physical, "strength", -3), 1);
        }

        #[test]
        fn set_value_saturates_extreme_requests() {
            let mut engine = engine();
            assert_eq!(engine.set_value(Category::Talents, "brawl", i32::MAX), 5);
            assert_eq!(engine.set_value(Category::Talents, "brawl", 256), 5);
            assert_eq!(engine.set_value(Category::Talents, "brawl", i32::MIN), 0);
            assert_eq!(engine.spent_points(Category::Talents), 0);
        }

        #[test]
        fn try_set_value_rejects_out_of_range() {
            let mut engine = engine();
            let err = engine
                .try_set_value(Category::Virtues, "courage", 0)
                .unwrap_err();
            assert!(matches!(err, DomainError::OutOfRange { minimum: 1, .. }));
            assert_eq!(engine.value(Category::Virtues, "courage"), 1);
            assert_eq!(engine.try_set_value(Category::Virtues, "courage", 3), Ok(3));
        }

        #[test]
        fn hard_cap_beats_category_ceiling() {
            let mut engine = engine();
            engine.set_ceiling(Category::Backgrounds, 9);
            assert_eq!(engine.set_value(Category::Backgrounds, "herd", 9), 5);
        }

        #[test]
        fn lowering_ceiling_clamps_values_down_only() {
            let mut engine = engine();
            engine.set_ceiling(Category::Mental, 7);
            engine.set_value(Category::Mental, "wits", 7);
            engine.set_value(Category::Mental, "perception", 2);

            engine.set_ceiling(Category::Mental, 5);
            assert_eq!(engine.value(Category::Mental, "wits"), 5);
            assert_eq!(engine.value(Category::Mental, "perception"), 2);

            engine.set_ceiling(Category::Mental, 7);
            assert_eq!(engine.value(Category::Mental, "wits"), 5);
        }

        #[test]
        fn range_override_pins_value() {
            let mut engine = engine();
            engine.set_value(Category::Social, "appearance", 3);
            engine.set_item_range(Category::Social, "appearance", Some((0, 0)));
            assert_eq!(engine.value(Category::Social, "appearance"), 0);
            assert_eq!(engine.set_value(Category::Social, "appearance", 4), 0);
            assert_eq!(engine.spent_points(Category::Social), 0);

            engine.set_item_range(Category::Social, "appearance", None);
            assert_eq!(engine.value(Category::Social, "appearance"), 1);
        }

        #[test]
        #[should_panic(expected = "is not in category")]
        fn unknown_trait_panics() {
            let mut engine = engine();
            engine.set_value(Category::Physical, "charisma", 2);
        }
    }

    mod budget {
        use super::*;

        #[test]
        fn primary_physical_scenario() {
            let mut engine = engine();
            engine.set_weighting(Category::Physical, Weighting::Primary);
            engine.set_value(Category::Physical, "strength", 4);
            engine.set_value(Category::Physical, "dexterity", 2);
            engine.set_value(Category::Physical, "stamina", 2);

            assert_eq!(engine.design_maximum(Category::Physical), 7);
            assert_eq!(engine.spent_points(Category::Physical), 5);
            assert_eq!(engine.displayed_points(Category::Physical), 5);
            assert!(!engine.is_overflowing(Category::Physical));
            assert!(!engine.is_complete(Category::Physical));
        }

        #[test]
        fn displayed_never_exceeds_design_maximum() {
            let mut engine = engine();
            engine.set_weighting(Category::Social, Weighting::Tertiary);
            engine.set_value(Category::Social, "charisma", 4);
            engine.set_value(Category::Social, "manipulation", 3);

            assert_eq!(engine.spent_points(Category::Social), 5);
            assert_eq!(engine.displayed_points(Category::Social), 3);
            assert!(engine.is_overflowing(Category::Social));
            assert_eq!(engine.overflow_cost(Category::Social), 10);
            assert_eq!(engine.freebie_pool().used, 10);
        }

        #[test]
        fn unweighted_category_is_all_overflow() {
            let mut engine = engine();
            engine.set_value(Category::Talents, "brawl", 2);

            assert_eq!(engine.design_maximum(Category::Talents), 0);
            assert_eq!(engine.displayed_points(Category::Talents), 0);
            assert!(engine.is_overflowing(Category::Talents));
            assert_eq!(engine.freebie_pool().used, 4);
        }

        #[test]
        fn disciplines_overflow_with_flaws() {
            let mut engine = engine();
            engine.set_value(Category::Disciplines, "celerity", 3);
            engine.set_value(Category::Disciplines, "potence", 3);
            engine.select_perk(PerkKind::Flaw, "vengeful");
            engine.select_perk(PerkKind::Flaw, "lame");

            assert_eq!(engine.spent_points(Category::Disciplines), 6);
            assert_eq!(engine.overflow_cost(Category::Disciplines), 14);
            assert_eq!(engine.freebie_pool(), FreebiePool { used: 14, max: 20 });
            assert!(!engine.is_over_budget());
        }

        #[test]
        fn merits_consume_and_flaws_extend_the_pool() {
            let mut engine = engine();
            engine.select_perk(PerkKind::Merit, "true_faith");
            engine.select_perk(PerkKind::Merit, "iron_will");
            engine.select_perk(PerkKind::Merit, "lucky");
            assert_eq!(engine.freebie_pool().used, 13);

            engine.set_value(Category::Backgrounds, "resources", 5);
            engine.set_value(Category::Backgrounds, "herd", 3);
            assert_eq!(engine.freebie_pool().used, 16);
            assert!(engine.is_over_budget());

            engine.select_perk(PerkKind::Flaw, "dark_secret");
            assert!(!engine.is_over_budget());

            assert!(engine.deselect_perk(PerkKind::Flaw, "dark_secret"));
            assert!(!engine.deselect_perk(PerkKind::Flaw, "dark_secret"));
            assert!(engine.is_over_budget());
        }

        #[test]
        fn selecting_twice_counts_once() {
            let mut engine = engine();
            assert!(engine.select_perk(PerkKind::Merit, "lucky"));
            assert!(!engine.select_perk(PerkKind::Merit, "lucky"));
            assert_eq!(engine.freebie_pool().used, 3);
            assert_eq!(
                engine.selected_perks(PerkKind::Merit).into_iter().collect::<Vec<_>>(),
                vec!["lucky".to_string()]
            );
        }

        #[test]
        fn custom_freebie_base() {
            let catalog = TraitCatalog::empty()
                .with_traits(
                    Category::Backgrounds,
                    vec![TraitDefinition::new("herd", "Herd", 0, 5)],
                )
                .with_perk(PerkDefinition::flaw("shy", "Shy", 1));
            let mut engine = PointBudgetEngine::with_freebie_base(&catalog, 21);
            engine.select_perk(PerkKind::Flaw, "shy");
            assert_eq!(engine.freebie_pool().max, 22);
        }
    }

    mod weightings {
        use super::*;

        #[test]
        fn swap_returns_repaired_category() {
            let mut engine = engine();
            assert_eq!(engine.set_weighting(Category::Physical, Weighting::Primary), None);
            assert_eq!(engine.set_weighting(Category::Social, Weighting::Secondary), None);
            assert_eq!(engine.set_weighting(Category::Mental, Weighting::Tertiary), None);

            assert_eq!(
                engine.set_weighting(Category::Mental, Weighting::Primary),
                Some(Category::Physical)
            );
            assert_eq!(engine.weighting(Category::Physical), Some(Weighting::Tertiary));
            assert_eq!(engine.design_maximum(Category::Physical), 3);
            assert_eq!(engine.design_maximum(Category::Mental), 7);
        }

        #[test]
        fn groups_are_independent() {
            let mut engine = engine();
            engine.set_weighting(Category::Physical, Weighting::Primary);
            assert_eq!(engine.set_weighting(Category::Talents, Weighting::Primary), None);
            assert_eq!(engine.design_maximum(Category::Talents), 13);
        }

        #[test]
        fn swap_moves_overflow_into_pool() {
            let mut engine = engine();
            engine.set_weighting(Category::Physical, Weighting::Primary);
            engine.set_weighting(Category::Social, Weighting::Secondary);
            engine.set_weighting(Category::Mental, Weighting::Tertiary);
            engine.set_value(Category::Physical, "strength", 5);
            engine.set_value(Category::Physical, "dexterity", 4);
            assert_eq!(engine.freebie_pool().used, 0);

            engine.set_weighting(Category::Mental, Weighting::Primary);
            assert_eq!(engine.overflow_cost(Category::Physical), (7 - 3) * 5);
            assert_eq!(engine.freebie_pool().used, 20);
        }

        #[test]
        #[should_panic(expected = "has no weighting")]
        fn weighting_unweighted_category_panics() {
            let mut engine = engine();
            engine.set_weighting(Category::Virtues, Weighting::Primary);
        }
    }
}
