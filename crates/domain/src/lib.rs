//! Kindred domain - character creation rules for Vampire: The Masquerade.
//!
//! - `catalog` - categories, trait definitions, merits and flaws
//! - `weighting` - Primary/Secondary/Tertiary tiers and their swap rule
//! - `budget` - the point budget engine and freebie pool
//! - `wizard` - monotonic step gate
//! - `session` - one creation workflow tying the above together
//! - `record` - the finished character handed to exporters

pub mod budget;
pub mod catalog;
pub mod clan;
pub mod concept;
pub mod error;
pub mod generation;
pub mod ids;
pub mod record;
pub mod session;
pub mod weighting;
pub mod wizard;

pub use budget::{CategoryBudget, FreebiePool, PointBudgetEngine, DEFAULT_FREEBIE_BASE};
pub use catalog::{
    Category, CategoryGroup, PerkDefinition, PerkKind, TraitCatalog, TraitDefinition,
    WeightedGroup,
};
pub use clan::{Clan, TraitOverride};
pub use concept::{ConceptField, ConceptSheet, DEFAULT_ROAD};
pub use error::DomainError;
pub use generation::Generation;
pub use ids::{CharacterId, SessionId};
pub use record::{CharacterRecord, RecordedCategory, RecordedTrait};
pub use session::{CategoryReport, CreationSession, CreationStep, SessionReport, TraitReport};
pub use weighting::{Weighting, WeightingSlots};
pub use wizard::{StepPredicate, WizardGate};
