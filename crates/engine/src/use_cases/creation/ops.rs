//! Session operations - every edit goes through the session lock.

use std::sync::Arc;

use serde::Serialize;

use kindred_domain::{
    Category, CharacterId, CharacterRecord, Clan, ConceptField, CreationSession, DomainError,
    Generation, PerkKind, SessionId, SessionReport, TraitCatalog, Weighting,
};

use crate::infrastructure::ports::ClockPort;
use crate::stores::{SessionStore, SharedSession};

#[derive(Debug, thiserror::Error)]
pub enum CreationError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),
    #[error("Unknown trait: {category}/{key}")]
    UnknownTrait { category: Category, key: String },
    #[error("Category {0} does not take a weighting")]
    NotWeighted(Category),
    #[error("Unknown {kind:?}: {key}")]
    UnknownPerk { kind: PerkKind, key: String },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedSession {
    pub id: SessionId,
    pub report: SessionReport,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitUpdate {
    /// Value after clamping
    pub stored: u8,
    pub report: SessionReport,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightingUpdate {
    /// Sibling category whose tier was swapped to keep tiers distinct
    pub repaired: Option<Category>,
    pub report: SessionReport,
}

/// Creation operations over the in-memory session store.
///
/// Keys are checked against the catalog here; the domain treats an unknown
/// key as a programming error.
pub struct CreationOps {
    catalog: Arc<TraitCatalog>,
    sessions: Arc<SessionStore>,
    clock: Arc<dyn ClockPort>,
    freebie_base: u32,
}

impl CreationOps {
    pub fn new(
        catalog: Arc<TraitCatalog>,
        sessions: Arc<SessionStore>,
        clock: Arc<dyn ClockPort>,
        freebie_base: u32,
    ) -> Self {
        Self {
            catalog,
            sessions,
            clock,
            freebie_base,
        }
    }

    fn session(&self, id: SessionId) -> Result<SharedSession, CreationError> {
        self.sessions
            .get(id)
            .ok_or(CreationError::SessionNotFound(id))
    }

    fn check_trait(&self, category: Category, key: &str) -> Result<(), CreationError> {
        match self.catalog.definition(category, key) {
            Some(_) => Ok(()),
            None => Err(CreationError::UnknownTrait {
                category,
                key: key.to_string(),
            }),
        }
    }

    fn check_perk(&self, kind: PerkKind, key: &str) -> Result<(), CreationError> {
        match self.catalog.perk(kind, key) {
            Some(_) => Ok(()),
            None => Err(CreationError::UnknownPerk {
                kind,
                key: key.to_string(),
            }),
        }
    }

    /// Open a new, empty session.
    pub fn start(&self) -> StartedSession {
        let id = SessionId::new();
        let session = CreationSession::with_freebie_base(&self.catalog, self.freebie_base);
        let report = session.report();
        self.sessions.insert(id, session);
        tracing::info!(session_id = %id, freebie_base = self.freebie_base, "Creation session started");
        StartedSession { id, report }
    }

    pub async fn report(&self, id: SessionId) -> Result<SessionReport, CreationError> {
        let session = self.session(id)?;
        let report = session.lock().await.report();
        Ok(report)
    }

    /// Drop a session without producing a record.
    pub fn cancel(&self, id: SessionId) -> Result<(), CreationError> {
        self.sessions
            .remove(id)
            .ok_or(CreationError::SessionNotFound(id))?;
        tracing::info!(session_id = %id, "Creation session cancelled");
        Ok(())
    }

    pub async fn set_field(
        &self,
        id: SessionId,
        field: ConceptField,
        value: String,
    ) -> Result<SessionReport, CreationError> {
        let session = self.session(id)?;
        let mut session = session.lock().await;
        session.set_field(field, value)?;
        Ok(session.report())
    }

    pub async fn select_clan(&self, id: SessionId, clan: Clan) -> Result<SessionReport, CreationError> {
        let session = self.session(id)?;
        let mut session = session.lock().await;
        session.select_clan(clan);
        Ok(session.report())
    }

    pub async fn select_generation(
        &self,
        id: SessionId,
        generation: Generation,
    ) -> Result<SessionReport, CreationError> {
        let session = self.session(id)?;
        let mut session = session.lock().await;
        session.select_generation(generation);
        Ok(session.report())
    }

    pub async fn set_trait(
        &self,
        id: SessionId,
        category: Category,
        key: &str,
        value: i32,
    ) -> Result<TraitUpdate, CreationError> {
        self.check_trait(category, key)?;
        let session = self.session(id)?;
        let mut session = session.lock().await;
        let stored = session.set_trait(category, key, value);
        Ok(TraitUpdate {
            stored,
            report: session.report(),
        })
    }

    pub async fn set_weighting(
        &self,
        id: SessionId,
        category: Category,
        tier: Weighting,
    ) -> Result<WeightingUpdate, CreationError> {
        if !category.is_weighted() {
            return Err(CreationError::NotWeighted(category));
        }
        let session = self.session(id)?;
        let mut session = session.lock().await;
        let repaired = session.set_weighting(category, tier);
        Ok(WeightingUpdate {
            repaired,
            report: session.report(),
        })
    }

    pub async fn select_perk(
        &self,
        id: SessionId,
        kind: PerkKind,
        key: &str,
    ) -> Result<SessionReport, CreationError> {
        self.check_perk(kind, key)?;
        let session = self.session(id)?;
        let mut session = session.lock().await;
        session.select_perk(kind, key);
        Ok(session.report())
    }

    pub async fn deselect_perk(
        &self,
        id: SessionId,
        kind: PerkKind,
        key: &str,
    ) -> Result<SessionReport, CreationError> {
        self.check_perk(kind, key)?;
        let session = self.session(id)?;
        let mut session = session.lock().await;
        session.deselect_perk(kind, key);
        Ok(session.report())
    }

    /// Build the character record and close the session.
    ///
    /// A refused finish leaves the session open for further edits.
    pub async fn finish(&self, id: SessionId) -> Result<CharacterRecord, CreationError> {
        let session = self.session(id)?;
        let session = session.lock().await;
        let record = session.finish(CharacterId::new(), self.clock.now())?;

        // a concurrent finish or cancel may have won the race while we waited for the lock
        if self.sessions.remove(id).is_none() {
            return Err(CreationError::SessionNotFound(id));
        }
        tracing::info!(
            session_id = %id,
            character_id = %record.id,
            clan = %record.clan,
            freebies_used = record.freebies.used,
            "Character created"
        );
        Ok(record)
    }
}
