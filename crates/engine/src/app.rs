//! Application state and composition.

use std::sync::Arc;

use kindred_domain::TraitCatalog;

use crate::config::EngineConfig;
use crate::infrastructure::ports::ClockPort;
use crate::stores::SessionStore;
use crate::use_cases::{CreationOps, CreationUseCases};

/// Main application state.
///
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub catalog: Arc<TraitCatalog>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub creation: CreationUseCases,
}

impl App {
    pub fn new(config: &EngineConfig, catalog: TraitCatalog, clock: Arc<dyn ClockPort>) -> Self {
        let catalog = Arc::new(catalog);
        let sessions = Arc::new(SessionStore::new());

        let creation = CreationUseCases::new(Arc::new(CreationOps::new(
            catalog.clone(),
            sessions,
            clock,
            config.freebie_base,
        )));

        Self {
            catalog,
            use_cases: UseCases { creation },
        }
    }
}
