//! Creation use cases.
//!
//! Drives one character from an empty session to a finished record.

use std::sync::Arc;

mod ops;

pub use ops::{CreationError, CreationOps, StartedSession, TraitUpdate, WeightingUpdate};

/// Container for creation use cases.
pub struct CreationUseCases {
    pub ops: Arc<CreationOps>,
}

impl CreationUseCases {
    pub fn new(ops: Arc<CreationOps>) -> Self {
        Self { ops }
    }
}
