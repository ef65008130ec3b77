//! Unified error types for the domain layer
//!
//! Recoverable failures only. Wiring defects between the budget engine and its
//! caller (unknown categories, trait keys, merit keys) panic instead.

use thiserror::Error;

use crate::catalog::Category;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for enums and value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// A trait value outside the slot's current range
    #[error("{category}/{key}: {requested} outside {minimum}..={ceiling}")]
    OutOfRange {
        category: Category,
        key: String,
        requested: i32,
        minimum: u8,
        ceiling: u8,
    },

    /// Business rule violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// State transition not allowed
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// # Example
    /// ```ignore
    /// if !(3..=15).contains(&generation) {
    ///     return Err(DomainError::validation("Generation must be between 3 and 15"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an out-of-range error for a rejected trait value
    pub fn out_of_range(
        category: Category,
        key: impl Into<String>,
        requested: i32,
        minimum: u8,
        ceiling: u8,
    ) -> Self {
        Self::OutOfRange {
            category,
            key: key.into(),
            requested,
            minimum,
            ceiling,
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }
}
