//! Port traits for infrastructure boundaries.
//!
//! The engine keeps sessions in memory and has no storage or network
//! dependencies of its own. The only port is the clock, so finished records
//! can be stamped deterministically in tests.

use chrono::{DateTime, Utc};

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
