//! In-memory state storage modules.
//!
//! - `SessionStore` - creation sessions in progress

pub mod sessions;

pub use sessions::{SessionStore, SharedSession};
