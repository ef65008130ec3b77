//! Kindred Engine library.
//!
//! HTTP service wrapping the character creation domain.
//!
//! ## Structure
//!
//! - `use_cases/` - creation workflow over the session store
//! - `stores/` - in-memory session state
//! - `infrastructure/` - ports and their implementations
//! - `api/` - HTTP entry points
//! - `config` - environment configuration
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod config;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

pub use app::App;
pub use config::EngineConfig;
