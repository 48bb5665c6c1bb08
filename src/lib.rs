//! Cinezy - terminal movie search with favorites, feedback notes and trailers
//!
//! Search OMDb, browse the results as cards, keep favorites, leave a note on
//! any title and open its trailer.
//!
//! # Modules
//!
//! - `models` - Movie records and presentation helpers
//! - `api` - API clients (OMDb, trailer lookup)
//! - `storage` - Key-value persistence, favorites and feedback
//! - `tasks` - Background work and the events it reports
//! - `ui` - TUI components
//! - `app` - Application state and navigation
//! - `cli` / `commands` - Scriptable subcommands

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod launch;
pub mod models;
pub mod storage;
pub mod tasks;
pub mod ui;

// Re-export commonly used types
pub use models::{MediaType, MovieDetail, MovieSummary, RatingTier, Tab};

pub use api::{OmdbClient, TrailerClient, TrailerOutcome};
pub use app::{App, InputMode};
pub use config::Config;
pub use storage::{FavoritesStore, FeedbackStore, FileStore, KeyValueStore, MemoryStore};
