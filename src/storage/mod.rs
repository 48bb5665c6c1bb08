//! Local persistence
//!
//! - kv: string key-value store (JSON file or in-memory)
//! - favorites: the favorites list kept under one key
//! - feedback: free-text notes, one key per movie

pub mod favorites;
pub mod feedback;
pub mod kv;

pub use favorites::{FavoritesStore, Toggle, FAVORITES_KEY};
pub use feedback::FeedbackStore;
pub use kv::{FileStore, KeyValueStore, MemoryStore, StorageError};
