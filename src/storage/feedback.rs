//! Per-movie feedback notes
//!
//! One raw string per IMDb id under `feedback_<id>`. Entries are never
//! listed in bulk.

use super::kv::{KeyValueStore, StorageError};

pub struct FeedbackStore;

impl FeedbackStore {
    /// Store key for a movie's note
    pub fn key(imdb_id: &str) -> String {
        format!("feedback_{}", imdb_id)
    }

    pub fn get(store: &dyn KeyValueStore, imdb_id: &str) -> Option<String> {
        store.get(&Self::key(imdb_id)).filter(|s| !s.is_empty())
    }

    /// Save `text` as typed. Blank text is ignored and returns `Ok(false)`.
    pub fn submit(
        store: &mut dyn KeyValueStore,
        imdb_id: &str,
        text: &str,
    ) -> Result<bool, StorageError> {
        if text.trim().is_empty() {
            return Ok(false);
        }
        store.set(&Self::key(imdb_id), text.to_string())?;
        Ok(true)
    }

    pub fn delete(store: &mut dyn KeyValueStore, imdb_id: &str) -> Result<(), StorageError> {
        store.remove(&Self::key(imdb_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_key_format() {
        assert_eq!(FeedbackStore::key("tt0848228"), "feedback_tt0848228");
    }

    #[test]
    fn test_submit_and_get() {
        let mut store = MemoryStore::new();
        assert!(FeedbackStore::submit(&mut store, "tt1", "Loved it").unwrap());
        assert_eq!(FeedbackStore::get(&store, "tt1").as_deref(), Some("Loved it"));
    }

    #[test]
    fn test_blank_submit_keeps_previous() {
        let mut store = MemoryStore::new();
        FeedbackStore::submit(&mut store, "tt1", "First").unwrap();

        assert!(!FeedbackStore::submit(&mut store, "tt1", "   \t\n").unwrap());
        assert!(!FeedbackStore::submit(&mut store, "tt1", "").unwrap());
        assert_eq!(FeedbackStore::get(&store, "tt1").as_deref(), Some("First"));
    }

    #[test]
    fn test_submit_keeps_text_untrimmed() {
        let mut store = MemoryStore::new();
        FeedbackStore::submit(&mut store, "tt1", "  spaced  ").unwrap();
        assert_eq!(FeedbackStore::get(&store, "tt1").as_deref(), Some("  spaced  "));
    }

    #[test]
    fn test_delete() {
        let mut store = MemoryStore::new();
        FeedbackStore::submit(&mut store, "tt1", "note").unwrap();
        FeedbackStore::delete(&mut store, "tt1").unwrap();
        assert_eq!(FeedbackStore::get(&store, "tt1"), None);
    }

    #[test]
    fn test_feedback_independent_per_movie() {
        let mut store = MemoryStore::new();
        FeedbackStore::submit(&mut store, "tt1", "one").unwrap();
        FeedbackStore::submit(&mut store, "tt2", "two").unwrap();
        FeedbackStore::delete(&mut store, "tt1").unwrap();
        assert_eq!(FeedbackStore::get(&store, "tt2").as_deref(), Some("two"));
    }
}
