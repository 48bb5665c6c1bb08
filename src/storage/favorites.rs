//! Favorites list
//!
//! Ordered, one entry per IMDb id, persisted as a JSON list under
//! [`FAVORITES_KEY`].

use tracing::{debug, warn};

use super::kv::{KeyValueStore, StorageError};
use crate::models::MovieDetail;

/// Store key holding the serialized favorites list
pub const FAVORITES_KEY: &str = "movieFavorites";

/// What a toggle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesStore {
    items: Vec<MovieDetail>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the store. Missing key or unparsable value gives an empty list.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(raw) = store.get(FAVORITES_KEY) else {
            return Self::default();
        };

        match serde_json::from_str::<Vec<MovieDetail>>(&raw) {
            Ok(items) => {
                let mut favorites = Self::default();
                // Drop duplicates a hand-edited file might contain
                for item in items {
                    if !favorites.contains(&item.imdb_id) {
                        favorites.items.push(item);
                    }
                }
                debug!(count = favorites.len(), "favorites loaded");
                favorites
            }
            Err(e) => {
                warn!(error = %e, "favorites entry unreadable, starting empty");
                Self::default()
            }
        }
    }

    /// Write the full list to the store
    pub fn persist(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.items)?;
        store.set(FAVORITES_KEY, json)
    }

    pub fn contains(&self, imdb_id: &str) -> bool {
        self.items.iter().any(|m| m.imdb_id == imdb_id)
    }

    pub fn get(&self, imdb_id: &str) -> Option<&MovieDetail> {
        self.items.iter().find(|m| m.imdb_id == imdb_id)
    }

    /// Remove `movie` if present by id, else append it
    pub fn toggle(&mut self, movie: MovieDetail) -> Toggle {
        if self.contains(&movie.imdb_id) {
            self.items.retain(|m| m.imdb_id != movie.imdb_id);
            Toggle::Removed
        } else {
            self.items.push(movie);
            Toggle::Added
        }
    }

    /// Replace the stored record for an id already present.
    /// Returns false if the id is not a favorite.
    pub fn upgrade(&mut self, movie: MovieDetail) -> bool {
        match self.items.iter_mut().find(|m| m.imdb_id == movie.imdb_id) {
            Some(slot) => {
                *slot = movie;
                true
            }
            None => false,
        }
    }

    pub fn items(&self) -> &[MovieDetail] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaType, MovieSummary};
    use crate::storage::MemoryStore;

    fn movie(id: &str) -> MovieDetail {
        MovieDetail::from(MovieSummary {
            imdb_id: id.to_string(),
            title: format!("Movie {}", id),
            year: "2020".to_string(),
            poster: None,
            media_type: MediaType::Movie,
        })
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut favs = FavoritesStore::new();
        assert_eq!(favs.toggle(movie("tt1")), Toggle::Added);
        assert_eq!(favs.len(), 1);
        assert!(favs.contains("tt1"));

        assert_eq!(favs.toggle(movie("tt1")), Toggle::Removed);
        assert!(favs.is_empty());
    }

    #[test]
    fn test_toggle_preserves_order_of_others() {
        let mut favs = FavoritesStore::new();
        favs.toggle(movie("tt1"));
        favs.toggle(movie("tt2"));
        favs.toggle(movie("tt3"));
        favs.toggle(movie("tt2"));

        let ids: Vec<&str> = favs.items().iter().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["tt1", "tt3"]);
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let store = MemoryStore::new();
        assert!(FavoritesStore::load(&store).is_empty());
    }

    #[test]
    fn test_load_garbage_is_empty() {
        let mut store = MemoryStore::new();
        store.set(FAVORITES_KEY, "{oops".into()).unwrap();
        assert!(FavoritesStore::load(&store).is_empty());
    }

    #[test]
    fn test_load_drops_duplicate_ids() {
        let mut store = MemoryStore::new();
        let list = vec![movie("tt1"), movie("tt1"), movie("tt2")];
        store
            .set(FAVORITES_KEY, serde_json::to_string(&list).unwrap())
            .unwrap();

        let favs = FavoritesStore::load(&store);
        assert_eq!(favs.len(), 2);
    }

    #[test]
    fn test_upgrade_replaces_record() {
        let mut favs = FavoritesStore::new();
        favs.toggle(movie("tt1"));

        let mut richer = movie("tt1");
        richer.plot = Some("Plot".into());
        assert!(favs.upgrade(richer));
        assert_eq!(favs.get("tt1").and_then(|m| m.plot.as_deref()), Some("Plot"));

        assert!(!favs.upgrade(movie("tt9")));
        assert_eq!(favs.len(), 1);
    }
}
