use std::sync::Arc;

use tracing::warn;

use super::KeyValueStore;

pub const PLAYED_SONGS_KEY: &str = "played_songs_session";

/// Ids of songs already played in the current session, oldest first.
///
/// Every operation tolerates a failing store: reads fall back to an empty
/// set and writes are dropped with a warning.
#[derive(Clone)]
pub struct SessionPlayed {
    store: Arc<dyn KeyValueStore>,
}

impl SessionPlayed {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn ids(&self) -> Vec<String> {
        let raw = match self.store.get(PLAYED_SONGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "session_played_read_failed");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "session_played_corrupt");
            Vec::new()
        })
    }

    /// Returns whether the id was newly recorded.
    pub fn add(&self, id: &str) -> bool {
        let mut ids = self.ids();
        if ids.iter().any(|existing| existing == id) {
            return false;
        }
        ids.push(id.to_string());
        self.write(&ids)
    }

    pub fn has(&self, id: &str) -> bool {
        self.ids().iter().any(|existing| existing == id)
    }

    pub fn count(&self) -> usize {
        self.ids().len()
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(PLAYED_SONGS_KEY) {
            warn!(error = %e, "session_played_clear_failed");
        }
    }

    /// Most recently played first.
    pub fn recent(&self, n: usize) -> Vec<String> {
        self.ids().into_iter().rev().take(n).collect()
    }

    fn write(&self, ids: &[String]) -> bool {
        let encoded = match serde_json::to_string(ids) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "session_played_encode_failed");
                return false;
            }
        };

        match self.store.set(PLAYED_SONGS_KEY, &encoded) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "session_played_write_failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, testing::BrokenStore};

    fn played() -> (SessionPlayed, MemoryStore) {
        let store = MemoryStore::new();
        (SessionPlayed::new(Arc::new(store.clone())), store)
    }

    #[test]
    fn add_is_idempotent() {
        let (played, _) = played();

        assert!(played.add("a"));
        assert!(played.add("b"));
        assert!(!played.add("a"));

        assert_eq!(played.count(), 2);
        assert!(played.has("a"));
        assert!(!played.has("c"));
        assert_eq!(played.ids(), vec!["a", "b"]);
    }

    #[test]
    fn stored_as_json_array_under_session_key() {
        let (played, store) = played();
        played.add("x");
        played.add("y");

        assert_eq!(
            store.get(PLAYED_SONGS_KEY).unwrap().as_deref(),
            Some(r#"["x","y"]"#)
        );
    }

    #[test]
    fn clear_empties_the_set() {
        let (played, _) = played();
        played.add("a");
        played.clear();

        assert_eq!(played.count(), 0);
        assert!(!played.has("a"));
    }

    #[test]
    fn recent_is_newest_first() {
        let (played, _) = played();
        for id in ["a", "b", "c", "d"] {
            played.add(id);
        }
        assert_eq!(played.recent(2), vec!["d", "c"]);
    }

    #[test]
    fn corrupt_payload_reads_as_empty() {
        let (played, store) = played();
        store.set(PLAYED_SONGS_KEY, "not json").unwrap();

        assert_eq!(played.count(), 0);
        assert!(played.add("a"));
        assert_eq!(played.ids(), vec!["a"]);
    }

    #[test]
    fn broken_store_degrades_to_noop() {
        let played = SessionPlayed::new(Arc::new(BrokenStore));

        assert!(!played.add("a"));
        assert!(!played.has("a"));
        assert_eq!(played.count(), 0);
        played.clear();
    }
}
