use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Resolved stream URLs keyed by song id.
#[derive(Clone, Default)]
pub struct UrlCache {
    cache: Arc<RwLock<HashMap<String, String>>>,
}

impl UrlCache {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn get(&self, song_id: &str) -> Option<String> {
        self.cache.read().ok()?.get(song_id).cloned()
    }

    pub fn insert(&self, song_id: String, url: String) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(song_id, url);
        }
    }

    pub fn invalidate(&self, song_id: &str) {
        if let Ok(mut cache) = self.cache.write() {
            cache.remove(song_id);
        }
    }
}
