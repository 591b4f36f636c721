use std::sync::Arc;

use tracing::{info, warn};

use crate::audio::{cache::UrlCache, error::AudioError};
use crate::http::MusicApi;
use crate::model::Song;

/// Turns a song into a playable stream URL, fetching full song details
/// from the API when the record at hand carries no usable URL.
#[derive(Clone)]
pub struct StreamManager {
    api: Arc<dyn MusicApi>,
    url_cache: UrlCache,
}

impl StreamManager {
    pub fn new(api: Arc<dyn MusicApi>, url_cache: UrlCache) -> Self {
        Self { api, url_cache }
    }

    pub fn url_cache(&self) -> &UrlCache {
        &self.url_cache
    }

    /// Resolves ahead of time so a later `resolve` is a cache hit.
    pub fn prewarm(&self, song: Song) {
        if self.url_cache.get(&song.id).is_some() || song.best_stream_url().is_some() {
            return;
        }

        let this = self.clone();
        tokio::spawn(async move {
            if let Err(e) = this.resolve(&song).await {
                warn!(id = song.id.as_str(), error = %e, "stream_manager_prewarm_failed");
            }
        });
    }

    /// Returns the song data to display (refreshed if it had to be
    /// fetched) together with the chosen URL.
    pub async fn resolve(&self, song: &Song) -> Result<(Song, String), AudioError> {
        if let Some(url) = self.url_cache.get(&song.id) {
            info!(id = song.id.as_str(), "stream_manager_cache_hit");
            return Ok((song.clone(), url));
        }

        let (resolved, url) = match song.best_stream_url() {
            Some(url) => (song.clone(), url.to_string()),
            None => {
                info!(id = song.id.as_str(), "stream_manager_cache_miss");
                let fetched = self.api.get_song(&song.id).await?;
                let url = fetched
                    .best_stream_url()
                    .ok_or_else(|| AudioError::NoPlayableUrl(song.id.clone()))?
                    .to_string();
                (fetched, url)
            }
        };

        info!(
            id = song.id.as_str(),
            url = url.as_str(),
            "stream_manager_url_resolved"
        );
        self.url_cache.insert(song.id.clone(), url.clone());

        Ok((resolved, url))
    }
}
