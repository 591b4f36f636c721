//! The "For You" mix: recommendations seeded by what was played this
//! session, minus anything already heard.

use std::collections::HashSet;

use futures::future::join_all;
use tracing::{info, warn};

use crate::http::{ApiError, MusicApi};
use crate::model::Song;
use crate::storage::SessionPlayed;

const SEED_COUNT: usize = 3;

pub async fn for_you_mix(
    api: &dyn MusicApi,
    played: &SessionPlayed,
    limit: usize,
    fallback_query: &str,
) -> Result<Vec<Song>, ApiError> {
    let seeds = played.recent(SEED_COUNT);
    let per_seed = limit.max(1);

    let lists: Vec<Vec<Song>> = join_all(
        seeds
            .iter()
            .map(|seed| api.get_recommendations(seed, per_seed)),
    )
    .await
    .into_iter()
    .zip(&seeds)
    .filter_map(|(result, seed)| match result {
        Ok(songs) => Some(songs),
        Err(e) => {
            warn!(seed = seed.as_str(), error = %e, "for_you_seed_failed");
            None
        }
    })
    .collect();

    let mix = interleave_unplayed(lists, played, limit);
    if !mix.is_empty() {
        info!(seeds = seeds.len(), songs = mix.len(), "for_you_mix_ready");
        return Ok(mix);
    }

    let page = api
        .search_songs(fallback_query, 0, limit.max(1) as u32)
        .await?;
    let fresh = interleave_unplayed(vec![page.results.clone()], played, limit);
    info!(query = fallback_query, songs = fresh.len(), "for_you_fallback_used");

    if fresh.is_empty() {
        Ok(page.results.into_iter().take(limit).collect())
    } else {
        Ok(fresh)
    }
}

/// Round-robin across the lists, dropping repeats and played songs.
fn interleave_unplayed(lists: Vec<Vec<Song>>, played: &SessionPlayed, limit: usize) -> Vec<Song> {
    let played: HashSet<String> = played.ids().into_iter().collect();
    let mut seen = HashSet::new();
    let mut iters: Vec<_> = lists.into_iter().map(Vec::into_iter).collect();
    let mut mix = Vec::new();

    while mix.len() < limit && !iters.is_empty() {
        iters.retain_mut(|it| match it.next() {
            Some(song) => {
                if mix.len() < limit && !played.contains(&song.id) && seen.insert(song.id.clone()) {
                    mix.push(song);
                }
                true
            }
            None => false,
        });
    }

    mix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Album, Playlist, SearchPage, fixtures::song};
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Default)]
    struct Catalogue {
        recs: HashMap<String, Vec<Song>>,
        search: Vec<Song>,
    }

    #[async_trait]
    impl MusicApi for Catalogue {
        async fn get_song(&self, id: &str) -> Result<Song, ApiError> {
            Ok(song(id))
        }
        async fn get_recommendations(&self, id: &str, limit: usize) -> Result<Vec<Song>, ApiError> {
            self.recs
                .get(id)
                .map(|songs| songs.iter().take(limit).cloned().collect())
                .ok_or_else(|| ApiError::NotFound(id.to_string()))
        }
        async fn search_songs(&self, _q: &str, _p: u32, limit: u32) -> Result<SearchPage, ApiError> {
            Ok(SearchPage {
                total: self.search.len() as u32,
                start: 0,
                results: self.search.iter().take(limit as usize).cloned().collect(),
            })
        }
        async fn get_album(&self, id: &str) -> Result<Album, ApiError> {
            Err(ApiError::NotFound(id.to_string()))
        }
        async fn get_playlist(&self, id: &str) -> Result<Playlist, ApiError> {
            Err(ApiError::NotFound(id.to_string()))
        }
    }

    fn songs(ids: &[&str]) -> Vec<Song> {
        ids.iter().map(|id| song(id)).collect()
    }

    fn ids(songs: &[Song]) -> Vec<&str> {
        songs.iter().map(|s| s.id.as_str()).collect()
    }

    fn played(ids: &[&str]) -> SessionPlayed {
        let played = SessionPlayed::new(Arc::new(MemoryStore::new()));
        for id in ids {
            played.add(id);
        }
        played
    }

    #[tokio::test]
    async fn interleaves_recent_seeds_without_repeats() {
        let mut api = Catalogue::default();
        api.recs.insert("s1".into(), songs(&["a", "b", "s2"]));
        api.recs.insert("s2".into(), songs(&["c", "a", "d"]));
        let played = played(&["s1", "s2"]);

        let mix = for_you_mix(&api, &played, 10, "fallback").await.unwrap();
        assert_eq!(ids(&mix), vec!["c", "a", "b", "d"]);
    }

    #[tokio::test]
    async fn respects_limit() {
        let mut api = Catalogue::default();
        api.recs.insert("s1".into(), songs(&["a", "b", "c", "d"]));
        let played = played(&["s1"]);

        let mix = for_you_mix(&api, &played, 2, "fallback").await.unwrap();
        assert_eq!(ids(&mix), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn falls_back_to_search_without_history() {
        let api = Catalogue {
            search: songs(&["x", "y"]),
            ..Default::default()
        };

        let mix = for_you_mix(&api, &played(&[]), 10, "top hits").await.unwrap();
        assert_eq!(ids(&mix), vec!["x", "y"]);
    }

    #[tokio::test]
    async fn failed_seeds_fall_back_to_search() {
        let api = Catalogue {
            search: songs(&["x", "seen"]),
            ..Default::default()
        };

        let mix = for_you_mix(&api, &played(&["seen"]), 10, "top hits")
            .await
            .unwrap();
        assert_eq!(ids(&mix), vec!["x"]);
    }
}
