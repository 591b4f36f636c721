use super::enums::RepeatMode;
use crate::model::Song;
use crate::storage::SessionPlayed;
use rand::{rng, seq::SliceRandom};
use std::collections::HashSet;

/// Where the current queue came from. Radio-like contexts keep going past
/// the end of the queue by pulling recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackContext {
    /// A single song and whatever was recommended after it.
    Song(String),
    Album(String),
    Playlist(String),
    Search,
    ForYou,
    #[default]
    List,
}

impl PlaybackContext {
    pub fn is_radio(&self) -> bool {
        matches!(self, PlaybackContext::Song(_) | PlaybackContext::ForYou)
    }
}

pub struct QueueManager {
    played: SessionPlayed,

    pub queue: Vec<Song>,
    original_queue: Option<Vec<Song>>,
    /// While shuffled, the `original_queue` position of each queue slot.
    shuffled_index_map: Vec<usize>,
    pub current_track_index: usize,

    pub repeat_mode: RepeatMode,
    pub is_shuffled: bool,

    pub playback_context: PlaybackContext,
}

impl QueueManager {
    pub fn new(played: SessionPlayed) -> Self {
        Self {
            played,
            queue: Vec::new(),
            original_queue: None,
            shuffled_index_map: Vec::new(),
            current_track_index: 0,
            repeat_mode: RepeatMode::None,
            is_shuffled: false,
            playback_context: PlaybackContext::List,
        }
    }

    /// Replaces the queue and makes `songs[start_index]` current.
    pub fn load(
        &mut self,
        context: PlaybackContext,
        songs: Vec<Song>,
        start_index: usize,
    ) -> Option<Song> {
        if songs.is_empty() || start_index >= songs.len() {
            return None;
        }

        self.playback_context = context;
        self.queue = songs;
        self.current_track_index = start_index;
        self.original_queue = None;
        self.shuffled_index_map.clear();
        if self.is_shuffled {
            self.shuffle_upcoming();
        }

        self.current().cloned()
    }

    pub fn current(&self) -> Option<&Song> {
        self.queue.get(self.current_track_index)
    }

    /// Advances per the end-of-queue policy: repeat-one replays, repeat-all
    /// wraps, anything else stops without moving. Radio contexts are
    /// extended from outside via [`Self::radio_seed`].
    pub fn get_next_track(&mut self) -> Option<Song> {
        if self.repeat_mode == RepeatMode::Single {
            return self.current().cloned();
        }
        self.skip()
    }

    /// Like [`Self::get_next_track`] but never replays the current song.
    pub fn skip(&mut self) -> Option<Song> {
        if self.queue.is_empty() {
            return None;
        }

        let next_track_index = self.current_track_index + 1;
        if next_track_index < self.queue.len() {
            self.current_track_index = next_track_index;
        } else if self.repeat_mode == RepeatMode::All {
            self.current_track_index = 0;
        } else {
            return None;
        }

        self.current().cloned()
    }

    /// The song to seed recommendations from, if this context keeps going
    /// past the end of the queue.
    pub fn radio_seed(&self) -> Option<String> {
        if !self.playback_context.is_radio() {
            return None;
        }
        self.current().map(|s| s.id.clone())
    }

    pub fn get_previous_track(&mut self) -> Option<Song> {
        if self.queue.is_empty() {
            return None;
        }

        if self.current_track_index > 0 {
            self.current_track_index -= 1;
        } else if self.repeat_mode == RepeatMode::All {
            self.current_track_index = self.queue.len() - 1;
        }

        self.current().cloned()
    }

    pub fn play_track_at_index(&mut self, index: usize) -> Option<Song> {
        if index >= self.queue.len() {
            return None;
        }
        self.current_track_index = index;
        self.current().cloned()
    }

    pub fn add_to_queue(&mut self, song: Song) {
        if let Some(original) = self.original_queue.as_mut() {
            self.shuffled_index_map.push(original.len());
            original.push(song.clone());
        }
        self.queue.push(song);
    }

    /// Inserts right after the current song.
    pub fn queue_next(&mut self, song: Song) {
        if self.queue.is_empty() {
            self.add_to_queue(song);
            self.current_track_index = 0;
            return;
        }

        let at = self.current_track_index + 1;
        if let Some(original) = self.original_queue.as_mut() {
            let origin = self
                .shuffled_index_map
                .get(self.current_track_index)
                .map_or(original.len(), |i| i + 1);
            for index in self.shuffled_index_map.iter_mut() {
                if *index >= origin {
                    *index += 1;
                }
            }
            original.insert(origin, song.clone());
            self.shuffled_index_map.insert(at, origin);
        }
        self.queue.insert(at, song);
    }

    /// The current song cannot be removed.
    pub fn remove(&mut self, index: usize) -> Option<Song> {
        if index >= self.queue.len() || index == self.current_track_index {
            return None;
        }

        let removed = self.queue.remove(index);
        if index < self.current_track_index {
            self.current_track_index -= 1;
        }
        if let Some(original) = self.original_queue.as_mut()
            && index < self.shuffled_index_map.len()
        {
            let origin = self.shuffled_index_map.remove(index);
            original.remove(origin);
            for i in self.shuffled_index_map.iter_mut() {
                if *i > origin {
                    *i -= 1;
                }
            }
        }
        Some(removed)
    }

    /// Swaps in refreshed data for the current song.
    pub fn replace_current(&mut self, song: Song) {
        let Some(current) = self.queue.get_mut(self.current_track_index) else {
            return;
        };
        if current.id != song.id {
            return;
        }

        if let Some(original) = self.original_queue.as_mut()
            && let Some(&origin) = self.shuffled_index_map.get(self.current_track_index)
            && let Some(entry) = original.get_mut(origin)
        {
            *entry = song.clone();
        }
        *current = song;
    }

    /// Appends recommended songs, skipping any already queued or played
    /// this session. Returns how many were added.
    pub fn append_recommendations(&mut self, songs: Vec<Song>) -> usize {
        let mut seen: HashSet<String> = self.queue.iter().map(|s| s.id.clone()).collect();
        let mut added = 0;
        for song in songs {
            if self.played.has(&song.id) || !seen.insert(song.id.clone()) {
                continue;
            }
            self.add_to_queue(song);
            added += 1;
        }
        added
    }

    pub fn toggle_repeat_mode(&mut self) {
        self.repeat_mode = self.repeat_mode.cycle();
    }

    pub fn toggle_shuffle(&mut self) {
        self.is_shuffled = !self.is_shuffled;
        if self.is_shuffled {
            self.shuffle_upcoming();
        } else if let Some(original_queue) = self.original_queue.take() {
            let original_index = self
                .shuffled_index_map
                .get(self.current_track_index)
                .copied();

            self.queue = original_queue;
            self.shuffled_index_map.clear();
            self.current_track_index = original_index
                .filter(|&i| i < self.queue.len())
                .unwrap_or(0);
        }
    }

    /// Songs up to and including the current one keep their places.
    fn shuffle_upcoming(&mut self) {
        self.original_queue = Some(self.queue.clone());
        let start = (self.current_track_index + 1).min(self.queue.len());

        let upcoming: Vec<Song> = self.queue.drain(start..).collect();
        let mut combined: Vec<(Song, usize)> = upcoming.into_iter().zip(start..).collect();
        combined.shuffle(&mut rng());

        self.shuffled_index_map = (0..start).collect();
        for (song, index) in combined {
            self.queue.push(song);
            self.shuffled_index_map.push(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::song;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn manager() -> (QueueManager, SessionPlayed) {
        let played = SessionPlayed::new(Arc::new(MemoryStore::new()));
        (QueueManager::new(played.clone()), played)
    }

    fn ids(q: &QueueManager) -> Vec<&str> {
        q.queue.iter().map(|s| s.id.as_str()).collect()
    }

    fn abc() -> Vec<Song> {
        vec![song("a"), song("b"), song("c")]
    }

    #[test]
    fn next_and_previous_move_one_step() {
        let (mut q, _) = manager();
        q.load(PlaybackContext::List, abc(), 1);

        assert_eq!(q.get_next_track().unwrap().id, "c");
        assert_eq!(q.get_previous_track().unwrap().id, "b");
    }

    #[test]
    fn list_context_stops_at_end() {
        let (mut q, _) = manager();
        q.load(PlaybackContext::List, abc(), 2);

        assert!(q.get_next_track().is_none());
        assert_eq!(q.current().unwrap().id, "c");
        assert_eq!(q.queue.len(), 3);
        assert_eq!(q.radio_seed(), None);
    }

    #[test]
    fn repeat_all_wraps_both_ways() {
        let (mut q, _) = manager();
        q.load(PlaybackContext::Album("x".into()), abc(), 2);
        q.toggle_repeat_mode();
        assert_eq!(q.repeat_mode, RepeatMode::All);

        assert_eq!(q.get_next_track().unwrap().id, "a");
        assert_eq!(q.get_previous_track().unwrap().id, "c");
    }

    #[test]
    fn repeat_single_replays_but_skip_advances() {
        let (mut q, _) = manager();
        q.load(PlaybackContext::List, abc(), 0);
        q.repeat_mode = RepeatMode::Single;

        assert_eq!(q.get_next_track().unwrap().id, "a");
        assert_eq!(q.skip().unwrap().id, "b");
    }

    #[test]
    fn radio_context_appends_unplayed_recommendations_at_end() {
        let (mut q, played) = manager();
        played.add("p");
        q.load(PlaybackContext::Song("a".into()), vec![song("a")], 0);

        assert!(q.skip().is_none());
        assert_eq!(q.radio_seed().as_deref(), Some("a"));

        let added = q.append_recommendations(vec![song("a"), song("p"), song("r1"), song("r2")]);
        assert_eq!(added, 2);
        assert_eq!(ids(&q), vec!["a", "r1", "r2"]);
        assert_eq!(q.skip().unwrap().id, "r1");
    }

    #[test]
    fn previous_at_start_stays_put() {
        let (mut q, _) = manager();
        q.load(PlaybackContext::List, abc(), 0);
        assert_eq!(q.get_previous_track().unwrap().id, "a");
    }

    #[test]
    fn load_rejects_out_of_range_start() {
        let (mut q, _) = manager();
        assert!(q.load(PlaybackContext::List, abc(), 3).is_none());
        assert!(q.load(PlaybackContext::List, vec![], 0).is_none());
        assert!(q.queue.is_empty());
    }

    #[test]
    fn add_to_queue_keeps_current() {
        let (mut q, _) = manager();
        q.load(PlaybackContext::List, abc(), 1);
        q.add_to_queue(song("d"));

        assert_eq!(ids(&q), vec!["a", "b", "c", "d"]);
        assert_eq!(q.current().unwrap().id, "b");
    }

    #[test]
    fn queue_next_inserts_after_current() {
        let (mut q, _) = manager();
        q.load(PlaybackContext::List, abc(), 0);
        q.queue_next(song("x"));
        assert_eq!(ids(&q), vec!["a", "x", "b", "c"]);
    }

    #[test]
    fn remove_adjusts_current_index() {
        let (mut q, _) = manager();
        q.load(PlaybackContext::List, abc(), 2);

        assert!(q.remove(2).is_none());
        assert_eq!(q.remove(0).unwrap().id, "a");
        assert_eq!(q.current().unwrap().id, "c");
    }

    #[test]
    fn shuffle_keeps_history_and_current_then_restores() {
        let (mut q, _) = manager();
        let songs: Vec<Song> = (0..20).map(|i| song(&i.to_string())).collect();
        q.load(PlaybackContext::List, songs.clone(), 5);

        q.toggle_shuffle();
        assert!(q.is_shuffled);
        assert_eq!(q.queue[..6], songs[..6]);
        let mut shuffled: Vec<&str> = ids(&q);
        shuffled.sort();
        let mut expected: Vec<&str> = songs.iter().map(|s| s.id.as_str()).collect();
        expected.sort();
        assert_eq!(shuffled, expected);

        q.play_track_at_index(12);
        let current = q.current().unwrap().id.clone();
        q.add_to_queue(song("late"));

        q.toggle_shuffle();
        assert_eq!(q.current().unwrap().id, current);
        assert_eq!(q.queue.len(), 21);
        assert_eq!(q.queue.last().unwrap().id, "late");
        assert_eq!(q.queue[..20], songs[..]);
    }

    #[test]
    fn unshuffle_returns_to_the_same_duplicate_entry() {
        let (mut q, _) = manager();
        q.load(
            PlaybackContext::List,
            vec![song("a"), song("b"), song("a"), song("c")],
            2,
        );

        q.toggle_shuffle();
        q.toggle_shuffle();

        assert_eq!(ids(&q), vec!["a", "b", "a", "c"]);
        assert_eq!(q.current_track_index, 2);
        assert_eq!(q.skip().unwrap().id, "c");
    }

    #[test]
    fn removing_a_duplicate_while_shuffled_removes_that_entry() {
        let (mut q, _) = manager();
        q.load(
            PlaybackContext::List,
            vec![song("x"), song("a"), song("b"), song("a")],
            2,
        );

        q.toggle_shuffle();
        assert_eq!(q.remove(3).unwrap().id, "a");
        q.toggle_shuffle();

        assert_eq!(ids(&q), vec!["x", "a", "b"]);
        assert_eq!(q.current_track_index, 2);
    }

    #[test]
    fn queue_next_while_shuffled_lands_after_the_current_entry() {
        let (mut q, _) = manager();
        q.load(
            PlaybackContext::List,
            vec![song("a"), song("b"), song("a"), song("c")],
            2,
        );

        q.toggle_shuffle();
        q.queue_next(song("n"));
        assert_eq!(q.queue[3].id, "n");

        q.toggle_shuffle();
        assert_eq!(ids(&q), vec!["a", "b", "a", "n", "c"]);
        assert_eq!(q.current_track_index, 2);
    }
}
