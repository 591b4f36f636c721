//! Property tests for queue ordering.

mod common;

use std::sync::Arc;

use common::song;
use proptest::prelude::*;
use saavtui::audio::queue::{PlaybackContext, QueueManager};
use saavtui::model::Song;
use saavtui::storage::{MemoryStore, SessionPlayed};

fn queue_manager() -> QueueManager {
    QueueManager::new(SessionPlayed::new(Arc::new(MemoryStore::new())))
}

fn ids(queue: &QueueManager) -> Vec<String> {
    queue.queue.iter().map(|s| s.id.clone()).collect()
}

fn tagged(ids: &[String]) -> Vec<Song> {
    ids.iter()
        .enumerate()
        .map(|(slot, id)| Song {
            name: format!("slot {slot}"),
            ..song(id)
        })
        .collect()
}

fn names_of(songs: &[Song]) -> Vec<String> {
    songs.iter().map(|s| s.name.clone()).collect()
}

fn arbitrary_ids(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9]{1,8}", 1..max)
}

proptest! {
    /// Appending keeps insertion order, grows the queue by one per call and
    /// never moves the current song.
    #[test]
    fn add_to_queue_appends_in_order(
        initial in arbitrary_ids(10),
        added in prop::collection::vec("[a-z0-9]{1,8}", 0..20),
        start in 0usize..10,
    ) {
        let mut queue = queue_manager();
        let start = start % initial.len();
        let songs = initial.iter().map(|id| song(id)).collect();
        let current = queue.load(PlaybackContext::List, songs, start).map(|s| s.id);

        for id in &added {
            queue.add_to_queue(song(id));
        }

        prop_assert_eq!(queue.queue.len(), initial.len() + added.len());
        prop_assert_eq!(&ids(&queue)[initial.len()..], added.as_slice());
        prop_assert_eq!(queue.current().map(|s| s.id.clone()), current);
    }

    /// Shuffling leaves everything up to the current song in place, and
    /// turning it off again restores the original order.
    #[test]
    fn shuffle_round_trip_restores_order(
        initial in arbitrary_ids(30),
        start in 0usize..30,
    ) {
        let mut queue = queue_manager();
        let start = start % initial.len();
        let songs = initial.iter().map(|id| song(id)).collect();
        queue.load(PlaybackContext::List, songs, start);

        queue.toggle_shuffle();
        prop_assert!(queue.is_shuffled);
        prop_assert_eq!(&ids(&queue)[..=start], &initial[..=start]);
        prop_assert_eq!(queue.current_track_index, start);

        let mut shuffled = ids(&queue);
        let mut expected = initial.clone();
        shuffled.sort();
        expected.sort();
        prop_assert_eq!(shuffled, expected);

        queue.toggle_shuffle();
        prop_assert!(!queue.is_shuffled);
        prop_assert_eq!(ids(&queue), initial.clone());
        prop_assert_eq!(queue.current_track_index, start);
    }

    /// With repeated ids, edits made while shuffled still land on the entry
    /// they targeted once the original order comes back. Names tell apart
    /// entries that share an id.
    #[test]
    fn shuffle_round_trip_tracks_duplicate_entries(
        initial in prop::collection::vec("[ab]", 2..12),
        start in 0usize..12,
        removal in 0usize..13,
    ) {
        let mut queue = queue_manager();
        let start = start % initial.len();
        let songs = tagged(&initial);
        let mut expected = names_of(&songs);
        let current_name = expected[start].clone();
        queue.load(PlaybackContext::List, songs, start);

        queue.toggle_shuffle();
        queue.queue_next(Song { name: "next".to_string(), ..song("a") });
        expected.insert(start + 1, "next".to_string());

        let removal = removal % queue.queue.len();
        if let Some(removed) = queue.remove(removal) {
            expected.retain(|name| name != &removed.name);
        }
        queue.toggle_shuffle();

        prop_assert_eq!(names_of(&queue.queue), expected.clone());
        prop_assert_eq!(
            Some(queue.current_track_index),
            expected.iter().position(|name| name == &current_name)
        );
    }
}
