//! Fakes shared by the integration tests: an in-memory catalogue and an
//! audio output that only records what it was asked to do.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use flume::Receiver;
use tokio::sync::Notify;

use saavtui::audio::config::AudioConfig;
use saavtui::audio::error::AudioError;
use saavtui::audio::system::AudioSystem;
use saavtui::audio::traits::AudioOutput;
use saavtui::event::events::Event;
use saavtui::http::{ApiError, MusicApi};
use saavtui::model::{Album, AlbumRef, Playlist, SearchPage, Song, StreamUrl};
use saavtui::storage::{MemoryStore, SessionPlayed};

pub fn stream_url(id: &str) -> String {
    format!("https://cdn.test/{id}_320.mp4")
}

/// A song with a playable 320kbps URL.
pub fn song(id: &str) -> Song {
    Song {
        id: id.to_string(),
        name: format!("Song {id}"),
        primary_artists: "Artist".to_string(),
        album: AlbumRef::default(),
        duration: 180,
        image: vec![],
        download_url: vec![StreamUrl {
            quality: "320kbps".to_string(),
            url: stream_url(id),
        }],
    }
}

/// The same song as it appears in a listing without stream URLs, forcing
/// a `get_song` round trip before it can be played.
pub fn bare_song(id: &str) -> Song {
    Song {
        download_url: vec![],
        ..song(id)
    }
}

#[derive(Default)]
pub struct FakeApi {
    songs: HashMap<String, Song>,
    recommendations: HashMap<String, Vec<Song>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    recommendation_gates: Mutex<HashMap<String, Arc<Notify>>>,
    pub song_requests: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_song(mut self, song: Song) -> Self {
        self.songs.insert(song.id.clone(), song);
        self
    }

    pub fn with_recommendations(mut self, seed: &str, songs: Vec<Song>) -> Self {
        self.recommendations.insert(seed.to_string(), songs);
        self
    }

    /// Holds `get_song(id)` open until [`Self::release`] is called.
    pub fn gate(&self, id: &str) {
        self.gates
            .lock()
            .unwrap()
            .insert(id.to_string(), Arc::new(Notify::new()));
    }

    pub fn release(&self, id: &str) {
        if let Some(gate) = self.gates.lock().unwrap().get(id) {
            gate.notify_one();
        }
    }

    /// Holds `get_recommendations(seed)` open until
    /// [`Self::release_recommendations`] is called.
    pub fn gate_recommendations(&self, seed: &str) {
        self.recommendation_gates
            .lock()
            .unwrap()
            .insert(seed.to_string(), Arc::new(Notify::new()));
    }

    pub fn release_recommendations(&self, seed: &str) {
        if let Some(gate) = self.recommendation_gates.lock().unwrap().get(seed) {
            gate.notify_one();
        }
    }
}

#[async_trait]
impl MusicApi for FakeApi {
    async fn get_song(&self, id: &str) -> Result<Song, ApiError> {
        self.song_requests.lock().unwrap().push(id.to_string());

        let gate = self.gates.lock().unwrap().get(id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.songs
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("song {id}")))
    }

    async fn get_recommendations(&self, id: &str, limit: usize) -> Result<Vec<Song>, ApiError> {
        let gate = self.recommendation_gates.lock().unwrap().get(id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        Ok(self
            .recommendations
            .get(id)
            .map(|songs| songs.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn search_songs(
        &self,
        _query: &str,
        _page: u32,
        _limit: u32,
    ) -> Result<SearchPage, ApiError> {
        Ok(SearchPage::default())
    }

    async fn get_album(&self, id: &str) -> Result<Album, ApiError> {
        Err(ApiError::NotFound(format!("album {id}")))
    }

    async fn get_playlist(&self, id: &str) -> Result<Playlist, ApiError> {
        Err(ApiError::NotFound(format!("playlist {id}")))
    }
}

#[derive(Debug, Default)]
struct OutputState {
    loads: Vec<String>,
    playing: bool,
    empty: bool,
    volume: f32,
}

/// Records transport calls; a loaded source only drains when the test
/// calls [`FakeOutput::finish`].
#[derive(Default)]
pub struct FakeOutput {
    state: Mutex<OutputState>,
}

impl FakeOutput {
    pub fn loads(&self) -> Vec<String> {
        self.state.lock().unwrap().loads.clone()
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    pub fn volume(&self) -> f32 {
        self.state.lock().unwrap().volume
    }

    /// Simulates the loaded source running out.
    pub fn finish(&self) {
        let mut state = self.state.lock().unwrap();
        state.empty = true;
        state.playing = false;
    }
}

#[async_trait]
impl AudioOutput for FakeOutput {
    async fn load(&self, url: &str) -> Result<Option<Duration>, AudioError> {
        let mut state = self.state.lock().unwrap();
        state.loads.push(url.to_string());
        state.empty = false;
        state.playing = false;
        Ok(Some(Duration::from_secs(180)))
    }

    fn play(&self) {
        self.state.lock().unwrap().playing = true;
    }

    fn pause(&self) {
        self.state.lock().unwrap().playing = false;
    }

    fn stop(&self) {
        let mut state = self.state.lock().unwrap();
        state.playing = false;
        state.empty = true;
    }

    fn seek(&self, _position: Duration) -> Result<(), AudioError> {
        Ok(())
    }

    fn set_volume(&self, volume: f32) {
        self.state.lock().unwrap().volume = volume;
    }

    fn position(&self) -> Duration {
        Duration::ZERO
    }

    fn is_empty(&self) -> bool {
        self.state.lock().unwrap().empty
    }
}

/// An [`AudioSystem`] wired to fakes, with the event loop driven by hand.
pub struct Harness {
    pub system: AudioSystem,
    pub events: Receiver<Event>,
    pub api: Arc<FakeApi>,
    pub output: Arc<FakeOutput>,
    pub played: SessionPlayed,
}

impl Harness {
    pub fn new(api: FakeApi) -> Self {
        let api = Arc::new(api);
        let output = Arc::new(FakeOutput::default());
        let played = SessionPlayed::new(Arc::new(MemoryStore::new()));
        let (event_tx, events) = flume::unbounded();

        let system = AudioSystem::new(
            output.clone(),
            api.clone(),
            played.clone(),
            event_tx,
            AudioConfig::default(),
        );

        Self {
            system,
            events,
            api,
            output,
            played,
        }
    }

    /// Receives the next event and feeds it back into the system the way
    /// the UI loop does.
    pub async fn pump(&mut self) -> Event {
        let event = tokio::time::timeout(Duration::from_secs(2), self.events.recv_async())
            .await
            .expect("timed out waiting for an event")
            .expect("event channel closed");

        match event.clone() {
            Event::TrackStarted(song) => self.system.on_track_started(song),
            Event::TrackEnded(id) => self.system.on_track_ended(&id).await,
            Event::PlaybackFailed { song, reason } => {
                self.system.on_playback_failed(&song, &reason).await
            }
            Event::RecommendationsFetched {
                ticket,
                seed,
                songs,
            } => {
                self.system
                    .on_recommendations_fetched(ticket, &seed, songs)
                    .await
            }
            Event::ForYouMixFetched { ticket, songs } => {
                self.system.on_for_you_mix(ticket, songs).await;
            }
            _ => {}
        }
        event
    }

    pub async fn pump_until(&mut self, matches: impl Fn(&Event) -> bool) -> Event {
        loop {
            let event = self.pump().await;
            if matches(&event) {
                return event;
            }
        }
    }

    pub async fn wait_started(&mut self) -> Song {
        match self
            .pump_until(|e| matches!(e, Event::TrackStarted(_)))
            .await
        {
            Event::TrackStarted(song) => song,
            _ => unreachable!(),
        }
    }

    /// Pumps until both the song has started and its recommendation batch
    /// has been handled, in whichever order they arrive.
    pub async fn wait_started_and_extended(&mut self) -> Song {
        let mut started = None;
        let mut extended = false;
        while started.is_none() || !extended {
            match self.pump().await {
                Event::TrackStarted(song) => started = Some(song),
                Event::RecommendationsFetched { .. } => extended = true,
                _ => {}
            }
        }
        started.unwrap()
    }

    pub fn current_id(&self) -> Option<String> {
        self.system.current_track().map(|s| s.id)
    }

    pub fn queue_ids(&self) -> Vec<String> {
        self.system.queue().iter().map(|s| s.id.clone()).collect()
    }
}
