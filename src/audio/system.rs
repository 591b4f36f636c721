use crate::{
    audio::{
        cache::UrlCache,
        commands::AudioCommand,
        config::AudioConfig,
        controller::AudioController,
        enums::RepeatMode,
        progress::TrackProgress,
        queue::{PlaybackContext, QueueManager},
        state::PlaybackState,
        stream_manager::StreamManager,
        traits::AudioOutput,
    },
    discovery,
    event::events::Event,
    http::MusicApi,
    model::Song,
    storage::SessionPlayed,
    util::task::TaskManager,
};
use flume::Sender;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// An in-flight recommendation fetch. `advance` is set when playback is
/// waiting on it because the queue ran out.
#[derive(Debug, Clone, Copy)]
struct PendingRecommendations {
    ticket: u64,
    advance: bool,
}

/// The player as the rest of the application sees it: queue, transport,
/// volume and session bookkeeping behind one set of operations.
pub struct AudioSystem {
    controller: AudioController,
    queue: QueueManager,
    played: SessionPlayed,
    event_tx: Sender<Event>,
    api: Arc<dyn MusicApi>,
    config: AudioConfig,
    consecutive_failures: usize,
    tasks: TaskManager,
    last_ticket: u64,
    pending_recommendations: Option<PendingRecommendations>,
    pending_mix: Option<u64>,
}

impl AudioSystem {
    pub fn new(
        output: Arc<dyn AudioOutput>,
        api: Arc<dyn MusicApi>,
        played: SessionPlayed,
        event_tx: Sender<Event>,
        config: AudioConfig,
    ) -> Self {
        let stream_manager = StreamManager::new(api.clone(), UrlCache::new());
        let controller =
            AudioController::new(output, stream_manager, event_tx.clone(), config.volume);
        let queue = QueueManager::new(played.clone());

        Self {
            controller,
            queue,
            played,
            event_tx,
            api,
            config,
            consecutive_failures: 0,
            tasks: TaskManager::new(),
            last_ticket: 0,
            pending_recommendations: None,
            pending_mix: None,
        }
    }

    fn next_ticket(&mut self) -> u64 {
        self.last_ticket += 1;
        self.last_ticket
    }

    /// Drops background fetches that belong to the previous queue.
    fn cancel_pending(&mut self) {
        self.pending_recommendations = None;
        self.pending_mix = None;
        self.tasks.abort_all();
    }

    /// An explicit jump means nobody is waiting on the queue to grow.
    fn hold_position(&mut self) {
        if let Some(pending) = self.pending_recommendations.as_mut() {
            pending.advance = false;
        }
    }

    fn request_recommendations(&mut self, seed: String, advance: bool) {
        if let Some(pending) = self.pending_recommendations.as_mut() {
            pending.advance |= advance;
            return;
        }

        let ticket = self.next_ticket();
        self.pending_recommendations = Some(PendingRecommendations { ticket, advance });

        let api = self.api.clone();
        let tx = self.event_tx.clone();
        let limit = self.config.recommendation_limit;
        self.tasks.spawn("recommendations", async move {
            let songs = match api.get_recommendations(&seed, limit).await {
                Ok(songs) => songs,
                Err(e) => {
                    warn!(seed = seed.as_str(), error = %e, "audio_system_recommendations_failed");
                    Vec::new()
                }
            };
            let _ = tx.send(Event::RecommendationsFetched {
                ticket,
                seed,
                songs,
            });
        });
    }

    /// Called when the queue has nothing further: radio contexts wait on
    /// more recommendations, anything else reports the end.
    fn end_of_queue(&mut self) {
        match self.queue.radio_seed() {
            Some(seed) => self.request_recommendations(seed, true),
            None => {
                let _ = self.event_tx.send(Event::QueueEnded);
            }
        }
    }

    async fn start(&mut self, song: Song) {
        self.played.add(&song.id);
        self.controller
            .handle_command(AudioCommand::PlayTrack(song))
            .await;
    }

    /// Plays one song on its own and queues recommendations after it.
    pub async fn play_song(&mut self, song: Song) {
        let seed = song.id.clone();
        if let Some(song) = self
            .queue
            .load(PlaybackContext::Song(seed.clone()), vec![song], 0)
        {
            self.cancel_pending();
            self.consecutive_failures = 0;
            self.start(song).await;
            self.request_recommendations(seed, false);
        }
    }

    pub async fn play_songs(&mut self, context: PlaybackContext, songs: Vec<Song>, index: usize) {
        if let Some(song) = self.queue.load(context, songs, index) {
            self.cancel_pending();
            self.consecutive_failures = 0;
            self.start(song).await;
        }
    }

    /// Starts building a For You mix in the background. The mix replaces the
    /// queue when [`Self::on_for_you_mix`] receives it, unless something else
    /// was played in the meantime.
    pub fn play_for_you(&mut self) {
        let ticket = self.next_ticket();
        self.pending_mix = Some(ticket);

        let api = self.api.clone();
        let played = self.played.clone();
        let tx = self.event_tx.clone();
        let limit = self.config.for_you_limit;
        let query = self.config.for_you_fallback_query.clone();
        self.tasks.spawn("for_you_mix", async move {
            match discovery::for_you_mix(api.as_ref(), &played, limit, &query).await {
                Ok(songs) => {
                    let _ = tx.send(Event::ForYouMixFetched { ticket, songs });
                }
                Err(e) => {
                    warn!(error = %e, "audio_system_for_you_failed");
                    let _ = tx.send(Event::FetchError(e.to_string()));
                }
            }
        });
    }

    /// Plays a mix requested by [`Self::play_for_you`]. Returns the number of
    /// songs queued, or `None` when the mix was superseded.
    pub async fn on_for_you_mix(&mut self, ticket: u64, songs: Vec<Song>) -> Option<usize> {
        if self.pending_mix != Some(ticket) {
            debug!(ticket, "audio_system_stale_mix");
            return None;
        }
        self.pending_mix = None;

        let count = songs.len();
        self.play_songs(PlaybackContext::ForYou, songs, 0).await;
        Some(count)
    }

    /// Appends a recommendation batch if it still belongs to the current
    /// queue, then resumes playback when it was waiting on the batch.
    pub async fn on_recommendations_fetched(&mut self, ticket: u64, seed: &str, songs: Vec<Song>) {
        let Some(pending) = self
            .pending_recommendations
            .take_if(|p| p.ticket == ticket)
        else {
            debug!(seed, ticket, "audio_system_stale_recommendations");
            return;
        };

        let added = self.queue.append_recommendations(songs);
        info!(seed, added, "audio_system_queue_extended");

        if !pending.advance {
            return;
        }
        match self.queue.skip() {
            Some(next) => self.start(next).await,
            None => {
                let _ = self.event_tx.send(Event::QueueEnded);
            }
        }
    }

    pub async fn play_track_at_index(&mut self, index: usize) {
        if let Some(song) = self.queue.play_track_at_index(index) {
            self.hold_position();
            self.consecutive_failures = 0;
            self.start(song).await;
        }
    }

    /// Returns false when the queue has nothing further to play right now.
    /// The current song is then left as is and either `QueueEnded` is
    /// emitted or, for radio contexts, more recommendations are fetched and
    /// playback continues once they arrive.
    pub async fn play_next(&mut self) -> bool {
        match self.queue.skip() {
            Some(next) => {
                self.hold_position();
                self.consecutive_failures = 0;
                self.start(next).await;
                true
            }
            None => {
                self.end_of_queue();
                false
            }
        }
    }

    pub async fn play_previous(&mut self) {
        if let Some(prev) = self.queue.get_previous_track() {
            self.hold_position();
            self.consecutive_failures = 0;
            self.start(prev).await;
        }
    }

    pub fn add_to_queue(&mut self, song: Song) {
        self.queue.add_to_queue(song);
    }

    pub fn queue_next(&mut self, song: Song) {
        self.queue.queue_next(song);
    }

    pub fn remove_from_queue(&mut self, index: usize) -> Option<Song> {
        self.queue.remove(index)
    }

    /// With nothing loaded (stopped after the queue ran out) this restarts
    /// the current queue entry instead.
    pub async fn toggle_play_pause(&mut self) -> bool {
        if matches!(self.controller.state(), PlaybackState::Stopped)
            && let Some(song) = self.queue.current().cloned()
        {
            self.start(song).await;
            return self.is_playing();
        }
        self.controller.toggle_play_pause()
    }

    pub async fn stop(&mut self) {
        self.cancel_pending();
        self.controller.handle_command(AudioCommand::Stop).await;
    }

    pub fn on_track_started(&mut self, song: Song) {
        if !self.is_current(&song.id) {
            return;
        }
        self.consecutive_failures = 0;
        self.queue.replace_current(song);

        if let Some(next) = self.queue.queue.get(self.queue.current_track_index + 1) {
            self.controller.prewarm(next.clone());
        }
    }

    pub async fn on_track_ended(&mut self, song_id: &str) {
        if !self.is_current(song_id) {
            return;
        }

        match self.queue.get_next_track() {
            Some(next_track) => self.start(next_track).await,
            None => self.end_of_queue(),
        }
    }

    /// Skips past an unplayable song. Once every song in the queue has failed
    /// in a row the error state is left in place for the UI to show.
    pub async fn on_playback_failed(&mut self, song: &Song, reason: &str) {
        if !self.is_current(&song.id) {
            return;
        }

        self.consecutive_failures += 1;
        warn!(
            id = song.id.as_str(),
            reason,
            failures = self.consecutive_failures,
            "audio_system_playback_failed"
        );

        if self.consecutive_failures >= self.queue.queue.len() {
            info!("audio_system_giving_up");
            let _ = self.event_tx.send(Event::QueueEnded);
            return;
        }

        match self.queue.skip() {
            Some(next) => self.start(next).await,
            None => self.end_of_queue(),
        }
    }

    fn is_current(&self, song_id: &str) -> bool {
        self.queue.current().is_some_and(|s| s.id == song_id)
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.controller.set_volume(volume);
    }

    pub fn volume_up(&mut self) {
        self.controller.volume_up(self.config.volume_step);
    }

    pub fn volume_down(&mut self) {
        self.controller.volume_down(self.config.volume_step);
    }

    pub fn toggle_mute(&mut self) {
        self.controller.toggle_mute();
    }

    pub async fn seek_backwards(&mut self) {
        let (current_ms, _) = self.controller.track_progress.get_progress();
        let new_pos_ms = current_ms.saturating_sub(self.config.seek_step_secs * 1000);
        self.controller
            .handle_command(AudioCommand::Seek(Duration::from_millis(new_pos_ms)))
            .await;
    }

    pub async fn seek_forwards(&mut self) {
        let (current_ms, total_ms) = self.controller.track_progress.get_progress();
        let mut new_pos_ms = current_ms.saturating_add(self.config.seek_step_secs * 1000);
        if total_ms > 0 {
            new_pos_ms = new_pos_ms.min(total_ms);
        }
        self.controller
            .handle_command(AudioCommand::Seek(Duration::from_millis(new_pos_ms)))
            .await;
    }

    pub fn toggle_repeat_mode(&mut self) {
        self.queue.toggle_repeat_mode();
    }

    pub fn toggle_shuffle(&mut self) {
        self.queue.toggle_shuffle();
    }

    pub fn current_track(&self) -> Option<Song> {
        self.controller.current_track()
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn is_playing(&self) -> bool {
        self.controller.is_playing()
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.queue.repeat_mode
    }

    pub fn is_shuffled(&self) -> bool {
        self.queue.is_shuffled
    }

    pub fn volume(&self) -> f32 {
        self.controller.volume()
    }

    pub fn is_muted(&self) -> bool {
        self.controller.is_muted()
    }

    pub fn track_progress(&self) -> &Arc<TrackProgress> {
        &self.controller.track_progress
    }

    pub fn queue(&self) -> &[Song] {
        &self.queue.queue
    }

    pub fn current_track_index(&self) -> usize {
        self.queue.current_track_index
    }

    pub fn playback_context(&self) -> &PlaybackContext {
        &self.queue.playback_context
    }

    pub fn played(&self) -> &SessionPlayed {
        &self.played
    }

    pub fn api(&self) -> &Arc<dyn MusicApi> {
        &self.api
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }
}
