use flume::Sender;
use std::sync::{
    Arc, RwLock,
    atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering},
};
use std::time::Duration;
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{info, warn};

use crate::audio::{
    commands::AudioCommand, progress::TrackProgress, state::PlaybackState,
    stream_manager::StreamManager, traits::AudioOutput,
};
use crate::event::events::Event;
use crate::model::Song;

/// Owns the audio output and the playback state derived from it.
///
/// Every song change bumps `generation`; a background load only commits
/// when its generation is still current, so a superseded load can never
/// overwrite the state of a newer one.
pub struct AudioController {
    output: Arc<dyn AudioOutput>,
    stream_manager: StreamManager,
    state: Arc<RwLock<PlaybackState>>,
    event_tx: Sender<Event>,
    pub track_progress: Arc<TrackProgress>,
    generation: Arc<AtomicU64>,
    current_playback_task: Mutex<Option<JoinHandle<()>>>,
    monitor: JoinHandle<()>,
    volume: AtomicU32,
    is_muted: AtomicBool,
}

impl AudioController {
    pub fn new(
        output: Arc<dyn AudioOutput>,
        stream_manager: StreamManager,
        event_tx: Sender<Event>,
        volume: f32,
    ) -> Self {
        let state = Arc::new(RwLock::new(PlaybackState::Stopped));
        let track_progress = Arc::new(TrackProgress::new());
        let monitor = Self::start_monitor(
            output.clone(),
            state.clone(),
            track_progress.clone(),
            event_tx.clone(),
        );

        let controller = Self {
            output,
            stream_manager,
            state,
            event_tx,
            track_progress,
            generation: Arc::new(AtomicU64::new(0)),
            current_playback_task: Mutex::new(None),
            monitor,
            volume: AtomicU32::new(sanitize_volume(volume).to_bits()),
            is_muted: AtomicBool::new(false),
        };
        controller.apply_volume();
        controller
    }

    fn start_monitor(
        output: Arc<dyn AudioOutput>,
        state: Arc<RwLock<PlaybackState>>,
        progress: Arc<TrackProgress>,
        event_tx: Sender<Event>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_millis(100)).await;

                let playing_id = match state.read() {
                    Ok(guard) => match &*guard {
                        PlaybackState::Playing(song) => Some(song.id.clone()),
                        _ => None,
                    },
                    Err(_) => None,
                };

                let Some(id) = playing_id else { continue };
                progress.set_current_position(output.position());

                if output.is_empty() {
                    let ended = match state.write() {
                        Ok(mut guard) => match &*guard {
                            PlaybackState::Playing(song) if song.id == id => {
                                *guard = PlaybackState::Stopped;
                                true
                            }
                            _ => false,
                        },
                        Err(_) => false,
                    };
                    if ended {
                        let _ = event_tx.send(Event::TrackEnded(id));
                    }
                }
            }
        })
    }

    pub async fn handle_command(&self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::PlayTrack(song) => self.play_track(song).await,
            AudioCommand::Stop => self.stop().await,
            AudioCommand::Seek(pos) => self.seek(pos),
        }
    }

    async fn play_track(&self, song: Song) {
        let mut task_guard = self.current_playback_task.lock().await;
        if let Some(task) = task_guard.take() {
            task.abort();
        }

        let generation = {
            let mut state = self.write_state();
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            self.output.stop();
            self.track_progress.reset();
            *state = PlaybackState::Buffering {
                song: song.clone(),
                autoplay: true,
            };
            generation
        };
        info!(id = song.id.as_str(), generation, "audio_controller_load_started");

        let output = self.output.clone();
        let stream_manager = self.stream_manager.clone();
        let progress = self.track_progress.clone();
        let event_tx = self.event_tx.clone();
        let state = self.state.clone();
        let current_generation = self.generation.clone();

        let task = tokio::spawn(async move {
            let loaded = match stream_manager.resolve(&song).await {
                Ok((resolved, url)) => {
                    if current_generation.load(Ordering::SeqCst) != generation {
                        return;
                    }
                    output.load(&url).await.map(|duration| (resolved, duration))
                }
                Err(e) => Err(e),
            };

            let Ok(mut guard) = state.write() else { return };
            if current_generation.load(Ordering::SeqCst) != generation {
                info!(id = song.id.as_str(), generation, "audio_controller_stale_load_dropped");
                return;
            }

            match loaded {
                Ok((resolved, duration)) => {
                    let autoplay = match &*guard {
                        PlaybackState::Buffering { autoplay, .. } => *autoplay,
                        _ => true,
                    };
                    progress.set_total_duration(
                        duration.unwrap_or(Duration::from_secs(resolved.duration as u64)),
                    );

                    if autoplay {
                        output.play();
                        *guard = PlaybackState::Playing(resolved.clone());
                    } else {
                        *guard = PlaybackState::Paused(resolved.clone());
                    }
                    drop(guard);

                    let _ = event_tx.send(Event::TrackStarted(resolved));
                }
                Err(e) => {
                    warn!(id = song.id.as_str(), error = %e, "audio_controller_load_failed");
                    stream_manager.url_cache().invalidate(&song.id);
                    *guard = PlaybackState::Error {
                        song: song.clone(),
                        reason: e.to_string(),
                    };
                    drop(guard);

                    let _ = event_tx.send(Event::PlaybackFailed {
                        song,
                        reason: e.to_string(),
                    });
                }
            }
        });

        *task_guard = Some(task);
    }

    async fn stop(&self) {
        let mut task_guard = self.current_playback_task.lock().await;
        if let Some(task) = task_guard.take() {
            task.abort();
        }

        let mut state = self.write_state();
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.output.stop();
        self.track_progress.reset();
        *state = PlaybackState::Stopped;
    }

    fn pause(&self) {
        let mut state = self.write_state();
        let next = match &*state {
            PlaybackState::Playing(song) => {
                self.output.pause();
                Some(PlaybackState::Paused(song.clone()))
            }
            PlaybackState::Buffering { song, .. } => Some(PlaybackState::Buffering {
                song: song.clone(),
                autoplay: false,
            }),
            _ => None,
        };
        if let Some(next) = next {
            *state = next;
        }
    }

    fn resume(&self) {
        let mut state = self.write_state();
        let next = match &*state {
            PlaybackState::Paused(song) => {
                self.output.play();
                Some(PlaybackState::Playing(song.clone()))
            }
            PlaybackState::Buffering { song, .. } => Some(PlaybackState::Buffering {
                song: song.clone(),
                autoplay: true,
            }),
            _ => None,
        };
        if let Some(next) = next {
            *state = next;
        }
    }

    /// Returns the resulting play intent.
    pub fn toggle_play_pause(&self) -> bool {
        if self.is_playing() {
            self.pause();
        } else {
            self.resume();
        }
        self.is_playing()
    }

    fn seek(&self, pos: Duration) {
        if self.current_track().is_none() {
            return;
        }
        match self.output.seek(pos) {
            Ok(()) => self.track_progress.set_current_position(pos),
            Err(e) => warn!(error = %e, "audio_controller_seek_failed"),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
            .read()
            .map(|s| s.clone())
            .unwrap_or(PlaybackState::Stopped)
    }

    pub fn is_playing(&self) -> bool {
        self.state.read().map(|s| s.is_playing()).unwrap_or(false)
    }

    pub fn current_track(&self) -> Option<Song> {
        self.state.read().ok()?.song().cloned()
    }

    /// Output gain in `[0, 1]`, ignoring mute.
    pub fn volume(&self) -> f32 {
        f32::from_bits(self.volume.load(Ordering::Relaxed))
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted.load(Ordering::Relaxed)
    }

    pub fn set_volume(&self, volume: f32) {
        self.volume
            .store(sanitize_volume(volume).to_bits(), Ordering::Relaxed);
        self.is_muted.store(false, Ordering::Relaxed);
        self.apply_volume();
    }

    pub fn volume_up(&self, step: f32) {
        self.set_volume(self.volume() + step);
    }

    pub fn volume_down(&self, step: f32) {
        self.set_volume(self.volume() - step);
    }

    pub fn toggle_mute(&self) {
        let muted = self.is_muted.load(Ordering::Relaxed);
        self.is_muted.store(!muted, Ordering::Relaxed);
        self.apply_volume();
    }

    fn apply_volume(&self) {
        let volume = if self.is_muted() { 0.0 } else { self.volume() };
        self.output.set_volume(volume);
    }

    pub fn prewarm(&self, song: Song) {
        self.stream_manager.prewarm(song);
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, PlaybackState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for AudioController {
    fn drop(&mut self) {
        self.monitor.abort();
        if let Ok(mut task) = self.current_playback_task.try_lock()
            && let Some(task) = task.take()
        {
            task.abort();
        }
    }
}

fn sanitize_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}
