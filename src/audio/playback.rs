use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::info;

use crate::audio::{error::AudioError, traits::AudioOutput};

/// rodio-backed output. Streams are downloaded whole and decoded in memory.
pub struct PlaybackEngine {
    _stream: OutputStream,
    sink: Arc<Sink>,
    http_client: Client,
    load_seq: Arc<AtomicU64>,
    swap_lock: Arc<Mutex<()>>,
}

impl PlaybackEngine {
    pub fn new() -> Result<Self, AudioError> {
        let stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| AudioError::DeviceError(e.to_string()))?;
        let sink = Sink::connect_new(stream.mixer());
        sink.pause();

        let http_client = Client::builder()
            .build()
            .map_err(|e| AudioError::NetworkError(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            sink: Arc::new(sink),
            http_client,
            load_seq: Arc::new(AtomicU64::new(0)),
            swap_lock: Arc::new(Mutex::new(())),
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, AudioError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AudioError::NetworkError(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AudioError::StreamError(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl AudioOutput for PlaybackEngine {
    async fn load(&self, url: &str) -> Result<Option<Duration>, AudioError> {
        let ticket = self.load_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let start = std::time::Instant::now();
        let bytes = self.download(url).await?;

        let sink = self.sink.clone();
        let load_seq = self.load_seq.clone();
        let swap_lock = self.swap_lock.clone();

        let duration = tokio::task::spawn_blocking(move || {
            let source = Decoder::new(Cursor::new(bytes))
                .map_err(|e| AudioError::DecodingError(e.to_string()))?;
            let duration = source.total_duration();

            let _guard = swap_lock
                .lock()
                .map_err(|_| AudioError::DeviceError("sink lock poisoned".into()))?;
            // A newer load started while this one was downloading.
            if load_seq.load(Ordering::SeqCst) != ticket {
                return Err(AudioError::StreamError("superseded".into()));
            }
            sink.stop();
            sink.pause();
            sink.append(source);
            Ok(duration)
        })
        .await
        .map_err(|e| AudioError::DecodingError(e.to_string()))??;

        info!(
            url = url,
            elapsed_ms = start.elapsed().as_millis(),
            "playback_engine_loaded"
        );
        Ok(duration)
    }

    fn play(&self) {
        self.sink.play();
    }

    fn pause(&self) {
        self.sink.pause();
    }

    fn stop(&self) {
        self.load_seq.fetch_add(1, Ordering::SeqCst);
        self.sink.stop();
    }

    fn seek(&self, position: Duration) -> Result<(), AudioError> {
        self.sink
            .try_seek(position)
            .map_err(|e| AudioError::StreamError(e.to_string()))
    }

    fn set_volume(&self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn is_empty(&self) -> bool {
        self.sink.empty()
    }
}
