use crate::audio::error::AudioError;
use async_trait::async_trait;
use std::time::Duration;

/// The single audio sink the controller drives.
///
/// `load` replaces whatever was loaded before and leaves the new source
/// paused; transport is then driven through `play`/`pause`.
#[async_trait]
pub trait AudioOutput: Send + Sync {
    /// Returns the decoded duration when the container reports one.
    async fn load(&self, url: &str) -> Result<Option<Duration>, AudioError>;
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    fn seek(&self, position: Duration) -> Result<(), AudioError>;
    fn set_volume(&self, volume: f32);
    fn position(&self) -> Duration;
    /// True once a loaded source has been fully played out.
    fn is_empty(&self) -> bool;
}
