use crate::model::Song;

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackState {
    Stopped,
    /// Stream is being resolved; `autoplay` records whether it should start
    /// once loaded.
    Buffering { song: Song, autoplay: bool },
    Playing(Song),
    Paused(Song),
    Error { song: Song, reason: String },
}

impl PlaybackState {
    pub fn song(&self) -> Option<&Song> {
        match self {
            PlaybackState::Stopped => None,
            PlaybackState::Buffering { song, .. }
            | PlaybackState::Playing(song)
            | PlaybackState::Paused(song)
            | PlaybackState::Error { song, .. } => Some(song),
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(
            self,
            PlaybackState::Playing(_) | PlaybackState::Buffering { autoplay: true, .. }
        )
    }
}
