use crate::model::{Album, Playlist, SearchPage, Song};

#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum Event {
    Initialize,
    TrackStarted(Song),
    /// Carries the id of the song that finished.
    TrackEnded(String),
    PlaybackFailed { song: Song, reason: String },
    QueueEnded,
    SearchResults { query: String, page: SearchPage },
    AlbumFetched(Album),
    PlaylistFetched(Playlist),
    ForYouFetched(Vec<Song>),
    /// A background recommendation batch; `ticket` ties it to the request.
    RecommendationsFetched {
        ticket: u64,
        seed: String,
        songs: Vec<Song>,
    },
    ForYouMixFetched { ticket: u64, songs: Vec<Song> },
    FetchError(String),
}
