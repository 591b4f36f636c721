use crate::audio::queue::PlaybackContext;
use crate::event::events::Event;
use crate::model::Song;
use crate::ui::{context::AppContext, state::AppState};
use async_trait::async_trait;
use ratatui::crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    PlaySong(Song),
    PlaySongs(PlaybackContext, Vec<Song>, usize),
    PlayQueueIndex(usize),
    AddToQueue(Song),
    QueueNext(Song),
    RemoveFromQueue(usize),
    Search { query: String, page: u32 },
    OpenAlbum(String),
    OpenPlaylist(String),
    RefreshForYou,
    Back,
    /// The key was consumed by the view.
    None,
}

#[async_trait]
pub trait View: Send {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext);
    async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action>;
    async fn on_event(&mut self, _event: &Event, _ctx: &AppContext) {}

    /// While true, global single-key shortcuts are not applied.
    fn captures_input(&self) -> bool {
        false
    }
}
