use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{ListState, Paragraph},
};

use crate::{
    audio::queue::PlaybackContext,
    event::events::Event,
    model::Song,
    ui::{
        components::{song_list::song_list, spinner::Spinner},
        context::AppContext,
        state::AppState,
        traits::{Action, View},
        views::navigate,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionKind {
    Album,
    Playlist,
}

/// Album or playlist detail, pushed on top of the current view.
pub struct Collection {
    kind: CollectionKind,
    id: String,
    title: String,
    subtitle: Option<String>,
    songs: Vec<Song>,
    list_state: ListState,
    is_loading: bool,
}

impl Collection {
    pub fn album(id: impl Into<String>) -> Self {
        Self::new(CollectionKind::Album, id.into())
    }

    pub fn playlist(id: impl Into<String>) -> Self {
        Self::new(CollectionKind::Playlist, id.into())
    }

    fn new(kind: CollectionKind, id: String) -> Self {
        Self {
            kind,
            title: id.clone(),
            id,
            subtitle: None,
            songs: Vec::new(),
            list_state: ListState::default(),
            is_loading: true,
        }
    }

    fn context(&self) -> PlaybackContext {
        match self.kind {
            CollectionKind::Album => PlaybackContext::Album(self.id.clone()),
            CollectionKind::Playlist => PlaybackContext::Playlist(self.id.clone()),
        }
    }

    fn loaded(&mut self, title: &str, subtitle: Option<String>, songs: &[Song]) {
        self.title = title.to_string();
        self.subtitle = subtitle.filter(|s| !s.is_empty());
        self.songs = songs.to_vec();
        self.is_loading = false;
        self.list_state
            .select(if songs.is_empty() { None } else { Some(0) });
    }
}

#[async_trait]
impl View for Collection {
    fn render(&mut self, f: &mut Frame, area: Rect, _state: &AppState, ctx: &AppContext) {
        let palette = ctx.theme.palette();
        let styles = ctx.theme.styles();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(1)])
            .split(area);

        let label = match self.kind {
            CollectionKind::Album => "Album",
            CollectionKind::Playlist => "Playlist",
        };
        let header = vec![
            Line::styled(format!(" {label} · {}", self.title), styles.title),
            Line::styled(
                format!(" {}", self.subtitle.as_deref().unwrap_or("Esc to go back")),
                styles.muted,
            ),
        ];
        f.render_widget(Paragraph::new(header), chunks[0]);

        if self.is_loading {
            f.render_widget(
                Spinner::default()
                    .with_style(Style::default().fg(palette.primary))
                    .with_label("Loading..."),
                chunks[1],
            );
            return;
        }

        let current = ctx.audio_system.current_track();
        let list = song_list(
            &self.songs,
            current.as_ref().map(|s| s.id.as_str()),
            ctx.audio_system.is_playing(),
            chunks[1].width,
            palette,
        );
        f.render_stateful_widget(list, chunks[1], &mut self.list_state);
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        _ctx: &AppContext,
    ) -> Option<Action> {
        if navigate(&mut self.list_state, key.code, self.songs.len()) {
            return Some(Action::None);
        }

        let selected = self
            .list_state
            .selected()
            .and_then(|i| self.songs.get(i).map(|s| (i, s)));
        match key.code {
            KeyCode::Enter => {
                selected.map(|(i, _)| Action::PlaySongs(self.context(), self.songs.clone(), i))
            }
            KeyCode::Char('a') => selected.map(|(_, s)| Action::AddToQueue(s.clone())),
            KeyCode::Char('e') => selected.map(|(_, s)| Action::QueueNext(s.clone())),
            KeyCode::Esc => Some(Action::Back),
            _ => None,
        }
    }

    async fn on_event(&mut self, event: &Event, _ctx: &AppContext) {
        match event {
            Event::AlbumFetched(album)
                if self.kind == CollectionKind::Album && (album.id == self.id || album.id.is_empty()) =>
            {
                let subtitle = match &album.year {
                    Some(year) => format!("{} · {year}", album.primary_artists),
                    None => album.primary_artists.clone(),
                };
                self.loaded(&album.name, Some(subtitle), &album.songs);
            }
            Event::PlaylistFetched(playlist)
                if self.kind == CollectionKind::Playlist && (playlist.id == self.id || playlist.id.is_empty()) =>
            {
                self.loaded(&playlist.name, playlist.description.clone(), &playlist.songs);
            }
            Event::FetchError(_) if self.is_loading => {
                self.is_loading = false;
            }
            _ => {}
        }
    }
}
