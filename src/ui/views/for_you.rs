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

/// Recommendations seeded from this session's listening. The app requests
/// a mix whenever this view becomes the root; `R` asks again.
pub struct ForYou {
    songs: Vec<Song>,
    list_state: ListState,
    is_loading: bool,
}

impl Default for ForYou {
    fn default() -> Self {
        Self {
            songs: Vec::new(),
            list_state: ListState::default(),
            is_loading: true,
        }
    }
}

impl ForYou {
    fn selected(&self) -> Option<(usize, &Song)> {
        let i = self.list_state.selected()?;
        self.songs.get(i).map(|s| (i, s))
    }
}

#[async_trait]
impl View for ForYou {
    fn render(&mut self, f: &mut Frame, area: Rect, _state: &AppState, ctx: &AppContext) {
        let palette = ctx.theme.palette();
        let styles = ctx.theme.styles();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area);

        f.render_widget(
            Paragraph::new(Line::styled(
                " For You · Enter play · a add · e play next · R refresh",
                styles.title,
            )),
            chunks[0],
        );

        if self.is_loading {
            f.render_widget(
                Spinner::default()
                    .with_style(Style::default().fg(palette.primary))
                    .with_label("Building your mix..."),
                chunks[1],
            );
            return;
        }

        if self.songs.is_empty() {
            f.render_widget(
                Paragraph::new("  Nothing to recommend yet").style(styles.muted),
                chunks[1],
            );
            return;
        }

        if self.list_state.selected().is_none() {
            self.list_state.select(Some(0));
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

        match key.code {
            KeyCode::Char('R') => {
                self.is_loading = true;
                Some(Action::RefreshForYou)
            }
            KeyCode::Enter => self
                .selected()
                .map(|(i, _)| Action::PlaySongs(PlaybackContext::ForYou, self.songs.clone(), i)),
            KeyCode::Char('a') => self.selected().map(|(_, s)| Action::AddToQueue(s.clone())),
            KeyCode::Char('e') => self.selected().map(|(_, s)| Action::QueueNext(s.clone())),
            _ => None,
        }
    }

    async fn on_event(&mut self, event: &Event, _ctx: &AppContext) {
        match event {
            Event::ForYouFetched(songs) => {
                self.songs = songs.clone();
                self.is_loading = false;
                self.list_state.select(if songs.is_empty() { None } else { Some(0) });
            }
            Event::FetchError(_) if self.is_loading => {
                self.is_loading = false;
            }
            _ => {}
        }
    }
}
