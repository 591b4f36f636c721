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
    ui::{
        components::song_list::song_list,
        context::AppContext,
        state::AppState,
        traits::{Action, View},
        views::navigate,
    },
};

#[derive(Default)]
pub struct QueueView {
    list_state: ListState,
}

fn context_label(context: &PlaybackContext) -> &'static str {
    match context {
        PlaybackContext::Song(_) => "Song radio",
        PlaybackContext::Album(_) => "Album",
        PlaybackContext::Playlist(_) => "Playlist",
        PlaybackContext::Search => "Search results",
        PlaybackContext::ForYou => "For You",
        PlaybackContext::List => "List",
    }
}

#[async_trait]
impl View for QueueView {
    fn render(&mut self, f: &mut Frame, area: Rect, _state: &AppState, ctx: &AppContext) {
        let palette = ctx.theme.palette();
        let styles = ctx.theme.styles();
        let audio = &ctx.audio_system;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area);

        let queue = audio.queue();
        let header = format!(
            " Queue · {} · {} songs · {} played this session",
            context_label(audio.playback_context()),
            queue.len(),
            audio.played().count()
        );
        f.render_widget(Paragraph::new(Line::styled(header, styles.title)), chunks[0]);

        if queue.is_empty() {
            f.render_widget(
                Paragraph::new("  Nothing queued").style(Style::default().fg(palette.neutral)),
                chunks[1],
            );
            return;
        }

        if self.list_state.selected().is_none() {
            self.list_state.select(Some(audio.current_track_index()));
        }

        let current_id = queue.get(audio.current_track_index()).map(|s| s.id.as_str());
        let list = song_list(queue, current_id, audio.is_playing(), chunks[1].width, palette);
        f.render_stateful_widget(list, chunks[1], &mut self.list_state);
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        let len = ctx.audio_system.queue().len();
        if navigate(&mut self.list_state, key.code, len) {
            return Some(Action::None);
        }

        let selected = self.list_state.selected().filter(|&i| i < len);
        match key.code {
            KeyCode::Enter => selected.map(Action::PlayQueueIndex),
            KeyCode::Char('d') | KeyCode::Delete => selected.map(Action::RemoveFromQueue),
            _ => None,
        }
    }
}
