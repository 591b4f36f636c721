use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, ListState, Paragraph},
};

use crate::{
    audio::queue::PlaybackContext,
    event::events::Event,
    model::{SearchPage, Song},
    ui::{
        components::{song_list::song_list, spinner::Spinner},
        context::AppContext,
        state::AppState,
        traits::{Action, View},
        views::navigate,
    },
};

pub const SEARCH_PAGE_SIZE: u32 = 20;

pub struct Search {
    input: String,
    is_editing: bool,
    list_state: ListState,
    query: Option<String>,
    page: u32,
    results: Option<SearchPage>,
    is_loading: bool,
}

impl Default for Search {
    fn default() -> Self {
        Self {
            input: String::new(),
            is_editing: true,
            list_state: ListState::default(),
            query: None,
            page: 0,
            results: None,
            is_loading: false,
        }
    }
}

impl Search {
    fn songs(&self) -> &[Song] {
        self.results
            .as_ref()
            .map(|r| r.results.as_slice())
            .unwrap_or_default()
    }

    fn selected(&self) -> Option<(usize, &Song)> {
        let i = self.list_state.selected()?;
        self.songs().get(i).map(|s| (i, s))
    }

    fn has_next_page(&self) -> bool {
        self.results
            .as_ref()
            .is_some_and(|r| (self.page + 1) * SEARCH_PAGE_SIZE < r.total)
    }

    fn request(&mut self, query: String, page: u32) -> Action {
        self.is_loading = true;
        self.is_editing = false;
        self.page = page;
        Action::Search { query, page }
    }

    /// `album:<id>` and `playlist:<id>` open a collection directly.
    fn submit(&mut self) -> Action {
        let input = self.input.trim().to_string();
        if input.is_empty() {
            return Action::None;
        }

        if let Some(id) = input.strip_prefix("album:") {
            self.is_editing = false;
            return Action::OpenAlbum(id.trim().to_string());
        }
        if let Some(id) = input.strip_prefix("playlist:") {
            self.is_editing = false;
            return Action::OpenPlaylist(id.trim().to_string());
        }

        self.request(input, 0)
    }
}

#[async_trait]
impl View for Search {
    fn render(&mut self, f: &mut Frame, area: Rect, _state: &AppState, ctx: &AppContext) {
        let palette = ctx.theme.palette();
        let styles = ctx.theme.styles();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(1),
            ])
            .split(area);

        let border = if self.is_editing {
            palette.primary
        } else {
            palette.neutral
        };
        let input = Paragraph::new(self.input.as_str())
            .style(styles.body)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Search songs")
                    .border_style(Style::default().fg(border)),
            );
        f.render_widget(input, chunks[0]);

        let status = match &self.results {
            Some(results) => format!(
                " {} results · page {} · [ ] page · a add · e play next · o album · / edit",
                results.total,
                self.page + 1
            ),
            None => " Enter to search · album:<id> or playlist:<id> to open".to_string(),
        };
        f.render_widget(Paragraph::new(Line::styled(status, styles.muted)), chunks[1]);

        if self.is_loading {
            f.render_widget(
                Spinner::default()
                    .with_style(Style::default().fg(palette.primary))
                    .with_label("Searching..."),
                chunks[2],
            );
            return;
        }

        if self.results.is_some() && self.songs().is_empty() {
            f.render_widget(
                Paragraph::new("  No songs found").style(styles.muted),
                chunks[2],
            );
            return;
        }

        if !self.songs().is_empty() && self.list_state.selected().is_none() {
            self.list_state.select(Some(0));
        }

        let current = ctx.audio_system.current_track();
        let songs = self
            .results
            .as_ref()
            .map(|r| r.results.as_slice())
            .unwrap_or_default();
        let list = song_list(
            songs,
            current.as_ref().map(|s| s.id.as_str()),
            ctx.audio_system.is_playing(),
            chunks[2].width,
            palette,
        );
        f.render_stateful_widget(list, chunks[2], &mut self.list_state);
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        _ctx: &AppContext,
    ) -> Option<Action> {
        if self.is_editing {
            return match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => None,
                KeyCode::Enter => Some(self.submit()),
                KeyCode::Char(c) => {
                    self.input.push(c);
                    Some(Action::None)
                }
                KeyCode::Backspace => {
                    self.input.pop();
                    Some(Action::None)
                }
                KeyCode::Esc => {
                    self.is_editing = false;
                    Some(Action::None)
                }
                KeyCode::Tab | KeyCode::BackTab => None,
                _ => Some(Action::None),
            };
        }

        let len = self.songs().len();
        if navigate(&mut self.list_state, key.code, len) {
            return Some(Action::None);
        }

        match key.code {
            KeyCode::Char('/') | KeyCode::Char('i') => {
                self.is_editing = true;
                Some(Action::None)
            }
            KeyCode::Char(']') if self.has_next_page() => {
                let query = self.query.clone()?;
                let page = self.page + 1;
                Some(self.request(query, page))
            }
            KeyCode::Char('[') if self.page > 0 => {
                let query = self.query.clone()?;
                let page = self.page - 1;
                Some(self.request(query, page))
            }
            KeyCode::Enter => {
                let (i, _) = self.selected()?;
                Some(Action::PlaySongs(
                    PlaybackContext::Search,
                    self.songs().to_vec(),
                    i,
                ))
            }
            KeyCode::Char('a') => self.selected().map(|(_, s)| Action::AddToQueue(s.clone())),
            KeyCode::Char('e') => self.selected().map(|(_, s)| Action::QueueNext(s.clone())),
            KeyCode::Char('o') => {
                let (_, song) = self.selected()?;
                song.album.id.clone().map(Action::OpenAlbum)
            }
            _ => None,
        }
    }

    fn captures_input(&self) -> bool {
        self.is_editing
    }

    async fn on_event(&mut self, event: &Event, _ctx: &AppContext) {
        match event {
            Event::SearchResults { query, page } => {
                self.query = Some(query.clone());
                self.list_state
                    .select(if page.results.is_empty() { None } else { Some(0) });
                self.results = Some(page.clone());
                self.is_loading = false;
            }
            Event::FetchError(_) if self.is_loading => {
                self.is_loading = false;
            }
            _ => {}
        }
    }
}
