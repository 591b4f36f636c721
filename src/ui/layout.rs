use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::border,
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::{
    app::App,
    components::{player::PlayerWidget, sidebar::Sidebar},
    state::Route,
};

pub struct AppLayout<'a> {
    pub app: &'a mut App,
}

impl<'a> AppLayout<'a> {
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    pub fn render(self, f: &mut Frame, area: Rect) {
        let palette = self.app.ctx.theme.palette();
        let styles = self.app.ctx.theme.styles();
        f.buffer_mut()
            .set_style(area, Style::new().bg(palette.background).fg(palette.text));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(3),
            ])
            .split(area);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(20), Constraint::Min(1)])
            .split(chunks[0]);

        let border_style = Style::default().fg(palette.neutral);
        let sidebar_block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(border_style)
            .title(env!("CARGO_PKG_NAME"))
            .title_alignment(Alignment::Center);
        let content_block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(border_style);

        let sidebar_inner = sidebar_block.inner(main_chunks[0]);
        let content_inner = content_block.inner(main_chunks[1]);
        f.render_widget(sidebar_block, main_chunks[0]);
        f.render_widget(content_block, main_chunks[1]);

        let sidebar_items = Route::ALL.iter().map(Route::label).collect();
        f.render_widget(
            Sidebar::new(sidebar_items, self.app.state.ui.sidebar_index, palette),
            sidebar_inner,
        );

        self.app
            .router
            .render(f, content_inner, &self.app.state, &self.app.ctx);

        if let Some(notice) = self.app.state.ui.active_notice() {
            let style = if notice.is_error {
                styles.error
            } else {
                styles.highlight
            };
            f.render_widget(
                Paragraph::new(Line::styled(format!(" {}", notice.text), style)),
                chunks[1],
            );
        }

        let audio = &self.app.ctx.audio_system;
        let current = audio.current_track();
        let (title, artists) = match &current {
            Some(song) => (song.name.as_str(), Some(song.primary_artists.as_str())),
            None => ("Nothing playing", None),
        };

        let player = PlayerWidget::new(
            audio.track_progress(),
            title,
            artists,
            audio.repeat_mode(),
            audio.is_shuffled(),
            if audio.is_muted() { 0.0 } else { audio.volume() },
            audio.is_playing(),
            palette,
        );
        f.render_widget(player, chunks[2]);
    }
}
