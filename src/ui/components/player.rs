use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Widget,
};

use crate::{
    audio::{enums::RepeatMode, progress::TrackProgress},
    theme::Palette,
    ui::components::{controls::PlayerControlsWidget, progress::ProgressWidget},
};

pub struct PlayerWidget<'a> {
    progress: &'a TrackProgress,
    title: &'a str,
    artists: Option<&'a str>,
    repeat_mode: RepeatMode,
    is_shuffled: bool,
    volume: f32,
    is_playing: bool,
    palette: &'a Palette,
}

impl<'a> PlayerWidget<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        progress: &'a TrackProgress,
        title: &'a str,
        artists: Option<&'a str>,
        repeat_mode: RepeatMode,
        is_shuffled: bool,
        volume: f32,
        is_playing: bool,
        palette: &'a Palette,
    ) -> Self {
        Self {
            progress,
            title,
            artists,
            repeat_mode,
            is_shuffled,
            volume,
            is_playing,
            palette,
        }
    }
}

impl<'a> Widget for PlayerWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(20)])
            .split(area);

        ProgressWidget::new(
            self.progress,
            self.title,
            self.artists,
            self.is_playing,
            self.palette,
        )
        .render(chunks[0], buf);

        let volume = (self.volume.clamp(0.0, 1.0) * 100.0).round() as u8;
        PlayerControlsWidget::new(self.repeat_mode, self.is_shuffled, volume, self.palette)
            .render(chunks[1], buf);
    }
}
