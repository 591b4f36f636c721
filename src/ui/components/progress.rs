use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Style, Stylize},
    symbols::{self, border},
    text::ToSpan,
    widgets::{Block, Borders, Gauge, Widget},
};

use crate::{audio::progress::TrackProgress, theme::Palette, util::text::format_duration};

pub struct ProgressWidget<'a> {
    progress: &'a TrackProgress,
    title: &'a str,
    artists: Option<&'a str>,
    is_playing: bool,
    palette: &'a Palette,
}

impl<'a> ProgressWidget<'a> {
    pub fn new(
        progress: &'a TrackProgress,
        title: &'a str,
        artists: Option<&'a str>,
        is_playing: bool,
        palette: &'a Palette,
    ) -> Self {
        Self {
            progress,
            title,
            artists,
            is_playing,
            palette,
        }
    }
}

impl<'a> Widget for ProgressWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (current, total) = self.progress.get_progress();

        let mut track_info = format!("{} {}", if self.is_playing { "▶" } else { "⏸" }, self.title);
        if let Some(artists) = self.artists.filter(|a| !a.is_empty()) {
            track_info = format!("{track_info} by {artists}");
        }

        let duration_info = format!("{} / {}", format_duration(current), format_duration(total));

        Gauge::default()
            .block(
                Block::default()
                    .title_top(track_info)
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.palette.neutral))
                    .border_set(border::Set {
                        top_right: symbols::line::ROUNDED.horizontal_down,
                        bottom_right: symbols::line::ROUNDED.horizontal_up,
                        ..symbols::border::ROUNDED
                    }),
            )
            .ratio(self.progress.ratio())
            .label(duration_info.to_span().fg(self.palette.text))
            .gauge_style(
                Style::default()
                    .fg(self.palette.primary)
                    .bg(self.palette.background),
            )
            .use_unicode(true)
            .render(area, buf);
    }
}
