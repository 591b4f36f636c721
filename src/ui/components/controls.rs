use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    symbols::{self, border},
    text::{Line, ToSpan},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

use crate::{audio::enums::RepeatMode, theme::Palette};

pub struct PlayerControlsWidget<'a> {
    repeat_mode: RepeatMode,
    shuffle_mode: bool,
    /// Percent, already zeroed when muted.
    volume: u8,
    palette: &'a Palette,
}

impl<'a> PlayerControlsWidget<'a> {
    pub fn new(
        repeat_mode: RepeatMode,
        shuffle_mode: bool,
        volume: u8,
        palette: &'a Palette,
    ) -> Self {
        Self {
            repeat_mode,
            shuffle_mode,
            volume,
            palette,
        }
    }
}

impl<'a> Widget for PlayerControlsWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = self.palette;
        let repeat_icon = match self.repeat_mode {
            RepeatMode::None => "⟳".fg(palette.neutral),
            RepeatMode::Single => "⟳1".fg(palette.primary),
            RepeatMode::All => "⟳".fg(palette.primary),
        };
        let shuffle_icon = if self.shuffle_mode {
            "⤮".fg(palette.primary)
        } else {
            "⤮".fg(palette.neutral)
        };

        let mut controls_text = Line::default();
        controls_text.push_span(repeat_icon);
        controls_text.push_span("  ");
        controls_text.push_span(shuffle_icon);

        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(8), Constraint::Length(12)])
            .split(area);

        let controls_block = Block::default()
            .borders(Borders::TOP | Borders::BOTTOM)
            .border_style(Style::default().fg(palette.neutral))
            .border_set(border::Set {
                top_left: symbols::line::ROUNDED.horizontal_down,
                top_right: symbols::line::ROUNDED.horizontal_down,
                bottom_left: symbols::line::ROUNDED.horizontal_up,
                bottom_right: symbols::line::ROUNDED.horizontal_up,
                ..symbols::border::ROUNDED
            });
        Paragraph::new(controls_text)
            .block(controls_block)
            .centered()
            .render(layout[0], buf);

        let volume_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.neutral))
            .border_set(border::Set {
                top_right: symbols::line::ROUNDED.vertical_left,
                top_left: symbols::line::ROUNDED.horizontal_down,
                bottom_left: symbols::line::ROUNDED.horizontal_up,
                ..symbols::border::ROUNDED
            });

        Gauge::default()
            .block(volume_block)
            .gauge_style(Style::new().fg(palette.primary).bg(palette.neutral))
            .ratio(f64::from(self.volume.min(100)) / 100.0)
            .label(format!("{}%", self.volume).to_span().fg(palette.text))
            .render(layout[1], buf);
    }
}
