use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
};

use crate::{
    model::Song,
    theme::Palette,
    ui::util::get_active_track_icon,
    util::text::{format_duration, truncate},
};

/// Builds the shared song row list: current-song marker, title, artists and
/// duration, styled from the active palette.
pub fn song_list<'a>(
    songs: &'a [Song],
    current_id: Option<&str>,
    is_playing: bool,
    width: u16,
    palette: &Palette,
) -> List<'a> {
    let title_width = (width as usize).saturating_sub(12).max(8);

    let items: Vec<ListItem> = songs
        .iter()
        .map(|song| {
            let is_current = current_id == Some(song.id.as_str());
            let prefix = if is_current {
                format!("{} ", get_active_track_icon(is_playing))
            } else {
                "  ".to_string()
            };

            let style = if is_current {
                Style::default()
                    .fg(palette.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.text)
            };

            ListItem::new(Line::from(vec![
                Span::raw(prefix),
                Span::styled(truncate(&song.display_title(), title_width), style),
                Span::styled(
                    format!("  {}", format_duration(song.duration_ms())),
                    Style::default().fg(palette.neutral),
                ),
            ]))
        })
        .collect();

    List::new(items)
        .highlight_style(
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ")
}
