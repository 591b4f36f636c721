use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{List, ListItem, Widget},
};

use crate::theme::Palette;

pub struct Sidebar<'a> {
    items: Vec<&'a str>,
    selected_index: usize,
    palette: &'a Palette,
}

impl<'a> Sidebar<'a> {
    pub fn new(items: Vec<&'a str>, selected_index: usize, palette: &'a Palette) -> Self {
        Self {
            items,
            selected_index,
            palette,
        }
    }
}

impl<'a> Widget for Sidebar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let items: Vec<ListItem> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let style = if i == self.selected_index {
                    Style::default()
                        .fg(self.palette.primary)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.palette.neutral)
                };
                ListItem::new(format!(" {} {}", i + 1, item)).style(style)
            })
            .collect();

        List::new(items).render(area, buf);
    }
}
