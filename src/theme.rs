use std::sync::Arc;

use ratatui::style::{Color, Modifier, Style};
use tracing::{info, warn};

use crate::storage::KeyValueStore;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub neutral: Color,
    pub background: Color,
    pub accent: Color,
    pub text: Color,
    pub error: Color,
}

pub const DARK: Palette = Palette {
    primary: Color::from_u32(0x001db954),
    secondary: Color::from_u32(0x00127a37),
    neutral: Color::from_u32(0x00404040),
    background: Color::from_u32(0x000d0d0d),
    accent: Color::from_u32(0x00feca88),
    text: Color::from_u32(0x00e6e6e6),
    error: Color::from_u32(0x00ff5c5c),
};

pub const LIGHT: Palette = Palette {
    primary: Color::from_u32(0x00128a3e),
    secondary: Color::from_u32(0x007fd69b),
    neutral: Color::from_u32(0x00a0a0a0),
    background: Color::from_u32(0x00f7f7f7),
    accent: Color::from_u32(0x00c46a00),
    text: Color::from_u32(0x001a1a1a),
    error: Color::from_u32(0x00c62828),
};

/// Text styles derived from a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styles {
    pub title: Style,
    pub body: Style,
    pub muted: Style,
    pub highlight: Style,
    pub current: Style,
    pub error: Style,
}

impl Palette {
    pub fn styles(&self) -> Styles {
        Styles {
            title: Style::new().fg(self.primary).add_modifier(Modifier::BOLD),
            body: Style::new().fg(self.text),
            muted: Style::new().fg(self.neutral),
            highlight: Style::new().fg(self.primary).add_modifier(Modifier::BOLD),
            current: Style::new().fg(self.accent).add_modifier(Modifier::BOLD),
            error: Style::new().fg(self.error).add_modifier(Modifier::ITALIC),
        }
    }
}

/// Dark/light preference persisted in the durable store.
pub struct ThemeStore {
    store: Arc<dyn KeyValueStore>,
    dark: bool,
}

impl ThemeStore {
    /// Applies the persisted flag; anything other than `"dark"` (including a
    /// missing key or an unreadable store) means light.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let dark = match store.get(THEME_KEY) {
            Ok(value) => value.as_deref() == Some("dark"),
            Err(e) => {
                warn!(error = %e, "theme_load_failed");
                false
            }
        };

        Self { store, dark }
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    pub fn toggle(&mut self) -> bool {
        self.dark = !self.dark;
        let value = if self.dark { "dark" } else { "light" };
        match self.store.set(THEME_KEY, value) {
            Ok(()) => info!(theme = value, "theme_toggled"),
            Err(e) => warn!(error = %e, theme = value, "theme_persist_failed"),
        }
        self.dark
    }

    pub fn palette(&self) -> &'static Palette {
        if self.dark { &DARK } else { &LIGHT }
    }

    pub fn styles(&self) -> Styles {
        self.palette().styles()
    }
}
