use std::time::{Duration, Instant};

const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub ui: UiState,
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub sidebar_index: usize,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
    shown_at: Instant,
}

impl UiState {
    pub fn notify(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error: false,
            shown_at: Instant::now(),
        });
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error: true,
            shown_at: Instant::now(),
        });
    }

    pub fn active_notice(&self) -> Option<&Notice> {
        self.notice
            .as_ref()
            .filter(|n| n.shown_at.elapsed() < NOTICE_TTL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ForYou,
    Search,
    Queue,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::ForYou, Route::Search, Route::Queue];

    pub fn label(&self) -> &'static str {
        match self {
            Route::ForYou => "For You",
            Route::Search => "Search",
            Route::Queue => "Queue",
        }
    }
}
