use std::sync::Arc;

use flume::{Receiver, Sender};
use ratatui::Frame;
use tracing::info;

use crate::{
    audio::{playback::PlaybackEngine, system::AudioSystem, traits::AudioOutput},
    config::Config,
    event::events::Event,
    http::{ApiService, MusicApi},
    storage::{FileStore, MemoryStore, SessionPlayed},
    theme::ThemeStore,
    util::task::TaskManager,
};

use super::{
    context::AppContext,
    layout::AppLayout,
    message::AppMessage,
    router::Router,
    state::{AppState, Route},
    tui,
    util::handler::EventHandler,
    views::{ForYou, QueueView, Search},
    traits::View,
};

pub struct App {
    pub ctx: AppContext,
    pub state: AppState,
    pub router: Router,
    pub event_rx: Receiver<Event>,
    pub task_manager: TaskManager,
    pub has_focus: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> color_eyre::Result<Self> {
        let api: Arc<dyn MusicApi> = Arc::new(ApiService::new(config.api_url.clone())?);
        let output: Arc<dyn AudioOutput> = Arc::new(PlaybackEngine::new()?);
        let theme = ThemeStore::load(Arc::new(FileStore::new(config.settings_path())));
        let played = SessionPlayed::new(Arc::new(MemoryStore::new()));

        info!(api_url = config.api_url.as_str(), "app_starting");
        Ok(Self::with_parts(api, output, theme, played, config))
    }

    /// Wires the application around already-built services.
    pub fn with_parts(
        api: Arc<dyn MusicApi>,
        output: Arc<dyn AudioOutput>,
        theme: ThemeStore,
        played: SessionPlayed,
        config: Config,
    ) -> Self {
        let (event_tx, event_rx) = flume::unbounded();
        let audio_system = AudioSystem::new(
            output,
            api.clone(),
            played,
            event_tx.clone(),
            config.audio.clone(),
        );

        Self {
            ctx: AppContext {
                api,
                audio_system,
                theme,
                event_tx,
            },
            state: AppState::default(),
            router: Router::new(Self::root_view(Route::ForYou)),
            event_rx,
            task_manager: TaskManager::new(),
            has_focus: true,
            should_quit: false,
        }
    }

    pub fn event_tx(&self) -> Sender<Event> {
        self.ctx.event_tx.clone()
    }

    pub fn root_view(route: Route) -> Box<dyn View> {
        match route {
            Route::ForYou => Box::new(ForYou::default()),
            Route::Search => Box::new(Search::default()),
            Route::Queue => Box::new(QueueView::default()),
        }
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = tui::Tui::new()?;
        tui.enter()?;

        while !self.should_quit {
            tui.draw(|f| self.ui(f))?;
            EventHandler::handle_events(self, &mut tui).await?;
        }

        self.task_manager.abort_all();
        self.ctx.audio_system.stop().await;
        tui.exit()?;
        Ok(())
    }

    pub async fn update(&mut self, msg: AppMessage) {
        let audio = &mut self.ctx.audio_system;
        match msg {
            AppMessage::Quit => self.should_quit = true,
            AppMessage::TogglePlayPause => {
                audio.toggle_play_pause().await;
            }
            AppMessage::NextTrack => {
                audio.play_next().await;
            }
            AppMessage::PreviousTrack => audio.play_previous().await,
            AppMessage::VolumeUp => audio.volume_up(),
            AppMessage::VolumeDown => audio.volume_down(),
            AppMessage::SeekForward => audio.seek_forwards().await,
            AppMessage::SeekBackward => audio.seek_backwards().await,
            AppMessage::ToggleShuffle => audio.toggle_shuffle(),
            AppMessage::ToggleRepeat => audio.toggle_repeat_mode(),
            AppMessage::ToggleMute => audio.toggle_mute(),
            AppMessage::ToggleTheme => {
                let dark = self.ctx.theme.toggle();
                self.state
                    .ui
                    .notify(if dark { "Dark theme" } else { "Light theme" });
            }
            AppMessage::PlayForYou => {
                audio.play_for_you();
                self.state.ui.notify("Building a For You mix...");
            }
            AppMessage::GoBack => self.router.pop(),
            AppMessage::NextSidebarItem => {
                let next = (self.state.ui.sidebar_index + 1) % Route::ALL.len();
                self.select_route(next);
            }
            AppMessage::PreviousSidebarItem => {
                let len = Route::ALL.len();
                let prev = (self.state.ui.sidebar_index + len - 1) % len;
                self.select_route(prev);
            }
            AppMessage::SetSidebarIndex(index) => self.select_route(index),
        }
    }

    fn select_route(&mut self, index: usize) {
        let Some(&route) = Route::ALL.get(index) else {
            return;
        };
        self.state.ui.sidebar_index = index;
        self.router.reset(Self::root_view(route));
        if route == Route::ForYou {
            EventHandler::fetch_for_you(self);
        }
    }

    fn ui(&mut self, frame: &mut Frame) {
        if self.has_focus {
            AppLayout::new(self).render(frame, frame.area());
        }
    }
}
