use crate::{
    audio::system::AudioSystem, event::events::Event, http::MusicApi, theme::ThemeStore,
};
use flume::Sender;
use std::sync::Arc;

pub struct AppContext {
    pub api: Arc<dyn MusicApi>,
    pub audio_system: AudioSystem,
    pub theme: ThemeStore,
    pub event_tx: Sender<Event>,
}
