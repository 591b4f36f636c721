use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use tracing::{debug, warn};

use crate::{
    discovery,
    event::events::Event,
    ui::{
        app::App,
        input::InputHandler,
        message::AppMessage,
        traits::Action,
        tui::{TerminalEvent, Tui},
        views::{Collection, search::SEARCH_PAGE_SIZE},
    },
};

pub struct EventHandler;

impl EventHandler {
    pub async fn handle_events(app: &mut App, tui: &mut Tui) -> color_eyre::Result<bool> {
        let mut should_render = false;
        if let Some(evt) = tui.next().await
            && Self::handle_event(app, evt, tui).await?
        {
            should_render = true;
        }

        while let Ok(evt) = app.event_rx.try_recv() {
            Self::handle_app_event(app, evt).await;
            should_render = true;
        }

        Ok(should_render)
    }

    pub async fn handle_event(
        app: &mut App,
        evt: TerminalEvent,
        tui: &mut Tui,
    ) -> color_eyre::Result<bool> {
        match evt {
            TerminalEvent::Init => {
                let _ = app.ctx.event_tx.send(Event::Initialize);
            }
            TerminalEvent::FocusGained => {
                app.has_focus = true;
                tui.clear()?;
            }
            TerminalEvent::FocusLost => app.has_focus = false,
            TerminalEvent::Key(key) => Self::handle_key_event(app, key).await,
            TerminalEvent::Mouse(mouse) => Self::handle_mouse_event(app, mouse).await,
            TerminalEvent::Tick => return Ok(app.has_focus),
            TerminalEvent::Resize(_, _) => {}
        }

        Ok(true)
    }

    pub async fn handle_app_event(app: &mut App, evt: Event) {
        app.router.on_event(&evt, &app.ctx).await;

        match evt {
            Event::Initialize => Self::fetch_for_you(app),
            Event::TrackStarted(song) => app.ctx.audio_system.on_track_started(song),
            Event::TrackEnded(id) => app.ctx.audio_system.on_track_ended(&id).await,
            Event::PlaybackFailed { song, reason } => {
                app.state
                    .ui
                    .notify_error(format!("Could not play {}: {reason}", song.name));
                app.ctx
                    .audio_system
                    .on_playback_failed(&song, &reason)
                    .await;
            }
            Event::RecommendationsFetched {
                ticket,
                seed,
                songs,
            } => {
                app.ctx
                    .audio_system
                    .on_recommendations_fetched(ticket, &seed, songs)
                    .await
            }
            Event::ForYouMixFetched { ticket, songs } => {
                match app.ctx.audio_system.on_for_you_mix(ticket, songs).await {
                    Some(0) => app.state.ui.notify("Nothing to recommend yet"),
                    Some(count) => app
                        .state
                        .ui
                        .notify(format!("Playing a mix of {count} songs")),
                    None => {}
                }
            }
            Event::QueueEnded => app.state.ui.notify("End of queue"),
            Event::FetchError(message) => app.state.ui.notify_error(message),
            Event::SearchResults { .. }
            | Event::AlbumFetched(_)
            | Event::PlaylistFetched(_)
            | Event::ForYouFetched(_) => {}
        }
    }

    async fn handle_key_event(app: &mut App, evt: KeyEvent) {
        if evt.kind != KeyEventKind::Press {
            return;
        }

        if evt.code == KeyCode::Char('c') && evt.modifiers == KeyModifiers::CONTROL {
            app.update(AppMessage::Quit).await;
            return;
        }

        let captured = app.router.captures_input();
        if let Some(action) = app.router.handle_input(evt, &app.state, &app.ctx).await {
            Self::dispatch_action(app, action).await;
            return;
        }

        if captured {
            return;
        }

        if let Some(msg) = InputHandler::handle_key(evt) {
            app.update(msg).await;
        }
    }

    pub async fn dispatch_action(app: &mut App, action: Action) {
        debug!(?action, "dispatch_action");
        let audio = &mut app.ctx.audio_system;
        match action {
            Action::PlaySong(song) => audio.play_song(song).await,
            Action::PlaySongs(context, songs, index) => {
                audio.play_songs(context, songs, index).await
            }
            Action::PlayQueueIndex(index) => audio.play_track_at_index(index).await,
            Action::AddToQueue(song) => {
                app.state.ui.notify(format!("Queued {}", song.name));
                audio.add_to_queue(song);
            }
            Action::QueueNext(song) => {
                app.state.ui.notify(format!("Playing {} next", song.name));
                audio.queue_next(song);
            }
            Action::RemoveFromQueue(index) => {
                if audio.remove_from_queue(index).is_none() {
                    app.state.ui.notify("The current song cannot be removed");
                }
            }
            Action::Search { query, page } => Self::search(app, query, page),
            Action::OpenAlbum(id) => Self::open_album(app, id),
            Action::OpenPlaylist(id) => Self::open_playlist(app, id),
            Action::RefreshForYou => Self::fetch_for_you(app),
            Action::Back => app.router.pop(),
            Action::None => {}
        }
    }

    fn search(app: &mut App, query: String, page: u32) {
        let api = app.ctx.api.clone();
        let tx = app.ctx.event_tx.clone();

        app.task_manager.spawn("search", async move {
            match api.search_songs(&query, page, SEARCH_PAGE_SIZE).await {
                Ok(page) => {
                    let _ = tx.send(Event::SearchResults { query, page });
                }
                Err(e) => {
                    warn!(query = query.as_str(), error = %e, "search_failed");
                    let _ = tx.send(Event::FetchError(e.to_string()));
                }
            }
        });
    }

    fn open_album(app: &mut App, id: String) {
        app.router.push(Box::new(Collection::album(id.clone())));

        let api = app.ctx.api.clone();
        let tx = app.ctx.event_tx.clone();
        app.task_manager.spawn("view_fetch", async move {
            match api.get_album(&id).await {
                Ok(album) => {
                    let _ = tx.send(Event::AlbumFetched(album));
                }
                Err(e) => {
                    warn!(id = id.as_str(), error = %e, "album_fetch_failed");
                    let _ = tx.send(Event::FetchError(e.to_string()));
                }
            }
        });
    }

    fn open_playlist(app: &mut App, id: String) {
        app.router.push(Box::new(Collection::playlist(id.clone())));

        let api = app.ctx.api.clone();
        let tx = app.ctx.event_tx.clone();
        app.task_manager.spawn("view_fetch", async move {
            match api.get_playlist(&id).await {
                Ok(playlist) => {
                    let _ = tx.send(Event::PlaylistFetched(playlist));
                }
                Err(e) => {
                    warn!(id = id.as_str(), error = %e, "playlist_fetch_failed");
                    let _ = tx.send(Event::FetchError(e.to_string()));
                }
            }
        });
    }

    pub fn fetch_for_you(app: &mut App) {
        let api = app.ctx.api.clone();
        let played = app.ctx.audio_system.played().clone();
        let tx = app.ctx.event_tx.clone();
        let (limit, query) = {
            let config = app.ctx.audio_system.config();
            (config.for_you_limit, config.for_you_fallback_query.clone())
        };

        app.task_manager.spawn("for_you", async move {
            match discovery::for_you_mix(api.as_ref(), &played, limit, &query).await {
                Ok(songs) => {
                    let _ = tx.send(Event::ForYouFetched(songs));
                }
                Err(e) => {
                    warn!(error = %e, "for_you_fetch_failed");
                    let _ = tx.send(Event::FetchError(e.to_string()));
                }
            }
        });
    }

    async fn handle_mouse_event(app: &mut App, evt: MouseEvent) {
        let audio = &mut app.ctx.audio_system;
        match (evt.kind, evt.modifiers) {
            (MouseEventKind::ScrollUp, KeyModifiers::SHIFT) => audio.seek_forwards().await,
            (MouseEventKind::ScrollUp, _) => audio.volume_up(),
            (MouseEventKind::ScrollDown, KeyModifiers::SHIFT) => audio.seek_backwards().await,
            (MouseEventKind::ScrollDown, _) => audio.volume_down(),
            _ => {}
        }
    }
}
