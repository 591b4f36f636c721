pub mod collection;
pub mod for_you;
pub mod queue;
pub mod search;

pub use collection::Collection;
pub use for_you::ForYou;
pub use queue::QueueView;
pub use search::Search;

use ratatui::crossterm::event::KeyCode;
use ratatui::widgets::ListState;

/// Shared j/k/g/G list navigation. Returns true when the key moved the
/// selection.
pub(crate) fn navigate(list_state: &mut ListState, key: KeyCode, len: usize) -> bool {
    if len == 0 {
        return matches!(
            key,
            KeyCode::Down | KeyCode::Up | KeyCode::Char('j' | 'k' | 'g' | 'G')
        );
    }

    let selected = list_state.selected().unwrap_or(0).min(len - 1);
    let next = match key {
        KeyCode::Down | KeyCode::Char('j') => (selected + 1).min(len - 1),
        KeyCode::Up | KeyCode::Char('k') => selected.saturating_sub(1),
        KeyCode::Char('g') => 0,
        KeyCode::Char('G') => len - 1,
        _ => return false,
    };
    list_state.select(Some(next));
    true
}
