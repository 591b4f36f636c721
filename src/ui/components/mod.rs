pub mod controls;
pub mod player;
pub mod progress;
pub mod sidebar;
pub mod song_list;
pub mod spinner;
