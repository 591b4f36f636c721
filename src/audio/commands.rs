use std::time::Duration;

use crate::model::Song;

#[derive(Debug, Clone)]
pub enum AudioCommand {
    PlayTrack(Song),
    Stop,
    Seek(Duration),
}
