use thiserror::Error;

use crate::http::ApiError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    #[error("Audio output device error: {0}")]
    DeviceError(String),

    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Track not found: {0}")]
    TrackNotFound(String),

    #[error("No playable stream for {0}")]
    NoPlayableUrl(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl From<ApiError> for AudioError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::NotFound(what) => AudioError::TrackNotFound(what),
            other => AudioError::NetworkError(other.to_string()),
        }
    }
}
